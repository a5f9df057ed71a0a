use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolekeeper_core::AppError;
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an identifier assigned by the directory service.
            #[must_use]
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                value.trim().parse::<i64>().map(Self).map_err(|_| {
                    AppError::Validation(format!("invalid {} id '{value}'", $label))
                })
            }
        }
    };
}

record_id!(
    /// Identifier of a user record.
    UserId,
    "user"
);
record_id!(
    /// Identifier of a role record.
    RoleId,
    "role"
);
record_id!(
    /// Identifier of a permission record.
    PermissionId,
    "permission"
);

#[cfg(test)]
mod tests {
    use super::{RoleId, UserId};

    #[test]
    fn parses_trimmed_integer() {
        assert_eq!(" 7 ".parse::<RoleId>().ok(), Some(RoleId::new(7)));
    }

    #[test]
    fn rejects_non_numeric_value() {
        let parsed = "admin".parse::<UserId>();
        assert!(parsed.is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let encoded = serde_json::to_string(&RoleId::new(3)).unwrap_or_default();
        assert_eq!(encoded, "3");
    }
}
