use rolekeeper_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::PermissionId;

/// Permission record as stored by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Directory-assigned identifier.
    pub id: PermissionId,
    /// Permission name, unique within the collection.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Permission payload for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
    /// Permission name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Unvalidated permission form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionDraft {
    /// Permission name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl PermissionDraft {
    /// Creates a draft from form values.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Validates the draft; the name is required.
    pub fn validate(&self) -> AppResult<NewPermission> {
        let name = NonEmptyString::for_field("permission name", self.name.as_str())?;

        Ok(NewPermission {
            name: name.into(),
            description: self.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Permission, PermissionDraft};

    #[test]
    fn blank_name_is_rejected() {
        assert!(PermissionDraft::new("", "anything").validate().is_err());
    }

    #[test]
    fn description_is_optional_on_the_wire() {
        let permission: Result<Permission, _> = serde_json::from_str(r#"{"id":4,"name":"Read"}"#);
        assert_eq!(
            permission.map(|permission| permission.description).ok(),
            Some(String::new())
        );
    }
}
