//! User records, the user edit buffer and email validation.

use rolekeeper_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::consistency::resolve_role_selection;
use crate::{Role, RoleId, UserId};

/// Account status shown and toggled in the user editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserStatus {
    /// The account is enabled.
    #[default]
    Active,
    /// The account is disabled.
    Inactive,
}

impl UserStatus {
    /// Returns the wire value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

/// User record as stored by the directory service.
///
/// `role` is a role *name*. It may name a role that no longer exists; such a
/// value is kept and displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Name of the assigned role.
    #[serde(default)]
    pub role: String,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
}

/// User payload for create requests; the service assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Name of the assigned role.
    pub role: String,
    /// Account status.
    pub status: UserStatus,
}

/// Validated write produced from a [`UserDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    /// Create a new user.
    Create(NewUser),
    /// Replace an existing user.
    Update(User),
}

/// Role choice held by a [`UserDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleSelection {
    /// Nothing chosen yet.
    #[default]
    Unselected,
    /// Keep the stored role name untouched, even if no role carries it.
    Keep(String),
    /// A role picked from the role list.
    Selected(RoleId),
}

/// In-progress user edit.
///
/// A picked role is held as its identifier and only turned back into a name
/// when the draft is resolved for saving.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    /// Identifier of the user being edited, `None` when creating.
    pub id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role choice.
    pub role: RoleSelection,
    /// Account status.
    pub status: UserStatus,
}

impl UserDraft {
    /// Creates an empty draft for a new, active user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an existing user for editing.
    ///
    /// A role name that matches no role in `roles` is kept as stored.
    #[must_use]
    pub fn from_user(user: &User, roles: &[Role]) -> Self {
        Self {
            id: Some(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
            role: roles
                .iter()
                .find(|role| role.name == user.role)
                .map_or_else(
                    || RoleSelection::Keep(user.role.clone()),
                    |role| RoleSelection::Selected(role.id),
                ),
            status: user.status,
        }
    }

    /// Returns a copy of the draft with the status flipped.
    #[must_use]
    pub fn toggle_status(&self) -> Self {
        Self {
            status: self.status.toggled(),
            ..self.clone()
        }
    }

    /// Returns a copy of the draft with `role_id` picked as the role.
    #[must_use]
    pub fn select_role(&self, role_id: RoleId) -> Self {
        Self {
            role: RoleSelection::Selected(role_id),
            ..self.clone()
        }
    }

    /// Validates the draft and resolves the role choice to a name.
    pub fn resolve(&self, roles: &[Role]) -> AppResult<UserWrite> {
        let name = NonEmptyString::for_field("user name", self.name.as_str())?;
        let email = if self.email.trim().is_empty() {
            String::new()
        } else {
            EmailAddress::new(self.email.as_str())?.into()
        };
        let role = resolve_role_selection(&self.role, roles)?;

        Ok(match self.id {
            Some(id) => UserWrite::Update(User {
                id,
                name: name.into(),
                email,
                role,
                status: self.status,
            }),
            None => UserWrite::Create(NewUser {
                name: name.into(),
                email,
                role,
                status: self.status,
            }),
        })
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use rolekeeper_core::AppError;

    use super::{EmailAddress, RoleSelection, User, UserDraft, UserStatus, UserWrite};
    use crate::{Role, RoleId, UserId};

    fn roles() -> Vec<Role> {
        vec![
            Role {
                id: RoleId::new(1),
                name: "Admin".to_owned(),
                permissions: vec!["Read".to_owned()],
            },
            Role {
                id: RoleId::new(2),
                name: "Editor".to_owned(),
                permissions: Vec::new(),
            },
        ]
    }

    fn alice() -> User {
        User {
            id: UserId::new(1),
            name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
            role: "Admin".to_owned(),
            status: UserStatus::Active,
        }
    }

    #[test]
    fn email_is_normalized_to_lowercase() {
        let email = EmailAddress::new("  Alice@Example.COM ");
        assert_eq!(
            email.map(String::from).ok().as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("alice@localhost").is_err());
        assert!(EmailAddress::new("a@b@c.com").is_err());
    }

    #[test]
    fn from_user_maps_role_name_to_selection() {
        let draft = UserDraft::from_user(&alice(), &roles());
        assert_eq!(draft.role, RoleSelection::Selected(RoleId::new(1)));
    }

    #[test]
    fn from_user_keeps_dangling_role_name() {
        let mut user = alice();
        user.role = "Ghost".to_owned();

        let draft = UserDraft::from_user(&user, &roles());
        assert_eq!(draft.role, RoleSelection::Keep("Ghost".to_owned()));

        let write = draft.toggle_status().resolve(&roles());
        let Ok(UserWrite::Update(saved)) = write else {
            panic!("expected update write, got {write:?}");
        };
        assert_eq!(saved.role, "Ghost");
        assert_eq!(saved.status, UserStatus::Inactive);
    }

    #[test]
    fn resolve_writes_current_role_name() {
        let draft = UserDraft::from_user(&alice(), &roles()).select_role(RoleId::new(2));

        let write = draft.resolve(&roles());
        let Ok(UserWrite::Update(user)) = write else {
            panic!("expected update write, got {write:?}");
        };
        assert_eq!(user.role, "Editor");
        assert_eq!(user.id, UserId::new(1));
    }

    #[test]
    fn resolve_new_draft_produces_create() {
        let draft = UserDraft {
            name: "Carol".to_owned(),
            email: String::new(),
            role: RoleSelection::Selected(RoleId::new(1)),
            ..UserDraft::new()
        };

        let write = draft.resolve(&roles());
        let Ok(UserWrite::Create(user)) = write else {
            panic!("expected create write, got {write:?}");
        };
        assert_eq!(user.role, "Admin");
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.email.is_empty());
    }

    #[test]
    fn resolve_requires_name() {
        let draft = UserDraft {
            role: RoleSelection::Selected(RoleId::new(1)),
            ..UserDraft::new()
        };

        assert!(matches!(
            draft.resolve(&roles()),
            Err(AppError::Validation(message)) if message == "user name is required"
        ));
    }

    #[test]
    fn toggle_status_flips_between_active_and_inactive() {
        let draft = UserDraft::new().toggle_status();
        assert_eq!(draft.status, UserStatus::Inactive);
        assert_eq!(draft.toggle_status().status, UserStatus::Active);
    }

    #[test]
    fn deserializes_directory_record() {
        let user: Result<User, _> = serde_json::from_str(
            r#"{"id":2,"name":"Bob","email":"bob@example.com","role":"Editor","status":"Inactive"}"#,
        );
        let Ok(user) = user else {
            panic!("user record should deserialize");
        };
        assert_eq!(user.status, UserStatus::Inactive);
        assert_eq!(user.role, "Editor");
    }
}
