use rolekeeper_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Role record as stored by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Directory-assigned identifier.
    pub id: RoleId,
    /// Role name, unique within the collection.
    pub name: String,
    /// Names of granted permissions, in display order.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Role {
    /// Returns whether the role lists the named permission.
    #[must_use]
    pub fn grants(&self, permission_name: &str) -> bool {
        self.permissions.iter().any(|name| name == permission_name)
    }

    /// Returns a copy with the permission removed if present, appended otherwise.
    #[must_use]
    pub fn toggle_permission(&self, permission_name: &str) -> Self {
        Self {
            permissions: toggled(&self.permissions, permission_name),
            ..self.clone()
        }
    }

    /// Returns a copy with every occurrence of the permission removed.
    #[must_use]
    pub fn without_permission(&self, permission_name: &str) -> Self {
        Self {
            permissions: self
                .permissions
                .iter()
                .filter(|name| name.as_str() != permission_name)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Role payload for create requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    /// Role name.
    pub name: String,
    /// Names of granted permissions.
    pub permissions: Vec<String>,
}

/// Validated write produced from a [`RoleDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleWrite {
    /// Create a new role.
    Create(NewRole),
    /// Replace an existing role.
    Update(Role),
}

/// In-progress role edit. Nothing is sent until the draft is saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDraft {
    /// Identifier of the role being edited, `None` when creating.
    pub id: Option<RoleId>,
    /// Role name.
    pub name: String,
    /// Names of granted permissions.
    pub permissions: Vec<String>,
}

impl RoleDraft {
    /// Creates an empty draft for a new role.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    /// Opens an existing role for editing.
    #[must_use]
    pub fn from_role(role: &Role) -> Self {
        Self {
            id: Some(role.id),
            name: role.name.clone(),
            permissions: role.permissions.clone(),
        }
    }

    /// Returns a copy with the permission removed if present, appended otherwise.
    #[must_use]
    pub fn toggle_permission(&self, permission_name: &str) -> Self {
        Self {
            permissions: toggled(&self.permissions, permission_name),
            ..self.clone()
        }
    }

    /// Validates the draft into a create or update write.
    pub fn validate(&self) -> AppResult<RoleWrite> {
        let name: String = NonEmptyString::for_field("role name", self.name.as_str())?.into();

        Ok(match self.id {
            Some(id) => RoleWrite::Update(Role {
                id,
                name,
                permissions: self.permissions.clone(),
            }),
            None => RoleWrite::Create(NewRole {
                name,
                permissions: self.permissions.clone(),
            }),
        })
    }
}

fn toggled(permissions: &[String], permission_name: &str) -> Vec<String> {
    if permissions.iter().any(|name| name == permission_name) {
        permissions
            .iter()
            .filter(|name| name.as_str() != permission_name)
            .cloned()
            .collect()
    } else {
        let mut updated = permissions.to_vec();
        updated.push(permission_name.to_owned());
        updated
    }
}
