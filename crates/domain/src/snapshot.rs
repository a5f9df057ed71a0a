use rolekeeper_core::{AppError, AppResult};

use crate::{Permission, PermissionId, Role, RoleId, User, UserId};

/// Point-in-time copy of all three directory collections.
///
/// Snapshots are replaced wholesale after a write, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorySnapshot {
    users: Vec<User>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
}

impl DirectorySnapshot {
    /// Creates a snapshot from freshly loaded collections.
    #[must_use]
    pub fn new(users: Vec<User>, roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self {
            users,
            roles,
            permissions,
        }
    }

    /// Returns users in directory order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Returns roles in directory order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns permissions in directory order.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Looks up a user by identifier.
    pub fn user(&self, id: UserId) -> AppResult<&User> {
        find_user(&self.users, id)
    }

    /// Looks up a role by identifier.
    pub fn role(&self, id: RoleId) -> AppResult<&Role> {
        find_role(&self.roles, id)
    }

    /// Looks up a permission by identifier.
    pub fn permission(&self, id: PermissionId) -> AppResult<&Permission> {
        find_permission(&self.permissions, id)
    }
}

/// Finds a user by identifier in a users snapshot.
pub fn find_user(users: &[User], id: UserId) -> AppResult<&User> {
    users
        .iter()
        .find(|user| user.id == id)
        .ok_or_else(|| AppError::NotFound(format!("user {id} does not exist")))
}

/// Finds a role by identifier in a roles snapshot.
pub fn find_role(roles: &[Role], id: RoleId) -> AppResult<&Role> {
    roles
        .iter()
        .find(|role| role.id == id)
        .ok_or_else(|| AppError::NotFound(format!("role {id} does not exist")))
}

/// Finds a permission by identifier in a permissions snapshot.
pub fn find_permission(
    permissions: &[Permission],
    id: PermissionId,
) -> AppResult<&Permission> {
    permissions
        .iter()
        .find(|permission| permission.id == id)
        .ok_or_else(|| AppError::NotFound(format!("permission {id} does not exist")))
}
