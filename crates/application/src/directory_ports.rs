use async_trait::async_trait;

use rolekeeper_core::AppResult;
use rolekeeper_domain::{
    CorrectivePlan, NewPermission, NewRole, NewUser, Permission, PermissionId, Role, RoleId, User,
    UserId,
};

/// Port to the remote directory service holding users, roles and permissions.
///
/// Updates are full replacements keyed by the record identifier.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Lists all users.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Creates a user and returns the stored record.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// Replaces a user and returns the stored record.
    async fn update_user(&self, user: User) -> AppResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;

    /// Lists all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Creates a role and returns the stored record.
    async fn create_role(&self, role: NewRole) -> AppResult<Role>;

    /// Replaces a role and returns the stored record.
    async fn update_role(&self, role: Role) -> AppResult<Role>;

    /// Deletes a role.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Lists all permissions.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Creates a permission and returns the stored record.
    async fn create_permission(&self, permission: NewPermission) -> AppResult<Permission>;

    /// Replaces a permission and returns the stored record.
    async fn update_permission(&self, permission: Permission) -> AppResult<Permission>;

    /// Deletes a permission.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;
}

/// Port asking the operator to approve a cascading permission deletion.
pub trait DeletionConfirmation: Send + Sync {
    /// Returns `true` when the operator accepts removing the permission from the affected roles.
    fn confirm_permission_deletion(&self, plan: &CorrectivePlan) -> AppResult<bool>;
}

/// Summary of a completed permission deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDeletionReport {
    /// Deleted permission.
    pub permission_id: PermissionId,
    /// Roles rewritten without the permission before it was deleted.
    pub corrected_roles: Vec<RoleId>,
}

/// Result of an operator-driven permission deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDeletionOutcome {
    /// The permission was deleted.
    Deleted(PermissionDeletionReport),
    /// The operator declined; nothing was written.
    Cancelled,
}
