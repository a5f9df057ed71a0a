//! Domain entities, snapshots and the consistency rules that guard deletions.
//!
//! References between records are by *name*, never by identifier: a user's
//! `role` holds a role name and a role's `permissions` hold permission names.
//! That denormalization belongs to the remote directory's wire format and is
//! kept as-is. Renaming a role or permission orphans every reference to it,
//! so rename flows only warn about what they leave behind.

#![forbid(unsafe_code)]

mod consistency;
mod ids;
mod matrix;
mod permission;
mod role;
mod snapshot;
mod user;

pub use consistency::{
    CorrectivePlan, PermissionDeletionPlan, RoleDeletionDecision, guard_role_deletion,
    is_role_assigned_to_any_user, plan_permission_deletion, resolve_role_selection,
    roles_referencing_permission, users_referencing_role,
};
pub use ids::{PermissionId, RoleId, UserId};
pub use matrix::{MatrixRow, RelationshipMatrix};
pub use permission::{NewPermission, Permission, PermissionDraft};
pub use role::{NewRole, Role, RoleDraft, RoleWrite};
pub use snapshot::{DirectorySnapshot, find_permission, find_role, find_user};
pub use user::{EmailAddress, NewUser, RoleSelection, User, UserDraft, UserStatus, UserWrite};
