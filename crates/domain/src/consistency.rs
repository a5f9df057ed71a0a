//! Cross-entity consistency rules applied before deletions and edits.
//!
//! Every function here is pure: it reads snapshots and returns a decision or
//! a plan. Callers perform the writes.

use std::collections::HashSet;

use rolekeeper_core::{AppError, AppResult};

use crate::{Permission, PermissionId, Role, RoleId, RoleSelection, User, UserId};

/// Returns every role that lists `permission_name`, in snapshot order.
#[must_use]
pub fn roles_referencing_permission<'a>(permission_name: &str, roles: &'a [Role]) -> Vec<&'a Role> {
    roles
        .iter()
        .filter(|role| role.grants(permission_name))
        .collect()
}

/// Returns every user whose role is exactly `role_name`, in snapshot order.
#[must_use]
pub fn users_referencing_role<'a>(role_name: &str, users: &'a [User]) -> Vec<&'a User> {
    users.iter().filter(|user| user.role == role_name).collect()
}

/// Returns whether any user holds the named role.
#[must_use]
pub fn is_role_assigned_to_any_user(role_name: &str, users: &[User]) -> bool {
    users.iter().any(|user| user.role == role_name)
}

/// Outcome of checking whether a role may be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDeletionDecision {
    /// No user holds the role.
    Allowed,
    /// Users still hold the role and must be reassigned first.
    Blocked {
        /// Operator-facing explanation.
        reason: String,
        /// Users holding the role, in snapshot order.
        referencing_users: Vec<UserId>,
    },
}

impl RoleDeletionDecision {
    /// Returns whether the deletion may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decides whether `role` may be deleted given the current users.
///
/// Matching is by the role's current name. An unnamed role cannot be
/// referenced and is always allowed.
#[must_use]
pub fn guard_role_deletion(role: &Role, users: &[User]) -> RoleDeletionDecision {
    if role.name.is_empty() {
        return RoleDeletionDecision::Allowed;
    }

    let holders = users_referencing_role(role.name.as_str(), users);
    if holders.is_empty() {
        return RoleDeletionDecision::Allowed;
    }

    let names = holders
        .iter()
        .map(|user| user.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let verb = if holders.len() == 1 {
        "references"
    } else {
        "reference"
    };

    RoleDeletionDecision::Blocked {
        reason: format!(
            "{names} {verb} {}; reassign before deleting the role",
            role.name
        ),
        referencing_users: holders.iter().map(|user| user.id).collect(),
    }
}

/// Corrective work required before a referenced permission can be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectivePlan {
    /// Permission to delete once corrections succeed.
    pub permission_id: PermissionId,
    /// Name being removed from roles.
    pub permission_name: String,
    /// Roles that list the permission, as they are now.
    pub affected_roles: Vec<Role>,
    /// The whole roles snapshot with the permission name removed.
    pub corrected_roles: Vec<Role>,
}

impl CorrectivePlan {
    /// Returns only the corrected roles that differ from the snapshot.
    #[must_use]
    pub fn corrective_writes(&self) -> Vec<&Role> {
        let affected: HashSet<RoleId> = self.affected_roles.iter().map(|role| role.id).collect();

        self.corrected_roles
            .iter()
            .filter(|role| affected.contains(&role.id))
            .collect()
    }

    /// Returns the names of affected roles for confirmation prompts.
    #[must_use]
    pub fn affected_role_names(&self) -> Vec<&str> {
        self.affected_roles
            .iter()
            .map(|role| role.name.as_str())
            .collect()
    }
}

/// How a permission deletion has to be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDeletionPlan {
    /// No role lists the permission; a single delete suffices.
    DirectDelete {
        /// Permission to delete.
        permission_id: PermissionId,
    },
    /// Roles list the permission; confirm, correct them, then delete.
    PlanWithConfirmation(CorrectivePlan),
}

impl PermissionDeletionPlan {
    /// Returns the permission this plan deletes.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        match self {
            Self::DirectDelete { permission_id } => *permission_id,
            Self::PlanWithConfirmation(plan) => plan.permission_id,
        }
    }

    /// Returns whether operator confirmation is needed.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::PlanWithConfirmation(_))
    }
}

/// Plans the deletion of `permission` against the current roles.
#[must_use]
pub fn plan_permission_deletion(permission: &Permission, roles: &[Role]) -> PermissionDeletionPlan {
    let name = permission.name.as_str();
    let affected_roles: Vec<Role> = roles_referencing_permission(name, roles)
        .into_iter()
        .cloned()
        .collect();

    if affected_roles.is_empty() {
        return PermissionDeletionPlan::DirectDelete {
            permission_id: permission.id,
        };
    }

    PermissionDeletionPlan::PlanWithConfirmation(CorrectivePlan {
        permission_id: permission.id,
        permission_name: permission.name.clone(),
        affected_roles,
        corrected_roles: roles
            .iter()
            .map(|role| role.without_permission(name))
            .collect(),
    })
}

/// Turns the role choice of a user edit into the name to store.
///
/// A kept name is written back unchanged. A picked role that no longer exists
/// is rejected; the identifier is never written in place of a name.
pub fn resolve_role_selection(selection: &RoleSelection, roles: &[Role]) -> AppResult<String> {
    let role_id = match selection {
        RoleSelection::Unselected => {
            return Err(AppError::Validation("a role must be selected".to_owned()));
        }
        RoleSelection::Keep(name) => return Ok(name.clone()),
        RoleSelection::Selected(role_id) => *role_id,
    };

    roles
        .iter()
        .find(|role| role.id == role_id)
        .map(|role| role.name.clone())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "selected role {role_id} no longer exists; reload and pick another role"
            ))
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rolekeeper_core::AppError;

    use super::{
        PermissionDeletionPlan, RoleDeletionDecision, guard_role_deletion,
        is_role_assigned_to_any_user, plan_permission_deletion, resolve_role_selection,
        roles_referencing_permission, users_referencing_role,
    };
    use crate::{Permission, PermissionId, Role, RoleId, RoleSelection, User, UserId, UserStatus};

    fn role(id: i64, name: &str, permissions: &[&str]) -> Role {
        Role {
            id: RoleId::new(id),
            name: name.to_owned(),
            permissions: permissions.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    fn user(id: i64, name: &str, role: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: role.to_owned(),
            status: UserStatus::Active,
        }
    }

    fn permission(id: i64, name: &str) -> Permission {
        Permission {
            id: PermissionId::new(id),
            name: name.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn unreferenced_role_may_be_deleted() {
        let admin = role(1, "Admin", &["Read", "Write"]);
        assert_eq!(guard_role_deletion(&admin, &[]), RoleDeletionDecision::Allowed);
    }

    #[test]
    fn role_held_by_user_is_blocked() {
        let admin = role(1, "Admin", &[]);
        let users = vec![user(1, "Alice", "Admin")];

        let decision = guard_role_deletion(&admin, &users);
        let RoleDeletionDecision::Blocked {
            reason,
            referencing_users,
        } = decision
        else {
            panic!("expected a block, got {decision:?}");
        };
        assert!(reason.starts_with("Alice references Admin"));
        assert_eq!(referencing_users, vec![UserId::new(1)]);
    }

    #[test]
    fn role_guard_matches_names_case_sensitively() {
        let admin = role(1, "Admin", &[]);
        let users = vec![user(1, "Alice", "admin")];
        assert!(guard_role_deletion(&admin, &users).is_allowed());
        assert!(!is_role_assigned_to_any_user("Admin", &users));
    }

    #[test]
    fn unnamed_role_is_never_blocked() {
        let unnamed = role(9, "", &[]);
        let users = vec![user(1, "Nobody", "")];
        assert!(guard_role_deletion(&unnamed, &users).is_allowed());
    }

    #[test]
    fn blocked_reason_lists_every_holder() {
        let editor = role(2, "Editor", &[]);
        let users = vec![
            user(1, "Alice", "Editor"),
            user(2, "Bob", "Viewer"),
            user(3, "Carol", "Editor"),
        ];

        let holders = users_referencing_role("Editor", &users);
        assert_eq!(
            holders.iter().map(|user| user.id).collect::<Vec<_>>(),
            vec![UserId::new(1), UserId::new(3)]
        );

        let RoleDeletionDecision::Blocked { reason, .. } = guard_role_deletion(&editor, &users)
        else {
            panic!("expected a block");
        };
        assert!(reason.starts_with("Alice, Carol reference Editor"));
    }

    #[test]
    fn referenced_permission_plans_corrections() {
        let write = permission(5, "Write");
        let roles = vec![
            role(1, "Admin", &["Read", "Write"]),
            role(2, "Viewer", &["Read"]),
        ];

        let plan = plan_permission_deletion(&write, &roles);
        let PermissionDeletionPlan::PlanWithConfirmation(plan) = plan else {
            panic!("expected a corrective plan, got {plan:?}");
        };

        assert_eq!(plan.permission_id, PermissionId::new(5));
        assert_eq!(plan.affected_role_names(), vec!["Admin"]);
        assert_eq!(
            plan.corrected_roles,
            vec![role(1, "Admin", &["Read"]), role(2, "Viewer", &["Read"])]
        );
        assert_eq!(plan.corrective_writes(), vec![&role(1, "Admin", &["Read"])]);
    }

    #[test]
    fn unreferenced_permission_is_deleted_directly() {
        let export = permission(9, "Export");
        let roles = vec![role(1, "Admin", &["Read"])];

        assert_eq!(
            plan_permission_deletion(&export, &roles),
            PermissionDeletionPlan::DirectDelete {
                permission_id: PermissionId::new(9)
            }
        );
    }

    #[test]
    fn duplicate_permission_entries_are_all_removed() {
        let read = permission(1, "Read");
        let roles = vec![role(1, "Admin", &["Read", "Write", "Read"])];

        let PermissionDeletionPlan::PlanWithConfirmation(plan) =
            plan_permission_deletion(&read, &roles)
        else {
            panic!("expected a corrective plan");
        };
        assert_eq!(plan.corrected_roles, vec![role(1, "Admin", &["Write"])]);
    }

    #[test]
    fn stale_role_selection_is_rejected() {
        let roles = vec![role(1, "Admin", &[])];

        assert_eq!(
            resolve_role_selection(&RoleSelection::Selected(RoleId::new(1)), &roles).ok(),
            Some("Admin".to_owned())
        );
        assert!(matches!(
            resolve_role_selection(&RoleSelection::Selected(RoleId::new(4)), &roles),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolve_role_selection(&RoleSelection::Unselected, &roles),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            resolve_role_selection(&RoleSelection::Keep("Ghost".to_owned()), &roles).ok(),
            Some("Ghost".to_owned())
        );
    }

    fn arb_roles() -> impl Strategy<Value = Vec<Role>> {
        proptest::collection::vec(proptest::collection::vec("[A-E]", 0..5), 0..6).prop_map(
            |grants| {
                grants
                    .into_iter()
                    .enumerate()
                    .map(|(index, permissions)| Role {
                        id: RoleId::new(index as i64 + 1),
                        name: format!("Role{index}"),
                        permissions,
                    })
                    .collect()
            },
        )
    }

    fn arb_users() -> impl Strategy<Value = Vec<User>> {
        proptest::collection::vec("Role[0-4]", 0..6).prop_map(|roles| {
            roles
                .into_iter()
                .enumerate()
                .map(|(index, role)| user(index as i64 + 1, &format!("User{index}"), &role))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn guard_blocks_exactly_when_a_user_holds_the_role(
            users in arb_users(),
            index in 0_usize..5,
        ) {
            let target = role(1, &format!("Role{index}"), &[]);
            let held = users.iter().any(|user| user.role == target.name);

            prop_assert_eq!(!guard_role_deletion(&target, &users).is_allowed(), held);
        }

        #[test]
        fn plan_affects_exactly_the_roles_listing_the_permission(
            roles in arb_roles(),
            name in "[A-F]",
        ) {
            let target = permission(7, &name);
            let listing: Vec<&Role> = roles.iter().filter(|role| role.grants(&name)).collect();

            match plan_permission_deletion(&target, &roles) {
                PermissionDeletionPlan::DirectDelete { permission_id } => {
                    prop_assert!(listing.is_empty());
                    prop_assert_eq!(permission_id, PermissionId::new(7));
                }
                PermissionDeletionPlan::PlanWithConfirmation(plan) => {
                    let affected: Vec<&Role> = plan.affected_roles.iter().collect();
                    prop_assert_eq!(affected, listing);
                    prop_assert_eq!(
                        roles_referencing_permission(&name, &roles).len(),
                        plan.corrective_writes().len()
                    );
                }
            }
        }

        #[test]
        fn replanning_after_corrections_deletes_directly(
            roles in arb_roles(),
            name in "[A-E]",
        ) {
            let target = permission(3, &name);
            let plan = plan_permission_deletion(&target, &roles);
            prop_assert_eq!(plan.clone(), plan_permission_deletion(&target, &roles));

            let corrected = match plan {
                PermissionDeletionPlan::DirectDelete { .. } => roles.clone(),
                PermissionDeletionPlan::PlanWithConfirmation(plan) => plan.corrected_roles,
            };

            let replanned = plan_permission_deletion(&target, &corrected);
            prop_assert!(!replanned.requires_confirmation());
        }
    }
}
