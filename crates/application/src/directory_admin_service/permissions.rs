use super::*;

use futures_util::future::join_all;
use rolekeeper_core::AppError;
use rolekeeper_domain::{
    PermissionDeletionPlan, PermissionDraft, PermissionId, RoleId, find_permission,
    plan_permission_deletion, roles_referencing_permission,
};
use tracing::{info, warn};

use crate::directory_ports::{
    DeletionConfirmation, PermissionDeletionOutcome, PermissionDeletionReport,
};

impl DirectoryAdminService {
    /// Creates a permission after local validation.
    pub async fn create_permission(&self, draft: &PermissionDraft) -> AppResult<Permission> {
        let permission = draft.validate()?;
        let permissions = self.client.list_permissions().await?;
        ensure_unique_permission_name(&permissions, permission.name.as_str(), None)?;

        let created = self.client.create_permission(permission).await?;
        info!(permission_id = %created.id, permission = %created.name, "permission created");
        Ok(created)
    }

    /// Replaces a permission's name and description.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        draft: &PermissionDraft,
    ) -> AppResult<Permission> {
        let input = draft.validate()?;
        let (permissions, roles) =
            futures_util::try_join!(self.client.list_permissions(), self.client.list_roles())?;
        ensure_unique_permission_name(&permissions, input.name.as_str(), Some(permission_id))?;

        let previous = find_permission(&permissions, permission_id)?;
        if previous.name != input.name {
            let orphaned = roles_referencing_permission(previous.name.as_str(), &roles).len();
            if orphaned > 0 {
                warn!(
                    previous_name = %previous.name,
                    new_name = %input.name,
                    orphaned,
                    "renaming permission leaves roles pointing at the old name"
                );
            }
        }

        let updated = self
            .client
            .update_permission(Permission {
                id: permission_id,
                name: input.name,
                description: input.description,
            })
            .await?;
        info!(permission_id = %updated.id, permission = %updated.name, "permission updated");
        Ok(updated)
    }

    /// Plans how a permission deletion has to be carried out.
    pub async fn plan_permission_deletion(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<PermissionDeletionPlan> {
        let (permissions, roles) =
            futures_util::try_join!(self.client.list_permissions(), self.client.list_roles())?;
        let permission = find_permission(&permissions, permission_id)?;

        Ok(plan_permission_deletion(permission, &roles))
    }

    /// Executes a deletion plan.
    ///
    /// Corrective role writes run concurrently and must all succeed before
    /// the permission delete is sent. If any of them fails the permission is
    /// left in place.
    pub async fn apply_permission_deletion(
        &self,
        plan: &PermissionDeletionPlan,
    ) -> AppResult<PermissionDeletionReport> {
        let permission_id = plan.permission_id();
        let mut corrected_roles = Vec::new();

        if let PermissionDeletionPlan::PlanWithConfirmation(plan) = plan {
            let writes = plan.corrective_writes();
            let results = join_all(
                writes
                    .iter()
                    .map(|role| self.client.update_role((*role).clone())),
            )
            .await;

            let mut failures: Vec<(RoleId, AppError)> = Vec::new();
            for (role, result) in writes.iter().zip(results) {
                match result {
                    Ok(_) => corrected_roles.push(role.id),
                    Err(error) => {
                        warn!(
                            role_id = %role.id,
                            permission_id = %permission_id,
                            error = %error,
                            "corrective role write failed"
                        );
                        failures.push((role.id, error));
                    }
                }
            }

            if !failures.is_empty() {
                let detail = failures
                    .iter()
                    .map(|(role_id, error)| format!("role {role_id}: {error}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(AppError::Transport(format!(
                    "permission {permission_id} was not deleted because {} of {} role updates failed ({detail})",
                    failures.len(),
                    writes.len()
                )));
            }

            info!(
                permission_id = %permission_id,
                corrected = corrected_roles.len(),
                "removed permission from roles"
            );
        }

        self.client.delete_permission(permission_id).await?;
        info!(permission_id = %permission_id, "permission deleted");

        Ok(PermissionDeletionReport {
            permission_id,
            corrected_roles,
        })
    }

    /// Plans, confirms when roles are affected, and applies a permission deletion.
    pub async fn delete_permission(
        &self,
        permission_id: PermissionId,
        confirmation: &dyn DeletionConfirmation,
    ) -> AppResult<PermissionDeletionOutcome> {
        let plan = self.plan_permission_deletion(permission_id).await?;

        if let PermissionDeletionPlan::PlanWithConfirmation(corrective) = &plan
            && !confirmation.confirm_permission_deletion(corrective)?
        {
            info!(permission_id = %permission_id, "permission deletion cancelled");
            return Ok(PermissionDeletionOutcome::Cancelled);
        }

        self.apply_permission_deletion(&plan)
            .await
            .map(PermissionDeletionOutcome::Deleted)
    }
}

fn ensure_unique_permission_name(
    permissions: &[Permission],
    name: &str,
    editing: Option<PermissionId>,
) -> AppResult<()> {
    if permissions
        .iter()
        .any(|permission| permission.name == name && Some(permission.id) != editing)
    {
        return Err(AppError::Conflict(format!(
            "permission '{name}' already exists"
        )));
    }

    Ok(())
}
