use super::*;

use rolekeeper_core::AppError;
use rolekeeper_domain::{
    RoleDeletionDecision, RoleDraft, RoleId, RoleWrite, find_role, guard_role_deletion,
    users_referencing_role,
};
use tracing::{info, warn};

impl DirectoryAdminService {
    /// Opens an existing role for editing.
    pub async fn edit_role(&self, role_id: RoleId) -> AppResult<RoleDraft> {
        let roles = self.client.list_roles().await?;
        Ok(RoleDraft::from_role(find_role(&roles, role_id)?))
    }

    /// Creates or replaces a role from an edit buffer.
    ///
    /// Newly granted permissions must exist; names the role already held are
    /// kept even when dangling.
    pub async fn save_role(&self, draft: &RoleDraft) -> AppResult<Role> {
        let write = draft.validate()?;
        let (roles, permissions) =
            futures_util::try_join!(self.client.list_roles(), self.client.list_permissions())?;

        match write {
            RoleWrite::Create(role) => {
                ensure_unique_role_name(&roles, role.name.as_str(), None)?;
                ensure_granted_permissions_exist(&permissions, &role.permissions, &[])?;
                let created = self.client.create_role(role).await?;
                info!(role_id = %created.id, role = %created.name, "role created");
                Ok(created)
            }
            RoleWrite::Update(role) => {
                ensure_unique_role_name(&roles, role.name.as_str(), Some(role.id))?;
                let previous = find_role(&roles, role.id)?;
                ensure_granted_permissions_exist(
                    &permissions,
                    &role.permissions,
                    &previous.permissions,
                )?;
                if previous.name != role.name {
                    self.warn_on_role_rename(previous.name.as_str(), role.name.as_str())
                        .await;
                }

                let updated = self.client.update_role(role).await?;
                info!(role_id = %updated.id, role = %updated.name, "role updated");
                Ok(updated)
            }
        }
    }

    /// Flips one permission on a role and saves it.
    ///
    /// Granting requires the permission to exist; revoking a dangling name is
    /// always possible.
    pub async fn toggle_role_permission(
        &self,
        role_id: RoleId,
        permission_name: &str,
    ) -> AppResult<Role> {
        let (roles, permissions) =
            futures_util::try_join!(self.client.list_roles(), self.client.list_permissions())?;
        let role = find_role(&roles, role_id)?;

        if !role.grants(permission_name)
            && !permissions
                .iter()
                .any(|permission| permission.name == permission_name)
        {
            return Err(AppError::NotFound(format!(
                "permission '{permission_name}' does not exist"
            )));
        }

        let draft = RoleDraft::from_role(role).toggle_permission(permission_name);
        let RoleWrite::Update(updated) = draft.validate()? else {
            return Err(AppError::Internal(
                "role draft lost its identifier".to_owned(),
            ));
        };

        let saved = self.client.update_role(updated).await?;
        info!(
            role_id = %saved.id,
            permission = permission_name,
            granted = saved.grants(permission_name),
            "role permission toggled"
        );
        Ok(saved)
    }

    /// Checks whether a role can be deleted against the current users.
    pub async fn check_role_deletion(&self, role_id: RoleId) -> AppResult<RoleDeletionDecision> {
        let (roles, users) =
            futures_util::try_join!(self.client.list_roles(), self.client.list_users())?;
        let role = find_role(&roles, role_id)?;

        Ok(guard_role_deletion(role, &users))
    }

    /// Deletes a role unless a user still holds it.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        match self.check_role_deletion(role_id).await? {
            RoleDeletionDecision::Allowed => {
                self.client.delete_role(role_id).await?;
                info!(role_id = %role_id, "role deleted");
                Ok(())
            }
            RoleDeletionDecision::Blocked {
                reason,
                referencing_users,
            } => {
                info!(
                    role_id = %role_id,
                    referencing_users = referencing_users.len(),
                    "role deletion blocked"
                );
                Err(AppError::ReferentialBlock(reason))
            }
        }
    }

    async fn warn_on_role_rename(&self, previous_name: &str, new_name: &str) {
        match self.client.list_users().await {
            Ok(users) => {
                let orphaned = users_referencing_role(previous_name, &users).len();
                if orphaned > 0 {
                    warn!(
                        previous_name,
                        new_name,
                        orphaned,
                        "renaming role leaves users pointing at the old name"
                    );
                }
            }
            Err(error) => {
                warn!(error = %error, "could not check users before role rename");
            }
        }
    }
}

fn ensure_unique_role_name(roles: &[Role], name: &str, editing: Option<RoleId>) -> AppResult<()> {
    if roles
        .iter()
        .any(|role| role.name == name && Some(role.id) != editing)
    {
        return Err(AppError::Conflict(format!("role '{name}' already exists")));
    }

    Ok(())
}

fn ensure_granted_permissions_exist(
    permissions: &[Permission],
    requested: &[String],
    already_granted: &[String],
) -> AppResult<()> {
    let missing = requested
        .iter()
        .filter(|name| !already_granted.contains(*name))
        .find(|name| !permissions.iter().any(|permission| &permission.name == *name));

    match missing {
        Some(name) => Err(AppError::NotFound(format!(
            "permission '{name}' does not exist"
        ))),
        None => Ok(()),
    }
}
