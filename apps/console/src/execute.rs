use rolekeeper_application::{
    DeletionConfirmation, DirectoryAdminService, PermissionDeletionOutcome,
};
use rolekeeper_core::AppResult;
use rolekeeper_domain::{PermissionDraft, RoleDraft, RoleSelection, UserDraft, find_permission};

use crate::command::{Command, PermissionsCommand, RolesCommand, UsersCommand};
use crate::render;

/// Runs one console command and returns the text to print.
pub async fn execute(
    service: &DirectoryAdminService,
    confirmation: &dyn DeletionConfirmation,
    command: Command,
) -> AppResult<String> {
    match command {
        Command::Users { command } => execute_users(service, command).await,
        Command::Roles { command } => execute_roles(service, command).await,
        Command::Permissions { command } => {
            execute_permissions(service, confirmation, command).await
        }
        Command::Matrix => {
            let user_roles = service.user_role_matrix().await?;
            let role_permissions = service.role_permission_matrix().await?;
            Ok(format!(
                "{}\n{}",
                render::matrix_table("USER", &user_roles),
                render::matrix_table("ROLE", &role_permissions)
            ))
        }
    }
}

async fn execute_users(
    service: &DirectoryAdminService,
    command: Option<UsersCommand>,
) -> AppResult<String> {
    let Some(command) = command else {
        return Ok(render::users_table(&service.load_users().await?));
    };

    match command {
        UsersCommand::Add { name, email, role } => {
            let user = service
                .save_user(&UserDraft {
                    name,
                    email,
                    role: RoleSelection::Selected(role),
                    ..UserDraft::new()
                })
                .await?;
            Ok(format!(
                "created user {} ({}) with role {}\n",
                user.id, user.name, user.role
            ))
        }
        UsersCommand::Edit {
            id,
            name,
            email,
            role,
            toggle_status,
        } => {
            let mut draft = service.edit_user(id).await?;
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(role) = role {
                draft = draft.select_role(role);
            }
            if toggle_status {
                draft = draft.toggle_status();
            }

            let user = service.save_user(&draft).await?;
            Ok(format!(
                "updated user {} ({}, {}, {})\n",
                user.id,
                user.name,
                user.role,
                user.status.as_str()
            ))
        }
        UsersCommand::Delete { id } => {
            service.delete_user(id).await?;
            Ok(format!("deleted user {id}\n"))
        }
    }
}

async fn execute_roles(
    service: &DirectoryAdminService,
    command: Option<RolesCommand>,
) -> AppResult<String> {
    let Some(command) = command else {
        return Ok(render::roles_table(&service.load_roles().await?));
    };

    match command {
        RolesCommand::Add { name, permissions } => {
            let role = service
                .save_role(&RoleDraft {
                    permissions: permissions
                        .into_iter()
                        .map(|permission| permission.trim().to_owned())
                        .filter(|permission| !permission.is_empty())
                        .collect(),
                    ..RoleDraft::new(name)
                })
                .await?;
            Ok(format!("created role {} ({})\n", role.id, role.name))
        }
        RolesCommand::Rename { id, name } => {
            let draft = service.edit_role(id).await?;
            let role = service.save_role(&RoleDraft { name, ..draft }).await?;
            Ok(format!("renamed role {} to {}\n", role.id, role.name))
        }
        RolesCommand::Toggle { id, permission } => {
            let role = service
                .toggle_role_permission(id, permission.as_str())
                .await?;
            let verb = if role.grants(permission.as_str()) {
                "granted"
            } else {
                "revoked"
            };
            Ok(format!("{verb} {permission} on role {}\n", role.name))
        }
        RolesCommand::Delete { id } => {
            service.delete_role(id).await?;
            Ok(format!("deleted role {id}\n"))
        }
    }
}

async fn execute_permissions(
    service: &DirectoryAdminService,
    confirmation: &dyn DeletionConfirmation,
    command: Option<PermissionsCommand>,
) -> AppResult<String> {
    let Some(command) = command else {
        return Ok(render::permissions_table(
            &service.load_permissions().await?,
        ));
    };

    match command {
        PermissionsCommand::Add { name, description } => {
            let permission = service
                .create_permission(&PermissionDraft::new(name, description.join(" ")))
                .await?;
            Ok(format!(
                "created permission {} ({})\n",
                permission.id, permission.name
            ))
        }
        PermissionsCommand::Edit {
            id,
            name,
            description,
        } => {
            let permissions = service.load_permissions().await?;
            let current = find_permission(&permissions, id)?;
            let draft = PermissionDraft::new(
                name.unwrap_or_else(|| current.name.clone()),
                description.unwrap_or_else(|| current.description.clone()),
            );

            let permission = service.update_permission(id, &draft).await?;
            Ok(format!(
                "updated permission {} ({})\n",
                permission.id, permission.name
            ))
        }
        PermissionsCommand::Delete { id } => {
            match service.delete_permission(id, confirmation).await? {
                PermissionDeletionOutcome::Deleted(report) => Ok(format!(
                    "deleted permission {}; removed it from {} role(s)\n",
                    report.permission_id,
                    report.corrected_roles.len()
                )),
                PermissionDeletionOutcome::Cancelled => {
                    Ok("permission deletion cancelled; nothing was changed\n".to_owned())
                }
            }
        }
    }
}
