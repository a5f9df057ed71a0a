use clap::{Parser, Subcommand};
use rolekeeper_domain::{PermissionId, RoleId, UserId};

/// Rolekeeper - users, roles and permissions of an RBAC directory
#[derive(Parser, Debug)]
#[command(name = "rolekeeper-console")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List or change users
    Users {
        #[command(subcommand)]
        command: Option<UsersCommand>,
    },

    /// List or change roles
    Roles {
        #[command(subcommand)]
        command: Option<RolesCommand>,
    },

    /// List or change permissions
    Permissions {
        #[command(subcommand)]
        command: Option<PermissionsCommand>,
    },

    /// Print the user/role and role/permission grids
    Matrix,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UsersCommand {
    /// Create an active user holding an existing role
    Add {
        name: String,
        email: String,
        role: RoleId,
    },

    /// Change fields of a user; omitted fields are left as stored
    Edit {
        id: UserId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Role to assign, by id
        #[arg(long)]
        role: Option<RoleId>,

        /// Flip between Active and Inactive
        #[arg(long)]
        toggle_status: bool,
    },

    /// Delete a user
    Delete { id: UserId },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RolesCommand {
    /// Create a role, optionally with a comma-separated permission list
    Add {
        name: String,

        #[arg(value_delimiter = ',')]
        permissions: Vec<String>,
    },

    /// Rename a role; users keep pointing at the old name
    Rename { id: RoleId, name: String },

    /// Grant or revoke one permission
    Toggle { id: RoleId, permission: String },

    /// Delete a role; refused while users hold it
    Delete { id: RoleId },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PermissionsCommand {
    /// Create a permission
    Add {
        name: String,

        /// Free-form description, may span several words
        description: Vec<String>,
    },

    /// Change the name or description of a permission
    Edit {
        id: PermissionId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a permission; asks before removing it from roles
    Delete { id: PermissionId },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rolekeeper_domain::{PermissionId, RoleId, UserId};

    use super::{Cli, Command, PermissionsCommand, RolesCommand, UsersCommand};

    fn parse(line: &str) -> Option<Command> {
        Cli::try_parse_from(std::iter::once("rolekeeper-console").chain(line.split_whitespace()))
            .ok()
            .map(|cli| cli.command)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_collection_lists_it() {
        assert_eq!(parse("users"), Some(Command::Users { command: None }));
        assert_eq!(parse("matrix"), Some(Command::Matrix));
        assert_eq!(parse(""), None);
    }

    #[test]
    fn parses_user_edit_flags() {
        assert_eq!(
            parse("users edit 2 --role 3 --toggle-status --name Robert"),
            Some(Command::Users {
                command: Some(UsersCommand::Edit {
                    id: UserId::new(2),
                    name: Some("Robert".to_owned()),
                    email: None,
                    role: Some(RoleId::new(3)),
                    toggle_status: true,
                }),
            })
        );
    }

    #[test]
    fn parses_role_permission_list() {
        assert_eq!(
            parse("roles add Auditor Read,Export"),
            Some(Command::Roles {
                command: Some(RolesCommand::Add {
                    name: "Auditor".to_owned(),
                    permissions: vec!["Read".to_owned(), "Export".to_owned()],
                }),
            })
        );
    }

    #[test]
    fn collects_permission_description_words() {
        assert_eq!(
            parse("permissions add Export Download all records"),
            Some(Command::Permissions {
                command: Some(PermissionsCommand::Add {
                    name: "Export".to_owned(),
                    description: vec![
                        "Download".to_owned(),
                        "all".to_owned(),
                        "records".to_owned(),
                    ],
                }),
            })
        );
        assert_eq!(
            parse("permissions delete 5"),
            Some(Command::Permissions {
                command: Some(PermissionsCommand::Delete {
                    id: PermissionId::new(5),
                }),
            })
        );
    }

    #[test]
    fn rejects_non_numeric_identifiers_and_unknown_commands() {
        assert_eq!(parse("roles delete Admin"), None);
        assert_eq!(parse("users edit 1 --colour blue"), None);
        assert_eq!(parse("groups"), None);
    }
}
