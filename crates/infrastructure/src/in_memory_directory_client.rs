use async_trait::async_trait;
use rolekeeper_application::DirectoryClient;
use rolekeeper_core::{AppError, AppResult};
use rolekeeper_domain::{
    DirectorySnapshot, NewPermission, NewRole, NewUser, Permission, PermissionId, Role, RoleId,
    User, UserId, UserStatus,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<User>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
}

/// In-memory directory used for demo sessions and tests.
///
/// Identifiers are assigned as one past the largest stored identifier, the
/// way a small JSON-backed mock server does.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryClient {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectoryClient {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the given collections.
    #[must_use]
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                users: snapshot.users().to_vec(),
                roles: snapshot.roles().to_vec(),
                permissions: snapshot.permissions().to_vec(),
            }),
        }
    }

    /// Creates a directory with a small sample organization.
    #[must_use]
    pub fn seeded() -> Self {
        let user = |id, name: &str, email: &str, role: &str, status| User {
            id: UserId::new(id),
            name: name.to_owned(),
            email: email.to_owned(),
            role: role.to_owned(),
            status,
        };
        let role = |id, name: &str, permissions: &[&str]| Role {
            id: RoleId::new(id),
            name: name.to_owned(),
            permissions: permissions.iter().map(|name| (*name).to_owned()).collect(),
        };
        let permission = |id, name: &str, description: &str| Permission {
            id: PermissionId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
        };

        Self::from_snapshot(DirectorySnapshot::new(
            vec![
                user(1, "Alice", "alice@example.com", "Admin", UserStatus::Active),
                user(2, "Bob", "bob@example.com", "Editor", UserStatus::Inactive),
            ],
            vec![
                role(1, "Admin", &["Read", "Write", "Delete"]),
                role(2, "Editor", &["Read", "Write"]),
                role(3, "Viewer", &["Read"]),
            ],
            vec![
                permission(1, "Read", "View records"),
                permission(2, "Write", "Create and edit records"),
                permission(3, "Delete", "Remove records"),
            ],
        ))
    }

    /// Returns a copy of the current contents.
    pub async fn snapshot(&self) -> DirectorySnapshot {
        let state = self.state.read().await;
        DirectorySnapshot::new(
            state.users.clone(),
            state.roles.clone(),
            state.permissions.clone(),
        )
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0).saturating_add(1)
}

fn replace<T: Clone>(
    records: &mut [T],
    matches: impl Fn(&T) -> bool,
    record: T,
    label: &str,
) -> AppResult<T> {
    let stored = records
        .iter_mut()
        .find(|stored| matches(stored))
        .ok_or_else(|| AppError::NotFound(format!("{label} does not exist")))?;
    *stored = record.clone();
    Ok(record)
}

fn remove<T>(records: &mut Vec<T>, matches: impl Fn(&T) -> bool, label: &str) -> AppResult<()> {
    let before = records.len();
    records.retain(|record| !matches(record));
    if records.len() == before {
        return Err(AppError::NotFound(format!("{label} does not exist")));
    }

    Ok(())
}

#[async_trait]
impl DirectoryClient for InMemoryDirectoryClient {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        let created = User {
            id: UserId::new(next_id(state.users.iter().map(|user| user.id.as_i64()))),
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, user: User) -> AppResult<User> {
        let label = format!("user {}", user.id);
        let id = user.id;
        replace(
            &mut self.state.write().await.users,
            |stored| stored.id == id,
            user,
            label.as_str(),
        )
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        remove(
            &mut self.state.write().await.users,
            |user| user.id == user_id,
            format!("user {user_id}").as_str(),
        )
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.state.read().await.roles.clone())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        let created = Role {
            id: RoleId::new(next_id(state.roles.iter().map(|role| role.id.as_i64()))),
            name: role.name,
            permissions: role.permissions,
        };
        state.roles.push(created.clone());
        Ok(created)
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        let label = format!("role {}", role.id);
        let id = role.id;
        replace(
            &mut self.state.write().await.roles,
            |stored| stored.id == id,
            role,
            label.as_str(),
        )
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        remove(
            &mut self.state.write().await.roles,
            |role| role.id == role_id,
            format!("role {role_id}").as_str(),
        )
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.state.read().await.permissions.clone())
    }

    async fn create_permission(&self, permission: NewPermission) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        let created = Permission {
            id: PermissionId::new(next_id(
                state
                    .permissions
                    .iter()
                    .map(|permission| permission.id.as_i64()),
            )),
            name: permission.name,
            description: permission.description,
        };
        state.permissions.push(created.clone());
        Ok(created)
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<Permission> {
        let label = format!("permission {}", permission.id);
        let id = permission.id;
        replace(
            &mut self.state.write().await.permissions,
            |stored| stored.id == id,
            permission,
            label.as_str(),
        )
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        remove(
            &mut self.state.write().await.permissions,
            |permission| permission.id == permission_id,
            format!("permission {permission_id}").as_str(),
        )
    }
}
