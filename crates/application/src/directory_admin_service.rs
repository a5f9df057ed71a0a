use std::sync::Arc;

use rolekeeper_core::AppResult;
use rolekeeper_domain::{DirectorySnapshot, Permission, Role, User};

use crate::directory_ports::DirectoryClient;

mod matrix;
mod permissions;
mod roles;
mod users;


/// Application service behind the user, role and permission screens.
///
/// Every use case loads fresh snapshots, consults the domain rules and only
/// then issues writes. Nothing is cached between calls.
#[derive(Clone)]
pub struct DirectoryAdminService {
    client: Arc<dyn DirectoryClient>,
}

impl DirectoryAdminService {
    /// Creates a new service over a directory client.
    #[must_use]
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }

    /// Loads the users snapshot.
    pub async fn load_users(&self) -> AppResult<Vec<User>> {
        self.client.list_users().await
    }

    /// Loads the roles snapshot.
    pub async fn load_roles(&self) -> AppResult<Vec<Role>> {
        self.client.list_roles().await
    }

    /// Loads the permissions snapshot.
    pub async fn load_permissions(&self) -> AppResult<Vec<Permission>> {
        self.client.list_permissions().await
    }

    /// Loads all three collections.
    pub async fn load_snapshot(&self) -> AppResult<DirectorySnapshot> {
        let (users, roles, permissions) = futures_util::try_join!(
            self.client.list_users(),
            self.client.list_roles(),
            self.client.list_permissions(),
        )?;

        Ok(DirectorySnapshot::new(users, roles, permissions))
    }
}
