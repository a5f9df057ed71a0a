use std::fmt::Display;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use rolekeeper_application::DirectoryClient;
use rolekeeper_core::{AppError, AppResult};
use rolekeeper_domain::{
    NewPermission, NewRole, NewUser, Permission, PermissionId, Role, RoleId, User, UserId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;


const USERS: &str = "users";
const ROLES: &str = "roles";
const PERMISSIONS: &str = "permissions";

/// REST adapter for the remote directory service.
///
/// Requests are sent once; failures surface as [`AppError::Transport`].
pub struct HttpDirectoryClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        Self {
            http_client,
            base_url,
        }
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!(
                "failed to build directory URL for '{path}': {error}"
            ))
        })
    }

    fn record_url(&self, collection: &str, id: impl Display) -> AppResult<Url> {
        self.url(format!("{collection}/{id}").as_str())
    }

    async fn list<T: DeserializeOwned>(&self, collection: &str) -> AppResult<Vec<T>> {
        let url = self.url(collection)?;
        let response = self
            .send(self.http_client.get(url.clone()), &Method::GET, &url)
            .await?;
        decode(response, &url).await
    }

    async fn create<B, T>(&self, collection: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(collection)?;
        let response = self
            .send(
                self.http_client.post(url.clone()).json(body),
                &Method::POST,
                &url,
            )
            .await?;
        decode(response, &url).await
    }

    async fn replace<B, T>(&self, collection: &str, id: impl Display, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.record_url(collection, id)?;
        let response = self
            .send(
                self.http_client.put(url.clone()).json(body),
                &Method::PUT,
                &url,
            )
            .await?;
        decode(response, &url).await
    }

    async fn remove(&self, collection: &str, id: impl Display) -> AppResult<()> {
        let url = self.record_url(collection, id)?;
        self.send(self.http_client.delete(url.clone()), &Method::DELETE, &url)
            .await
            .map(|_| ())
    }

    async fn send(&self, request: RequestBuilder, method: &Method, url: &Url) -> AppResult<Response> {
        debug!(%method, %url, "directory request");

        let response = request.send().await.map_err(|error| {
            warn!(%method, %url, error = %error, "directory request failed");
            AppError::Transport(format!("{method} {url} failed: {error}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        warn!(%method, %url, %status, "directory request rejected");
        Err(AppError::Transport(format!(
            "{method} {url} returned {status}: {body}"
        )))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> AppResult<T> {
    response.json::<T>().await.map_err(|error| {
        AppError::Transport(format!("invalid response body from {url}: {error}"))
    })
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.list(USERS).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        self.create(USERS, &user).await
    }

    async fn update_user(&self, user: User) -> AppResult<User> {
        self.replace(USERS, user.id, &user).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.remove(USERS, user_id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.list(ROLES).await
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        self.create(ROLES, &role).await
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        self.replace(ROLES, role.id, &role).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.remove(ROLES, role_id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list(PERMISSIONS).await
    }

    async fn create_permission(&self, permission: NewPermission) -> AppResult<Permission> {
        self.create(PERMISSIONS, &permission).await
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<Permission> {
        self.replace(PERMISSIONS, permission.id, &permission).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.remove(PERMISSIONS, permission_id).await
    }
}
