use super::*;

use rolekeeper_domain::{UserDraft, UserId, UserWrite, find_user};
use tracing::info;

impl DirectoryAdminService {
    /// Opens an existing user for editing with the role mapped to its identifier.
    pub async fn edit_user(&self, user_id: UserId) -> AppResult<UserDraft> {
        let (users, roles) =
            futures_util::try_join!(self.client.list_users(), self.client.list_roles())?;
        let user = find_user(&users, user_id)?;

        Ok(UserDraft::from_user(user, &roles))
    }

    /// Creates or replaces a user from an edit buffer.
    ///
    /// The selected role is resolved against a fresh roles snapshot; a
    /// selection that no longer exists fails before any write is sent.
    pub async fn save_user(&self, draft: &UserDraft) -> AppResult<User> {
        let roles = self.client.list_roles().await?;

        match draft.resolve(&roles)? {
            UserWrite::Create(user) => {
                let created = self.client.create_user(user).await?;
                info!(user_id = %created.id, role = %created.role, "user created");
                Ok(created)
            }
            UserWrite::Update(user) => {
                let updated = self.client.update_user(user).await?;
                info!(user_id = %updated.id, role = %updated.role, "user updated");
                Ok(updated)
            }
        }
    }

    /// Deletes a user. Users are never referenced by other records.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.client.delete_user(user_id).await?;
        info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}
