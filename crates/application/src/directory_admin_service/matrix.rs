use super::*;

use rolekeeper_domain::RelationshipMatrix;

impl DirectoryAdminService {
    /// Builds the user-to-role matrix from fresh snapshots.
    pub async fn user_role_matrix(&self) -> AppResult<RelationshipMatrix> {
        let (users, roles) =
            futures_util::try_join!(self.client.list_users(), self.client.list_roles())?;
        Ok(RelationshipMatrix::user_roles(&users, &roles))
    }

    /// Builds the role-to-permission matrix from fresh snapshots.
    pub async fn role_permission_matrix(&self) -> AppResult<RelationshipMatrix> {
        let (roles, permissions) =
            futures_util::try_join!(self.client.list_roles(), self.client.list_permissions())?;
        Ok(RelationshipMatrix::role_permissions(&roles, &permissions))
    }
}
