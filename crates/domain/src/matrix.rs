use crate::{Permission, Role, User};

/// One labelled row of a relationship matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    /// Row label, taken verbatim from the record name.
    pub label: String,
    /// One flag per column.
    pub cells: Vec<bool>,
}

/// Boolean grid relating two collections, in snapshot order on both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipMatrix {
    /// Column headers.
    pub columns: Vec<String>,
    /// Rows with one cell per column.
    pub rows: Vec<MatrixRow>,
}

impl RelationshipMatrix {
    /// Users as rows, roles as columns; a cell is set when the user holds the role.
    ///
    /// A user whose role matches no column gets an all-unset row.
    #[must_use]
    pub fn user_roles(users: &[User], roles: &[Role]) -> Self {
        Self {
            columns: roles.iter().map(|role| role.name.clone()).collect(),
            rows: users
                .iter()
                .map(|user| MatrixRow {
                    label: user.name.clone(),
                    cells: roles.iter().map(|role| user.role == role.name).collect(),
                })
                .collect(),
        }
    }

    /// Roles as rows, permissions as columns; a cell is set when the role lists the permission.
    #[must_use]
    pub fn role_permissions(roles: &[Role], permissions: &[Permission]) -> Self {
        Self {
            columns: permissions
                .iter()
                .map(|permission| permission.name.clone())
                .collect(),
            rows: roles
                .iter()
                .map(|role| MatrixRow {
                    label: role.name.clone(),
                    cells: permissions
                        .iter()
                        .map(|permission| role.grants(permission.name.as_str()))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Returns whether the matrix has no rows or no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}
