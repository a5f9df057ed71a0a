use rolekeeper_domain::{CorrectivePlan, Permission, RelationshipMatrix, Role, User};

pub fn users_table(users: &[User]) -> String {
    table(
        &["ID", "NAME", "EMAIL", "ROLE", "STATUS"],
        users
            .iter()
            .map(|user| {
                vec![
                    user.id.to_string(),
                    user.name.clone(),
                    user.email.clone(),
                    user.role.clone(),
                    user.status.as_str().to_owned(),
                ]
            })
            .collect(),
    )
}

pub fn roles_table(roles: &[Role]) -> String {
    table(
        &["ID", "NAME", "PERMISSIONS"],
        roles
            .iter()
            .map(|role| {
                vec![
                    role.id.to_string(),
                    role.name.clone(),
                    role.permissions.join(", "),
                ]
            })
            .collect(),
    )
}

pub fn permissions_table(permissions: &[Permission]) -> String {
    table(
        &["ID", "NAME", "DESCRIPTION"],
        permissions
            .iter()
            .map(|permission| {
                vec![
                    permission.id.to_string(),
                    permission.name.clone(),
                    permission.description.clone(),
                ]
            })
            .collect(),
    )
}

pub fn matrix_table(corner: &str, matrix: &RelationshipMatrix) -> String {
    if matrix.is_empty() {
        return format!("(no {corner} data)\n");
    }

    let mut headers = vec![corner];
    headers.extend(matrix.columns.iter().map(String::as_str));

    table(
        &headers,
        matrix
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.label.clone())
                    .chain(
                        row.cells
                            .iter()
                            .map(|cell| (if *cell { "x" } else { "-" }).to_owned()),
                    )
                    .collect()
            })
            .collect(),
    )
}

pub fn permission_warning(plan: &CorrectivePlan) -> String {
    let mut warning = format!(
        "Warning: permission \"{}\" is used by the following roles:\n",
        plan.permission_name
    );
    for name in plan.affected_role_names() {
        warning.push_str("  - ");
        warning.push_str(name);
        warning.push('\n');
    }
    warning.push_str("It will be removed from these roles before it is deleted.\n");
    warning
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, headers.iter().copied(), &widths);
    for row in &rows {
        push_line(&mut output, row.iter().map(String::as_str), &widths);
    }
    output
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use rolekeeper_domain::{
        CorrectivePlan, PermissionId, RelationshipMatrix, Role, RoleId, User, UserId, UserStatus,
    };

    use super::{matrix_table, permission_warning, users_table};

    #[test]
    fn users_table_prints_dangling_role_verbatim() {
        let users = vec![User {
            id: UserId::new(12),
            name: "Bob".to_owned(),
            email: "bob@example.com".to_owned(),
            role: "Ghost".to_owned(),
            status: UserStatus::Inactive,
        }];

        assert_eq!(
            users_table(&users),
            "ID  NAME  EMAIL            ROLE   STATUS\n12  Bob   bob@example.com  Ghost  Inactive\n"
        );
    }

    #[test]
    fn matrix_marks_cells() {
        let matrix = RelationshipMatrix::user_roles(
            &[User {
                id: UserId::new(1),
                name: "Alice".to_owned(),
                email: String::new(),
                role: "Admin".to_owned(),
                status: UserStatus::Active,
            }],
            &[
                Role {
                    id: RoleId::new(1),
                    name: "Admin".to_owned(),
                    permissions: Vec::new(),
                },
                Role {
                    id: RoleId::new(2),
                    name: "Viewer".to_owned(),
                    permissions: Vec::new(),
                },
            ],
        );

        assert_eq!(
            matrix_table("USER", &matrix),
            "USER   Admin  Viewer\nAlice  x      -\n"
        );
    }

    #[test]
    fn warning_lists_affected_roles() {
        let plan = CorrectivePlan {
            permission_id: PermissionId::new(5),
            permission_name: "Write".to_owned(),
            affected_roles: vec![Role {
                id: RoleId::new(1),
                name: "Admin".to_owned(),
                permissions: vec!["Read".to_owned(), "Write".to_owned()],
            }],
            corrected_roles: Vec::new(),
        };

        let warning = permission_warning(&plan);
        assert!(warning.contains("\"Write\" is used by the following roles"));
        assert!(warning.contains("  - Admin\n"));
    }
}
