use shared_types::{AppError, ProjectMember, ProjectRole};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::Viewer;
use crate::error_convert::SqlxErrorExt;

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: i64,
    username: String,
    display_name: String,
    email: String,
    role: String,
}

impl From<MemberRow> for ProjectMember {
    fn from(row: MemberRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            display_name: row.display_name,
            email: row.email,
            role: ProjectRole::parse(&row.role),
        }
    }
}

const MEMBER_SELECT: &str = r#"
    SELECT m.user_id, u.username, u.display_name, u.email, m.role
    FROM project_members m
    JOIN users u ON u.id = m.user_id
"#;

/// Members of a project, ordered by display name.
pub async fn list(pool: &Pool<Postgres>, project_id: Uuid) -> Result<Vec<ProjectMember>, AppError> {
    let rows = sqlx::query_as::<_, MemberRow>(&format!(
        "{MEMBER_SELECT} WHERE m.project_id = $1 ORDER BY u.display_name, m.user_id"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows.into_iter().map(ProjectMember::from).collect())
}

/// The role string `viewer` holds on a project, or `None` when the viewer
/// has no access. Platform administrators hold `admin` on every existing
/// project. The raw string is returned so stale roles resolve to nothing.
pub async fn role_of(
    pool: &Pool<Postgres>,
    viewer: Viewer,
    project_id: Uuid,
) -> Result<Option<String>, AppError> {
    let role = sqlx::query_scalar::<_, String>(
        r#"
        SELECT CASE WHEN $3 THEN 'admin'::TEXT ELSE m.role END
        FROM projects p
        LEFT JOIN project_members m ON m.project_id = p.id AND m.user_id = $2
        WHERE p.id = $1 AND ($3 OR m.user_id IS NOT NULL)
        "#,
    )
    .bind(project_id)
    .bind(viewer.user_id)
    .bind(viewer.platform_admin)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(role)
}

/// The stored role of `user_id` on a project, or `None` for non-members.
pub async fn member_role(
    pool: &Pool<Postgres>,
    project_id: Uuid,
    user_id: i64,
) -> Result<Option<String>, AppError> {
    sqlx::query_scalar::<_, String>(
        "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// True when applying `new_role` to `target` (or removing them, on `None`)
/// would leave the project without a project manager.
pub fn would_orphan_project(
    members: &[(i64, Option<ProjectRole>)],
    target: i64,
    new_role: Option<ProjectRole>,
) -> bool {
    let is_manager = |role: &Option<ProjectRole>| *role == Some(ProjectRole::ProjectManager);
    let target_is_manager = members
        .iter()
        .any(|(id, role)| *id == target && is_manager(role));
    if !target_is_manager || is_manager(&new_role) {
        return false;
    }
    members.iter().filter(|(_, role)| is_manager(role)).count() <= 1
}

/// Lock the project's membership rows and return (user, role) pairs.
async fn lock_members(
    conn: &mut PgConnection,
    project_id: Uuid,
) -> Result<Vec<(i64, Option<ProjectRole>)>, AppError> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT user_id, role FROM project_members WHERE project_id = $1 FOR UPDATE",
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows
        .into_iter()
        .map(|(user_id, role)| (user_id, ProjectRole::parse(&role)))
        .collect())
}

fn last_manager_error() -> AppError {
    AppError::conflict("A project must keep at least one project manager")
}

/// Assign `role` to `user_id` on a project, adding the membership if needed.
pub async fn set_role(
    pool: &Pool<Postgres>,
    project_id: Uuid,
    user_id: i64,
    role: ProjectRole,
) -> Result<ProjectMember, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let members = lock_members(&mut tx, project_id).await?;
    if would_orphan_project(&members, user_id, Some(role)) {
        return Err(last_manager_error());
    }

    sqlx::query(
        r#"
        INSERT INTO project_members (project_id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (project_id, user_id) DO UPDATE SET role = EXCLUDED.role
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .bind(role.as_str())
    .execute(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let member = sqlx::query_as::<_, MemberRow>(&format!(
        "{MEMBER_SELECT} WHERE m.project_id = $1 AND m.user_id = $2"
    ))
    .bind(project_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(member.into())
}

/// Revoke a membership. Returns true if the user was a member.
pub async fn remove(pool: &Pool<Postgres>, project_id: Uuid, user_id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let members = lock_members(&mut tx, project_id).await?;
    if would_orphan_project(&members, user_id, None) {
        return Err(last_manager_error());
    }

    let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
