use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{AccessibleProject, AppError, Project, ProjectRequest, ProjectRole, WorkingWeek};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::{holiday, Viewer};
use crate::error_convert::SqlxErrorExt;

const PROJECT_COLUMNS: &str = "p.id, p.name, p.code, p.description, p.location, \
     p.start_date, p.end_date, p.working_days, p.hours_per_day, p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    code: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    working_days: i16,
    hours_per_day: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role: Option<String>,
}

impl From<ProjectRow> for AccessibleProject {
    fn from(row: ProjectRow) -> Self {
        Self {
            role: row.role.as_deref().and_then(ProjectRole::parse),
            project: Project {
                id: row.id.to_string(),
                name: row.name,
                code: row.code,
                description: row.description,
                location: row.location,
                start_date: row.start_date,
                end_date: row.end_date,
                working_week: WorkingWeek::from_bits((row.working_days & 0x7F) as u8),
                hours_per_day: row.hours_per_day,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Blank optional text becomes NULL.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Projects visible to `viewer`, joined with the viewer's role, ordered by
/// name. Viewers holding can-view-all-projects through their platform role
/// (platform administrators) see every project as `admin`.
pub async fn list_for_user(
    pool: &Pool<Postgres>,
    viewer: Viewer,
) -> Result<Vec<AccessibleProject>, AppError> {
    let result = if viewer.sees_all_projects() {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS}, 'admin'::TEXT AS role FROM projects p ORDER BY p.name, p.id"
        ))
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}, m.role
            FROM projects p
            JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.name, p.id
            "#
        ))
        .bind(viewer.user_id)
        .fetch_all(pool)
        .await
    };
    let rows = result.map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows.into_iter().map(AccessibleProject::from).collect())
}

/// One project as seen by `viewer`; `None` when it does not exist or the
/// viewer is not a member.
pub async fn find_for_user(
    pool: &Pool<Postgres>,
    viewer: Viewer,
    id: Uuid,
) -> Result<Option<AccessibleProject>, AppError> {
    let mut conn = pool.acquire().await.map_err(SqlxErrorExt::into_app_error)?;
    find_on(&mut conn, viewer, id).await
}

async fn find_on(
    conn: &mut PgConnection,
    viewer: Viewer,
    id: Uuid,
) -> Result<Option<AccessibleProject>, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        r#"
        SELECT {PROJECT_COLUMNS},
               CASE WHEN $3 THEN 'admin'::TEXT ELSE m.role END AS role
        FROM projects p
        LEFT JOIN project_members m ON m.project_id = p.id AND m.user_id = $2
        WHERE p.id = $1 AND ($3 OR m.user_id IS NOT NULL)
        "#
    ))
    .bind(id)
    .bind(viewer.user_id)
    .bind(viewer.platform_admin)
    .fetch_optional(&mut *conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.map(AccessibleProject::from))
}

/// Create a project, make `viewer` its project manager, and store its
/// holidays, in one transaction.
pub async fn create(
    pool: &Pool<Postgres>,
    viewer: Viewer,
    req: &ProjectRequest,
) -> Result<AccessibleProject, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO projects
            (name, code, description, location, start_date, end_date, working_days, hours_per_day,
             created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(req.name.trim())
    .bind(non_blank(&req.code))
    .bind(non_blank(&req.description))
    .bind(non_blank(&req.location))
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.working_week.bits() as i16)
    .bind(req.hours_per_day)
    .bind(viewer.user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(viewer.user_id)
        .bind(ProjectRole::ProjectManager.as_str())
        .execute(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    holiday::replace_all(&mut tx, id, &req.holidays).await?;

    let created = find_on(&mut tx, viewer, id)
        .await?
        .ok_or_else(|| AppError::internal("Created project could not be read back"))?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(created)
}

/// Update the project record and replace its holidays, in one transaction.
/// Returns `None` when the project does not exist.
pub async fn update(
    pool: &Pool<Postgres>,
    viewer: Viewer,
    id: Uuid,
    req: &ProjectRequest,
) -> Result<Option<AccessibleProject>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let result = sqlx::query(
        r#"
        UPDATE projects
        SET name = $2, code = $3, description = $4, location = $5,
            start_date = $6, end_date = $7, working_days = $8, hours_per_day = $9,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.name.trim())
    .bind(non_blank(&req.code))
    .bind(non_blank(&req.description))
    .bind(non_blank(&req.location))
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.working_week.bits() as i16)
    .bind(req.hours_per_day)
    .execute(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    holiday::replace_all(&mut tx, id, &req.holidays).await?;
    let updated = find_on(&mut tx, viewer, id).await?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(updated)
}

/// Delete a project with its memberships and holidays, in one transaction.
/// Returns true if the project existed.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    for table in ["project_holidays", "project_members"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE project_id = $1"))
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
    }

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}
