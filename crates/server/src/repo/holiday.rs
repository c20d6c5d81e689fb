use chrono::NaiveDate;
use shared_types::{AppError, ProjectHoliday};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

#[derive(sqlx::FromRow)]
struct HolidayRow {
    date: NaiveDate,
    description: Option<String>,
}

impl From<HolidayRow> for ProjectHoliday {
    fn from(row: HolidayRow) -> Self {
        Self {
            date: row.date,
            description: row.description,
        }
    }
}

/// List a project's holidays in date order.
pub async fn list(pool: &Pool<Postgres>, project_id: Uuid) -> Result<Vec<ProjectHoliday>, AppError> {
    let rows = sqlx::query_as::<_, HolidayRow>(
        r#"
        SELECT date, description
        FROM project_holidays
        WHERE project_id = $1
        ORDER BY date
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows.into_iter().map(ProjectHoliday::from).collect())
}

/// Replace a project's holidays. Runs on the caller's transaction.
pub(crate) async fn replace_all(
    conn: &mut PgConnection,
    project_id: Uuid,
    holidays: &[ProjectHoliday],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM project_holidays WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    for holiday in holidays {
        sqlx::query(
            r#"
            INSERT INTO project_holidays (project_id, date, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(project_id)
        .bind(holiday.date)
        .bind(holiday.description.as_deref())
        .execute(&mut *conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    }

    Ok(())
}
