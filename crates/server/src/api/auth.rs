// Server-only auth helpers shared across the api/* modules.

use dioxus::prelude::*;
use shared_types::{AppError, AuthUser, User};

use crate::auth::jwt::Claims;
use crate::db::get_db;
use crate::error_convert::{AppErrorExt, SqlxErrorExt};

/// Claims of the calling user, or an "Authentication required" error.
/// Reads what the auth middleware validated, falling back to parsing the
/// cookie or Bearer header directly.
pub(crate) fn require_auth() -> Result<Claims, ServerFnError> {
    use crate::auth::{cookies, jwt};

    let ctx = dioxus::fullstack::FullstackContext::current()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    let parts = ctx.parts_mut();

    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Ok(claims.clone());
    }

    let token = cookies::extract_access_token(&parts.headers)
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    jwt::validate_access_token(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token").into_server_fn_error())
}

/// Load the user row for `user_id`; `None` if the account no longer exists.
pub(crate) async fn fetch_auth_user(user_id: i64) -> Result<Option<AuthUser>, ServerFnError> {
    let db = get_db().await;
    let user = sqlx::query_as::<_, (i64, String, String, String, String)>(
        "SELECT id, username, display_name, email, role FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())?;

    Ok(user.map(|(id, username, display_name, email, role)| {
        AuthUser::from(User {
            id,
            username,
            display_name,
            email,
            role,
        })
    }))
}

/// Carry a service error across the server-function boundary.
pub(crate) fn to_sfn<T>(result: Result<T, AppError>) -> Result<T, ServerFnError> {
    result.map_err(AppErrorExt::into_server_fn_error)
}
