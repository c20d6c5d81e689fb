use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// PostgreSQL SQLSTATE codes the store maps to client errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Human-readable message for a unique constraint violation.
fn unique_violation_message(constraint: &str) -> &'static str {
    if constraint.contains("projects_creator_name") {
        "Its creator already has a project with this name"
    } else if constraint.contains("project_holidays") {
        "The same holiday date is listed twice"
    } else if constraint.contains("email") {
        "An account with this email already exists"
    } else if constraint.contains("username") {
        "This username is already taken"
    } else {
        "A record with this value already exists"
    }
}

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    let detail = if constraint.is_empty() {
                        db_err.message()
                    } else {
                        constraint
                    };
                    AppError::conflict(unique_violation_message(detail))
                }
                Some(FOREIGN_KEY_VIOLATION) if constraint.contains("user_id") => {
                    AppError::not_found("User not found")
                }
                Some(FOREIGN_KEY_VIOLATION) => AppError::not_found("Referenced record not found"),
                Some(CHECK_VIOLATION) => AppError::bad_request(db_err.message().to_string()),
                _ => AppError::database(err.to_string()),
            }
        }
        _ => AppError::database(err.to_string()),
    }
}

/// Convert an AppError into a ServerFnError by serializing as JSON.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Extension trait providing `.into_server_fn_error()` on AppError.
pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
