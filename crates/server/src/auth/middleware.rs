use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::cookies::{self, ClearCookieSlot};
use super::jwt::validate_access_token;

/// Permissive auth middleware.
///
/// Validates the access token from the cookie (or Bearer header) and inserts
/// the `Claims` into request extensions. Does NOT reject unauthenticated
/// requests; handlers decide through `AuthRequired` / `require_auth`.
/// Also inserts a [`ClearCookieSlot`] so a sign-out server function can
/// expire the cookie on the response.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    if let Some(token) = cookies::extract_access_token(req.headers()) {
        match validate_access_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid access token");
            }
        }
    }

    let slot = ClearCookieSlot::default();
    req.extensions_mut().insert(slot.clone());

    let mut response = next.run(req).await;

    if slot.take() {
        if let Some(value) = cookies::build_clear_cookie() {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
