use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;
use std::sync::{Arc, Mutex};

pub const SITEBOOK_ACCESS: &str = "sitebook_access";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn base_cookie(value: &str) -> cookie::CookieBuilder<'_> {
    Cookie::build((SITEBOOK_ACCESS, value))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .secure(cookie_secure())
}

/// Set-Cookie value that expires the access cookie.
pub fn build_clear_cookie() -> Option<HeaderValue> {
    let cookie = base_cookie("").max_age(cookie::time::Duration::ZERO).build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Extract the access token from the cookie (preferred) or Bearer header.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SITEBOOK_ACCESS) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Parse a specific cookie value from the Cookie header(s).
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Slot the middleware inserts into request extensions; a server function
/// marks it to have the access cookie cleared on the way out.
#[derive(Clone, Debug, Default)]
pub struct ClearCookieSlot(pub Arc<Mutex<bool>>);

impl ClearCookieSlot {
    pub fn take(&self) -> bool {
        self.0
            .lock()
            .map(|mut flag| std::mem::take(&mut *flag))
            .unwrap_or(false)
    }
}

/// Ask the middleware to clear the access cookie for the current request.
pub fn schedule_clear_cookie() {
    if let Some(ctx) = dioxus::fullstack::FullstackContext::current() {
        let parts = ctx.parts_mut();
        if let Some(slot) = parts.extensions.get::<ClearCookieSlot>() {
            if let Ok(mut flag) = slot.0.lock() {
                *flag = true;
            }
        }
    }
}
