use dioxus::prelude::*;
use shared_types::{AuthUser, FeatureFlags, RoleCapabilities};

#[cfg(feature = "server")]
use super::auth::*;

/// Get the current feature flags. No auth required; flags are not sensitive.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}

/// The signed-in user, or `None` when there is no valid session.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    let Ok(claims) = require_auth() else {
        return Ok(None);
    };

    let user = fetch_auth_user(claims.sub).await?;
    if user.is_none() {
        tracing::warn!(user_id = claims.sub, "token refers to a missing user");
        crate::auth::cookies::schedule_clear_cookie();
    }
    Ok(user)
}

/// Sign out by expiring the access cookie.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    crate::auth::cookies::schedule_clear_cookie();
    Ok(())
}

/// The role vocabulary with each role's resolved capabilities.
#[server]
pub async fn list_roles() -> Result<Vec<RoleCapabilities>, ServerFnError> {
    Ok(shared_types::ALL_ROLES
        .iter()
        .copied()
        .map(RoleCapabilities::from)
        .collect())
}
