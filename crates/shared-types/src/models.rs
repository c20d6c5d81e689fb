use serde::{Deserialize, Serialize};

/// Account-level role, independent of any project membership.
///
/// - `User`: sees only the projects they are a member of.
/// - `Admin`: platform operator; sees every project with admin rights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PlatformRole {
    #[default]
    User,
    Admin,
}

impl PlatformRole {
    /// Parse from the JWT `role` claim. Unknown values default to `User`.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => PlatformRole::Admin,
            _ => PlatformRole::User,
        }
    }

    /// Lowercase string for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformRole::User => "user",
            PlatformRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, PlatformRole::Admin)
    }
}

/// A user account row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

/// Authenticated user info (safe to send to client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: PlatformRole,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: PlatformRole::from_str_or_default(&user.role),
            username: user.username,
            display_name: user.display_name,
            email: user.email,
        }
    }
}
