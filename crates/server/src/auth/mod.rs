pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod project_access;
