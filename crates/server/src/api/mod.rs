#[cfg(feature = "server")]
pub(crate) mod auth;

mod account;
pub use account::*;

mod project;
pub use project::*;

mod membership;
pub use membership::*;
