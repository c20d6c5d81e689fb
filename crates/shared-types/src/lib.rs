pub mod error;
pub mod feature_flags;
pub mod models;

// Access control and project selection
pub mod permissions;
pub mod project;
pub mod role;
pub mod session;
pub mod settings;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

pub use permissions::*;
pub use project::*;
pub use role::*;
pub use session::*;
pub use settings::*;
