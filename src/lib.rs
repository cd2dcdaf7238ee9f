pub mod config;
pub mod core;
pub mod errors;
pub mod session;

// Re-export commonly used items for convenience
pub use config::StudioConfig;
pub use self::core::*;
pub use errors::{StudioError, StudioResult};
pub use session::StudioSession;
