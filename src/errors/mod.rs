pub mod studio_error;

pub use studio_error::{StudioError, StudioResult};
