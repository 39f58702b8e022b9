pub mod constants;
pub mod errors;
pub mod methods;
pub mod types;

pub use errors::ValidationError;
pub use types::{ConfigManager, Settings};
