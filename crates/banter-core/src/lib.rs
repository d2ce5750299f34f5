pub mod config;
pub mod error;
pub mod types;

pub use config::BanterConfig;
pub use error::{BanterError, Result};
pub use types::*;
