pub mod config;
pub mod error;
pub mod types;

pub use config::BullsConfig;
pub use error::{BullsError, Result};
pub use types::*;
