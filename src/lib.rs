pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{AppConfig, PLACEHOLDER_WEBHOOK_URL};

pub use crate::adapters::{ConsoleHost, MattermostSink};
pub use crate::core::{CartEngine, Catalog, CheckoutDispatcher};
pub use crate::utils::error::{CartError, Result};
