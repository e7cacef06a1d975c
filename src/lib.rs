pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::cli::LocalStorage;
pub use config::sync_config::SyncConfig;
pub use crate::core::{runner::SyncRunner, transformer::SyncTransformer};
pub use domain::model::{Record, SyncMapping, SyncOutcome};
pub use utils::error::{ErpError, Result};
