pub mod export;
pub mod field_path;
pub mod filter;
pub mod runner;
pub mod sources;
pub mod transformer;

pub use crate::domain::model::{Record, SyncMapping, SyncOutcome};
pub use crate::domain::ports::{RecordSource, Storage};
pub use crate::utils::error::Result;
