pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{prompt::ScanDatePrompt, storage::LocalStorage};
pub use app::pipelines::ReviewQueuePipeline;
pub use config::TomlConfig;
pub use crate::core::{etl::EtlEngine, scan_bound::ScanBound};
pub use domain::model::{MalformedRowPolicy, ReviewEntry, WorkOrderRecord};
pub use utils::error::{EtlError, Result};
