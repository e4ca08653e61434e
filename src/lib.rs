pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{HttpWebClient, LocalStorage};
pub use crate::core::{batch::BatchPipeline, enricher::CompanyEnricher, etl::EtlEngine};
pub use utils::error::{EnrichError, Result};
