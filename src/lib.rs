pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::pipelines::WalletAgePipeline;
pub use config::chain_config::{Chain, ChainConfig};
pub use config::{cli::LocalStorage, CliConfig};
pub use core::{batch::BatchRunner, etl::EtlEngine, lookup::LookupService};
pub use utils::error::{EtlError, LookupError, Result};
