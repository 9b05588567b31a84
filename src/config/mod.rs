pub mod chain_config;
pub mod cli;

use crate::domain::ports::{ConfigProvider, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, validate_range, Validate};

pub const DEFAULT_OUTPUT_FILE: &str = "wallet_ages_output.csv";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(feature = "cli", command(name = "wallet-age"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Look up the first transaction date and age of EVM wallets listed in a CSV")
)]
pub struct CliConfig {
    /// CSV file with `wallet_address` and `chain` columns
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_OUTPUT_FILE))]
    pub output_file: String,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = OutputFormat::Csv))]
    pub format: OutputFormat,

    /// TOML file with [api_keys] / [base_urls]; falls back to *SCAN_API_KEY env vars
    #[cfg_attr(feature = "cli", arg(long))]
    pub chains_config: Option<String>,

    /// Per-request timeout, overrides the chain config
    #[cfg_attr(feature = "cli", arg(long))]
    pub timeout_seconds: Option<u64>,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub log_json: bool,

    /// Parse input and configuration only, no requests and no output file
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        Ok(())
    }
}
