use crate::domain::model::{BatchOutput, LookupRequest, LookupResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
}

/// Resolves a single wallet. Implementations fold every failure into the result.
#[async_trait]
pub trait WalletLookup: Send + Sync {
    async fn lookup(&self, chain: &str, address: &str) -> LookupResult;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<LookupRequest>>;
    async fn transform(&self, data: Vec<LookupRequest>) -> Result<BatchOutput>;
    async fn load(&self, result: BatchOutput) -> Result<String>;
}
