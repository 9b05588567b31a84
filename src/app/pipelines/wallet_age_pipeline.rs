use crate::core::batch::{encode_rows, read_requests, BatchRunner};
use crate::core::{
    BatchOutput, ConfigProvider, LookupRequest, OutputFormat, Pipeline, Storage, WalletLookup,
};
use crate::utils::error::Result;
use std::path::Path;

/// CSV 輸入 → 逐列查詢 → CSV/JSON 輸出
pub struct WalletAgePipeline<S: Storage, C: ConfigProvider, L: WalletLookup> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) lookup: L,
}

impl<S: Storage, C: ConfigProvider, L: WalletLookup> WalletAgePipeline<S, C, L> {
    pub fn new(storage: S, config: C, lookup: L) -> Self {
        Self {
            storage,
            config,
            lookup,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// JSON output swaps a `.csv` file name for `.json`.
    pub fn output_location(&self) -> String {
        let file_name = Path::new(self.config.output_file());
        let file_name = match self.config.output_format() {
            OutputFormat::Json if has_extension(file_name, "csv") => {
                file_name.with_extension("json")
            }
            _ => file_name.to_path_buf(),
        };

        Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: WalletLookup> Pipeline for WalletAgePipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<LookupRequest>> {
        tracing::debug!("Reading input CSV: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        read_requests(&data)
    }

    async fn transform(&self, data: Vec<LookupRequest>) -> Result<BatchOutput> {
        let rows = BatchRunner::new(&self.lookup).run(data).await;
        Ok(BatchOutput { rows })
    }

    async fn load(&self, result: BatchOutput) -> Result<String> {
        let output_path = self.output_location();
        let data = encode_rows(&result.rows, self.config.output_format())?;

        self.storage.write_file(&output_path, &data).await?;
        Ok(output_path)
    }
}
