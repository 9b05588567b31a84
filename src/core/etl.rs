use crate::core::{EtlSummary, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

const PREVIEW_ROWS: usize = 10;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EtlSummary> {
        let started = Instant::now();
        tracing::info!("🚀 Starting wallet age lookup");

        // Extract
        let requests = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} wallets", requests.len());

        // Transform
        let output = self.pipeline.transform(requests).await?;
        let total = output.rows.len();
        let succeeded = output.succeeded();
        let failed = output.failed();
        let preview = output.rows.iter().take(PREVIEW_ROWS).cloned().collect();
        tracing::info!("🔧 Looked up {} wallets ({} ok, {} failed)", total, succeeded, failed);

        // Load
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("💾 Output saved to: {} in {:?}", output_path, started.elapsed());

        Ok(EtlSummary {
            output_path,
            total,
            succeeded,
            failed,
            preview,
        })
    }
}
