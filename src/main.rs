use clap::Parser;
use std::collections::BTreeMap;
use std::time::Duration;
use wallet_age_etl::core::{EtlSummary, Pipeline};
use wallet_age_etl::utils::{logger, validation::Validate};
use wallet_age_etl::{
    ChainConfig, CliConfig, EtlEngine, EtlError, LocalStorage, LookupService, WalletAgePipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting wallet-age CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        report_and_exit("Configuration validation failed", &e);
    }

    let chains = match load_chain_config(&config).and_then(|c| c.validate().map(|_| c)) {
        Ok(chains) => chains,
        Err(e) => report_and_exit("Chain configuration invalid", &e),
    };

    let configured = chains.configured_chains();
    if configured.is_empty() {
        tracing::warn!("⚠️ No chain has an API key; every row will be reported as unsupported");
    } else {
        tracing::info!(
            "🔑 Configured chains: {}",
            configured.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    let dry_run = config.dry_run;
    let storage = LocalStorage::new(".");
    let pipeline = WalletAgePipeline::new(storage, config, LookupService::new(chains));

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be made");
        if let Err(e) = perform_dry_run(&pipeline).await {
            report_and_exit("Dry run failed", &e);
        }
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(summary) => display_summary(&summary),
        Err(e) => report_and_exit("Wallet age lookup failed", &e),
    }

    Ok(())
}

/// 所有批次層級錯誤都由此輸出並以對應的結束碼離開
fn report_and_exit(context: &str, e: &EtlError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn load_chain_config(config: &CliConfig) -> wallet_age_etl::Result<ChainConfig> {
    let chains = match &config.chains_config {
        Some(path) => {
            tracing::info!("📁 Loading chain configuration from: {}", path);
            ChainConfig::from_file(path)?
        }
        None => {
            tracing::info!("📁 Reading API keys from environment");
            ChainConfig::from_env()
        }
    };

    Ok(match config.timeout_seconds {
        Some(secs) => chains.with_timeout(Duration::from_secs(secs)),
        None => chains,
    })
}

async fn perform_dry_run(
    pipeline: &WalletAgePipeline<LocalStorage, CliConfig, LookupService>,
) -> wallet_age_etl::Result<()> {
    let requests = pipeline.extract().await?;
    let chains = pipeline.lookup().config();

    let mut per_chain: BTreeMap<String, usize> = BTreeMap::new();
    for request in &requests {
        *per_chain.entry(request.chain.to_lowercase()).or_default() += 1;
    }

    println!("🔍 Dry Run Analysis:");
    println!("  Wallets: {}", requests.len());
    println!("  Timeout: {:?} per request", chains.timeout());
    println!("  Output: {}", pipeline.output_location());
    println!();
    for (chain, count) in &per_chain {
        let status = if chains.is_configured(chain) {
            "✅ configured"
        } else {
            "❌ unsupported or missing API key"
        };
        println!("  {:<12} {:>6} wallets  {}", chain, count, status);
    }

    Ok(())
}

fn display_summary(summary: &EtlSummary) {
    println!(
        "✅ Done! {} wallets processed ({} ok, {} failed)",
        summary.total, summary.succeeded, summary.failed
    );
    println!("📁 Output saved to: {}", summary.output_path);

    if summary.preview.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<44} {:<10} {:<12} {:>8}  error",
        "wallet_address", "chain", "first_tx", "age_days"
    );
    for row in &summary.preview {
        println!(
            "{:<44} {:<10} {:<12} {:>8}  {}",
            row.wallet_address,
            row.chain,
            row.first_transaction.as_deref().unwrap_or("-"),
            row.wallet_age_days
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.error.as_deref().unwrap_or("")
        );
    }
    if summary.total > summary.preview.len() {
        println!(
            "... {} more rows in the output file",
            summary.total - summary.preview.len()
        );
    }
}
