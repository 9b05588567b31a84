use chrono::{Duration, Utc};
use httpmock::prelude::*;
use wallet_age_etl::config::DEFAULT_OUTPUT_FILE;
use wallet_age_etl::core::OutputFormat;
use wallet_age_etl::{
    Chain, ChainConfig, CliConfig, EtlEngine, EtlError, LocalStorage, LookupService,
    WalletAgePipeline,
};
use tempfile::TempDir;

fn cli_config(output_path: &str) -> CliConfig {
    CliConfig {
        input: "wallets.csv".to_string(),
        output_path: output_path.to_string(),
        output_file: DEFAULT_OUTPUT_FILE.to_string(),
        format: OutputFormat::Csv,
        chains_config: None,
        timeout_seconds: None,
        verbose: false,
        log_json: false,
        dry_run: false,
    }
}

fn explorer_body(timestamps: &[i64]) -> serde_json::Value {
    let result: Vec<serde_json::Value> = timestamps
        .iter()
        .map(|ts| serde_json::json!({"timeStamp": ts.to_string(), "hash": "0x00"}))
        .collect();
    serde_json::json!({"status": "1", "message": "OK", "result": result})
}

fn read_output(temp_dir: &TempDir) -> csv::Reader<std::fs::File> {
    let path = temp_dir.path().join("output").join(DEFAULT_OUTPUT_FILE);
    csv::Reader::from_path(path).unwrap()
}

#[tokio::test]
async fn test_end_to_end_mixed_batch() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("wallets.csv"),
        "wallet_address,chain,note\n\
         0xOld,Ethereum,first\n\
         0xFresh,polygon,second\n\
         0xNone,ethereum,third\n\
         0xSol,solana,fourth\n\
         0xBnb,BSC,fifth\n",
    )?;

    let eth_server = MockServer::start();
    let poly_server = MockServer::start();
    let old = Utc::now() - Duration::days(1500) - Duration::hours(2);

    let old_mock = eth_server.mock(|when, then| {
        when.method(GET).path("/api").query_param("address", "0xOld");
        then.status(200).json_body(explorer_body(&[old.timestamp()]));
    });
    let none_mock = eth_server.mock(|when, then| {
        when.method(GET).path("/api").query_param("address", "0xNone");
        then.status(200).json_body(serde_json::json!({
            "status": "0",
            "message": "No transactions found",
            "result": []
        }));
    });
    let fresh_mock = poly_server.mock(|when, then| {
        when.method(GET)
            .path("/api")
            .query_param("address", "0xFresh")
            .query_param("apikey", "poly-key");
        then.status(200).json_body(explorer_body(&[Utc::now().timestamp() - 60]));
    });

    // bsc intentionally has no key
    let chains = ChainConfig::new([(Chain::Ethereum, "eth-key"), (Chain::Polygon, "poly-key")])
        .with_base_url(Chain::Ethereum, eth_server.url("/api"))
        .with_base_url(Chain::Polygon, poly_server.url("/api"));

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline =
        WalletAgePipeline::new(storage, cli_config("output"), LookupService::new(chains));
    let summary = EtlEngine::new(pipeline).run().await?;

    old_mock.assert();
    none_mock.assert();
    fresh_mock.assert();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 3);

    let mut reader = read_output(&temp_dir);
    assert_eq!(
        reader.headers()?.iter().collect::<Vec<_>>(),
        vec!["wallet_address", "chain", "first_transaction", "wallet_age_days", "error"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 5);

    let old_date = old.date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(&rows[0][0], "0xOld");
    assert_eq!(&rows[0][1], "ethereum");
    assert_eq!(&rows[0][2], old_date.as_str());
    assert_eq!(&rows[0][3], "1500");
    assert_eq!(&rows[0][4], "");

    assert_eq!(&rows[1][0], "0xFresh");
    assert_eq!(&rows[1][3], "0");

    assert_eq!(&rows[2][0], "0xNone");
    assert_eq!(&rows[2][2], "");
    assert_eq!(&rows[2][3], "");
    assert_eq!(&rows[2][4], "No transactions or invalid wallet.");

    assert_eq!(&rows[3][4], "Unsupported or missing API key for chain: solana");
    assert_eq!(&rows[4][1], "bsc");
    assert_eq!(&rows[4][4], "Unsupported or missing API key for chain: bsc");

    Ok(())
}

#[tokio::test]
async fn test_missing_columns_halts_before_any_request() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("wallets.csv"),
        "address,network\n0x1,ethereum\n",
    )
    .unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api");
        then.status(200).json_body(explorer_body(&[1_600_000_000]));
    });

    let chains = ChainConfig::new([(Chain::Ethereum, "eth-key")])
        .with_base_url(Chain::Ethereum, server.url("/api"));
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline =
        WalletAgePipeline::new(storage, cli_config("output"), LookupService::new(chains));

    let result = EtlEngine::new(pipeline).run().await;

    api_mock.assert_hits(0);
    assert!(matches!(result, Err(EtlError::ValidationError { .. })));
    assert!(!temp_dir.path().join("output").join(DEFAULT_OUTPUT_FILE).exists());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("wallets.csv"),
        "wallet_address,chain\n0xA,ethereum\n0xB,ethereum\n",
    )
    .unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api");
        then.status(200).json_body(explorer_body(&[1_500_000_000, 1_600_000_000]));
    });

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let chains = ChainConfig::new([(Chain::Ethereum, "eth-key")])
            .with_base_url(Chain::Ethereum, server.url("/api"));
        let storage = LocalStorage::new(temp_dir.path());
        let pipeline =
            WalletAgePipeline::new(storage, cli_config("output"), LookupService::new(chains));
        EtlEngine::new(pipeline).run().await.unwrap();

        let path = temp_dir.path().join("output").join(DEFAULT_OUTPUT_FILE);
        outputs.push(std::fs::read_to_string(path).unwrap());
    }

    api_mock.assert_hits(4);
    assert!(outputs[0].contains("0xA,ethereum,2017-07-14,"));
    // only the age column could move, and only across a day boundary
    if !outputs[0].eq(&outputs[1]) {
        let dates = |s: &str| -> Vec<String> {
            s.lines().map(|l| l.split(',').take(3).collect::<Vec<_>>().join(",")).collect()
        };
        assert_eq!(dates(&outputs[0]), dates(&outputs[1]));
    }
}
