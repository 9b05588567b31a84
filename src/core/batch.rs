use crate::core::{LookupRequest, OutputFormat, ResultRow, WalletLookup};
use crate::utils::error::{EtlError, Result};

pub const OUTPUT_COLUMNS: [&str; 5] = [
    "wallet_address",
    "chain",
    "first_transaction",
    "wallet_age_days",
    "error",
];

pub const MISSING_COLUMNS_MESSAGE: &str = "CSV must contain 'wallet_address' and 'chain' columns.";

/// 解析輸入 CSV；缺少必要欄位時整批拒絕，不處理任何一列
pub fn read_requests(data: &[u8]) -> Result<Vec<LookupRequest>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header == name);

    let (Some(address_idx), Some(chain_idx)) = (position("wallet_address"), position("chain"))
    else {
        return Err(EtlError::ValidationError {
            message: MISSING_COLUMNS_MESSAGE.to_string(),
        });
    };

    let mut requests = Vec::new();
    for record in reader.records() {
        let record = record?;
        // 欄位不足的列視為空字串
        requests.push(LookupRequest::new(
            record.get(address_idx).unwrap_or_default(),
            record.get(chain_idx).unwrap_or_default(),
        ));
    }

    Ok(requests)
}

pub fn encode_rows(rows: &[ResultRow], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => write_csv(rows),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(rows)?),
    }
}

/// Header is written even for an empty batch.
pub fn write_csv(rows: &[ResultRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Runs lookups one at a time, in input order.
pub struct BatchRunner<'a, L: WalletLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: WalletLookup + ?Sized> BatchRunner<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    pub async fn run(&self, requests: Vec<LookupRequest>) -> Vec<ResultRow> {
        let total = requests.len();
        let mut rows = Vec::with_capacity(total);

        for (index, request) in requests.into_iter().enumerate() {
            let request = LookupRequest {
                chain: request.chain.to_lowercase(),
                ..request
            };

            let result = self
                .lookup
                .lookup(&request.chain, &request.wallet_address)
                .await;
            let row = ResultRow::from_lookup(request, result);

            match &row.error {
                None => tracing::debug!(
                    "[{}/{}] {} on {}: {} days",
                    index + 1,
                    total,
                    row.wallet_address,
                    row.chain,
                    row.wallet_age_days.unwrap_or_default()
                ),
                Some(error) => tracing::warn!(
                    "[{}/{}] {} on {}: {}",
                    index + 1,
                    total,
                    row.wallet_address,
                    row.chain,
                    error
                ),
            }

            rows.push(row);
        }

        rows
    }
}
