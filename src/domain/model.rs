use crate::utils::error::LookupError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 一列輸入：錢包地址與鏈名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub wallet_address: String,
    pub chain: String,
}

impl LookupRequest {
    pub fn new(wallet_address: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            chain: chain.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAge {
    pub first_transaction: NaiveDate,
    pub wallet_age_days: u64,
}

impl WalletAge {
    /// Whole days between `first_seen` and `now`, floored. A first transaction
    /// stamped after `now` counts as zero days old.
    pub fn since(first_seen: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - first_seen).num_days().max(0);
        Self {
            first_transaction: first_seen.date_naive(),
            wallet_age_days: days as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Success(WalletAge),
    Failure(LookupError),
}

impl From<std::result::Result<WalletAge, LookupError>> for LookupResult {
    fn from(value: std::result::Result<WalletAge, LookupError>) -> Self {
        match value {
            Ok(age) => LookupResult::Success(age),
            Err(e) => LookupResult::Failure(e),
        }
    }
}

/// 輸出表格的一列，欄位順序即 CSV 欄位順序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub wallet_address: String,
    pub chain: String,
    pub first_transaction: Option<String>,
    pub wallet_age_days: Option<u64>,
    pub error: Option<String>,
}

impl ResultRow {
    pub fn from_lookup(request: LookupRequest, result: LookupResult) -> Self {
        let LookupRequest {
            wallet_address,
            chain,
        } = request;

        match result {
            LookupResult::Success(age) => Self {
                wallet_address,
                chain,
                first_transaction: Some(age.first_transaction.format("%Y-%m-%d").to_string()),
                wallet_age_days: Some(age.wallet_age_days),
                error: None,
            },
            LookupResult::Failure(e) => Self {
                wallet_address,
                chain,
                first_transaction: None,
                wallet_age_days: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub rows: Vec<ResultRow>,
}

impl BatchOutput {
    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|row| row.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.succeeded()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlSummary {
    pub output_path: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Leading rows of the result table, for display.
    pub preview: Vec<ResultRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_wallet_age_floors_partial_days() {
        let first_seen = Utc.with_ymd_and_hms(2021, 3, 14, 23, 59, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2021, 3, 24, 23, 58, 0).unwrap();

        let age = WalletAge::since(first_seen, now);
        assert_eq!(age.first_transaction, NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());
        assert_eq!(age.wallet_age_days, 9);
    }

    #[test]
    fn test_wallet_age_future_timestamp_is_zero() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let age = WalletAge::since(now + Duration::days(3), now);
        assert_eq!(age.wallet_age_days, 0);
    }

    #[test]
    fn test_result_row_flattening() {
        let request = LookupRequest::new("0xabc", "ethereum");
        let ok = ResultRow::from_lookup(
            request.clone(),
            LookupResult::Success(WalletAge {
                first_transaction: NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(),
                wallet_age_days: 42,
            }),
        );
        assert_eq!(ok.first_transaction.as_deref(), Some("2017-06-01"));
        assert_eq!(ok.wallet_age_days, Some(42));
        assert!(ok.error.is_none());

        let failed = ResultRow::from_lookup(request, LookupResult::Failure(LookupError::NoHistory));
        assert!(failed.first_transaction.is_none());
        assert!(failed.wallet_age_days.is_none());
        assert_eq!(failed.error.as_deref(), Some("No transactions or invalid wallet."));
    }
}
