use crate::utils::error::LookupError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Etherscan-family `module=account&action=txlist` response.
///
/// On failure the explorers put a message string in `result` instead of a
/// list (`"Invalid API Key"`, `"Max rate limit reached"`), so `result` stays
/// untyped until `status` has been checked.
#[derive(Debug, Deserialize)]
pub struct TxListResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerTransaction {
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(default)]
    pub hash: Option<String>,
}

impl TxListResponse {
    pub fn parse(body: &str) -> Result<Self, LookupError> {
        serde_json::from_str(body).map_err(LookupError::transport)
    }

    /// 只有 status == "1" 且清單非空才算有交易紀錄
    pub fn first_transaction(&self) -> Result<ExplorerTransaction, LookupError> {
        if self.status != "1" {
            return Err(LookupError::NoHistory);
        }

        let first = self
            .result
            .as_array()
            .and_then(|txs| txs.first())
            .ok_or(LookupError::NoHistory)?;

        ExplorerTransaction::deserialize(first).map_err(LookupError::transport)
    }
}

impl ExplorerTransaction {
    pub fn timestamp(&self) -> Result<DateTime<Utc>, LookupError> {
        let seconds: i64 = self.time_stamp.trim().parse().map_err(|e| {
            LookupError::transport(format!("invalid timeStamp '{}': {}", self.time_stamp, e))
        })?;

        DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            LookupError::transport(format!("timeStamp out of range: {}", seconds))
        })
    }
}
