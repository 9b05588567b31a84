use crate::adapters::explorer::TxListResponse;
use crate::config::chain_config::ChainConfig;
use crate::core::{LookupResult, WalletAge, WalletLookup};
use crate::utils::error::LookupError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

/// 查詢錢包第一筆交易並計算錢包年齡
pub struct LookupService {
    config: ChainConfig,
    client: Client,
}

impl LookupService {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    async fn wallet_age(&self, chain: &str, address: &str) -> Result<WalletAge, LookupError> {
        // 先檢查鏈設定，避免不必要的網路請求
        let endpoint = self.config.resolve(chain)?;
        let end_block = self.config.end_block().to_string();

        tracing::debug!(
            "Querying {} explorer for {} (endblock {})",
            endpoint.chain,
            address,
            end_block
        );

        let response = self
            .client
            .get(endpoint.base_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", end_block.as_str()),
                ("sort", "asc"),
                ("apikey", endpoint.api_key),
            ])
            .timeout(self.config.timeout())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(request_error)?;

        tracing::debug!("Explorer response status: {}", response.status());

        let body = response.text().await.map_err(request_error)?;
        let payload = TxListResponse::parse(&body)?;

        if payload.status != "1" {
            tracing::debug!("Explorer reported status {}: {}", payload.status, payload.message);
        }

        let first = payload.first_transaction()?;
        tracing::debug!("First transaction of {}: {:?}", address, first.hash);

        Ok(WalletAge::since(first.timestamp()?, Utc::now()))
    }
}

/// reqwest 的 Display 只有最外層，要沿著 source() 取得實際原因
fn request_error(e: reqwest::Error) -> LookupError {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = std::error::Error::source(cause);
    }

    LookupError::TransportError { message }
}

#[async_trait]
impl WalletLookup for LookupService {
    async fn lookup(&self, chain: &str, address: &str) -> LookupResult {
        self.wallet_age(chain, address).await.into()
    }
}
