use crate::utils::error::{EtlError, LookupError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_END_BLOCK: u64 = 99_999_999;

/// 支援的鏈（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chain {
    Ethereum,
    Polygon,
    Bsc,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Ethereum, Chain::Polygon, Chain::Bsc];

    /// Case-insensitive match against the supported chain names.
    pub fn parse(name: &str) -> Option<Chain> {
        match name.trim().to_lowercase().as_str() {
            "ethereum" => Some(Chain::Ethereum),
            "polygon" => Some(Chain::Polygon),
            "bsc" => Some(Chain::Bsc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Chain::Ethereum => "https://api.etherscan.io/api",
            Chain::Polygon => "https://api.polygonscan.com/api",
            Chain::Bsc => "https://api.bscscan.com/api",
        }
    }

    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETHERSCAN_API_KEY",
            Chain::Polygon => "POLYGONSCAN_API_KEY",
            Chain::Bsc => "BSCSCAN_API_KEY",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChainEndpoint {
    base_url: String,
    api_key: Option<String>,
}

/// A chain that passed resolution: known, with a credential.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEndpoint<'a> {
    pub chain: Chain,
    pub base_url: &'a str,
    pub api_key: &'a str,
}

/// Explorer endpoints and credentials per chain. Built once before the batch
/// starts and only read afterwards.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    endpoints: BTreeMap<Chain, ChainEndpoint>,
    timeout: Duration,
    end_block: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ChainsFile {
    #[serde(default, alias = "API_KEYS")]
    api_keys: HashMap<String, String>,
    #[serde(default, alias = "BASE_URLS")]
    base_urls: HashMap<String, String>,
    #[serde(default)]
    request: RequestSettings,
}

#[derive(Debug, Deserialize)]
struct RequestSettings {
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_end_block")]
    end_block: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            end_block: DEFAULT_END_BLOCK,
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_end_block() -> u64 {
    DEFAULT_END_BLOCK
}

impl ChainConfig {
    /// 以預設 API 位址建立，只設定給定的金鑰
    pub fn new<I, K>(api_keys: I) -> Self
    where
        I: IntoIterator<Item = (Chain, K)>,
        K: Into<String>,
    {
        let mut endpoints: BTreeMap<Chain, ChainEndpoint> = Chain::ALL
            .iter()
            .map(|chain| {
                (
                    *chain,
                    ChainEndpoint {
                        base_url: chain.default_base_url().to_string(),
                        api_key: None,
                    },
                )
            })
            .collect();

        for (chain, key) in api_keys {
            if let Some(endpoint) = endpoints.get_mut(&chain) {
                endpoint.api_key = normalize_api_key(key.into());
            }
        }

        Self {
            endpoints,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            end_block: DEFAULT_END_BLOCK,
        }
    }

    pub fn with_base_url(mut self, chain: Chain, base_url: impl Into<String>) -> Self {
        if let Some(endpoint) = self.endpoints.get_mut(&chain) {
            endpoint.base_url = base_url.into();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_end_block(mut self, end_block: u64) -> Self {
        self.end_block = end_block;
        self
    }

    /// 從環境變數讀取各鏈的 API 金鑰
    pub fn from_env() -> Self {
        let keys = Chain::ALL.iter().filter_map(|chain| {
            std::env::var(chain.api_key_env_var())
                .ok()
                .map(|key| (*chain, key))
        });
        Self::new(keys)
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        let file: ChainsFile =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let mut keys = Vec::with_capacity(file.api_keys.len());
        for (name, key) in file.api_keys {
            keys.push((known_chain("api_keys", &name)?, key));
        }

        let mut config = Self::new(keys)
            .with_timeout(Duration::from_secs(file.request.timeout_seconds))
            .with_end_block(file.request.end_block);

        for (name, url) in file.base_urls {
            let chain = known_chain("base_urls", &name)?;
            config = config.with_base_url(chain, url);
        }

        Ok(config)
    }

    /// Unknown chains and chains without a credential both resolve to
    /// `UnsupportedChain`.
    pub fn resolve(&self, chain: &str) -> std::result::Result<ResolvedEndpoint<'_>, LookupError> {
        let unsupported = || LookupError::unsupported(chain);
        let known = Chain::parse(chain).ok_or_else(unsupported)?;
        let endpoint = self.endpoints.get(&known).ok_or_else(unsupported)?;
        let api_key = endpoint.api_key.as_deref().ok_or_else(unsupported)?;

        Ok(ResolvedEndpoint {
            chain: known,
            base_url: &endpoint.base_url,
            api_key,
        })
    }

    pub fn is_configured(&self, chain: &str) -> bool {
        self.resolve(chain).is_ok()
    }

    pub fn configured_chains(&self) -> Vec<Chain> {
        self.endpoints
            .iter()
            .filter(|(_, endpoint)| endpoint.api_key.is_some())
            .map(|(chain, _)| *chain)
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn end_block(&self) -> u64 {
        self.end_block
    }
}

impl Validate for ChainConfig {
    fn validate(&self) -> Result<()> {
        for (chain, endpoint) in &self.endpoints {
            validate_url(&format!("base_urls.{}", chain), &endpoint.base_url)?;
        }

        validate_range("request.timeout_seconds", self.timeout.as_secs(), 1, 300)?;
        validate_range("request.end_block", self.end_block, 1, u64::MAX)?;

        Ok(())
    }
}

fn known_chain(table: &str, name: &str) -> Result<Chain> {
    Chain::parse(name).ok_or_else(|| EtlError::InvalidConfigValueError {
        field: table.to_string(),
        value: name.to_string(),
        reason: format!(
            "Unsupported chain. Supported chains: {}",
            Chain::ALL.map(|c| c.as_str()).join(", ")
        ),
    })
}

// 空字串或未替換的 ${VAR} 視為沒有金鑰
fn normalize_api_key(raw: String) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || (key.starts_with("${") && key.ends_with('}')) {
        None
    } else {
        Some(key.to_string())
    }
}

/// 替換環境變數 (例如 ${ETHERSCAN_API_KEY})
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
        message: format!("Invalid placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
