use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) => "Make sure the input is a valid comma-separated file",
            EtlError::ValidationError { .. } => {
                "The input CSV needs a header row with 'wallet_address' and 'chain' columns"
            }
            EtlError::IoError(_) => {
                "Check that the input and config files exist and the output directory is writable"
            }
            EtlError::SerializationError(_) => {
                "Re-run with --verbose to see which row caused the problem"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the chain configuration file and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ValidationError { message } => message.clone(),
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

/// Per-wallet failure. Always recovered into the result row, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unsupported or missing API key for chain: {chain}")]
    UnsupportedChain { chain: String },

    #[error("Error: {message}")]
    TransportError { message: String },

    #[error("No transactions or invalid wallet.")]
    NoHistory,
}

impl LookupError {
    pub fn unsupported(chain: &str) -> Self {
        LookupError::UnsupportedChain {
            chain: chain.to_string(),
        }
    }

    pub fn transport(cause: impl std::fmt::Display) -> Self {
        LookupError::TransportError {
            message: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_messages() {
        assert_eq!(
            LookupError::unsupported("solana").to_string(),
            "Unsupported or missing API key for chain: solana"
        );
        assert_eq!(
            LookupError::transport("operation timed out").to_string(),
            "Error: operation timed out"
        );
        assert_eq!(
            LookupError::NoHistory.to_string(),
            "No transactions or invalid wallet."
        );
    }

    #[test]
    fn test_severity_drives_exit_code() {
        let missing_columns = EtlError::ValidationError {
            message: "CSV must contain 'wallet_address' and 'chain' columns.".to_string(),
        };
        assert_eq!(missing_columns.category(), ErrorCategory::Data);
        assert_eq!(missing_columns.exit_code(), 1);

        let bad_chain = EtlError::InvalidConfigValueError {
            field: "api_keys".to_string(),
            value: "solana".to_string(),
            reason: "Unsupported chain".to_string(),
        };
        assert_eq!(bad_chain.severity(), ErrorSeverity::Critical);
        assert_eq!(bad_chain.exit_code(), 3);

        let unreadable = EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "chains.toml",
        ));
        assert_eq!(unreadable.exit_code(), 3);
    }
}
