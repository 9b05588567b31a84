pub mod batch;
pub mod etl;
pub mod lookup;

pub use crate::domain::model::{
    BatchOutput, EtlSummary, LookupRequest, LookupResult, ResultRow, WalletAge,
};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage, WalletLookup};
pub use crate::utils::error::Result;
