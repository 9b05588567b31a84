pub mod wallet_age_pipeline;

pub use wallet_age_pipeline::WalletAgePipeline;
