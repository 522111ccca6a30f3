pub mod client;
pub mod models;
pub mod polling;
pub mod processor;

// Re-exports for convenience
pub use client::{EthereumClient, LedgerClient};
pub use polling::{spawn_ingestion, start_polling};
