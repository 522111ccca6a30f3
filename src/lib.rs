pub mod api;
pub mod blockchain;
pub mod cache;
pub mod codec;
pub mod config;
pub mod index;
pub mod models;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use blockchain::client::{ClientError, EthereumClient, LedgerClient};
pub use blockchain::polling::{spawn_ingestion, start_polling, IngestError, PollingSettings};
pub use models::Transaction;
pub use service::{EthereumParser, LookupError, Parser};
