// Query-side capability interface and the parser that owns indexer state

use crate::blockchain::client::{ClientError, LedgerClient};
use crate::blockchain::models::{
    containing_block, decode_timestamp, extract_transaction, BlockHeader, DecodeContext,
};
use crate::blockchain::polling::{self, IngestError, PollingSettings};
use crate::blockchain::processor::{self, BlockReport};
use crate::index::{ProgressTracker, SubscriptionRegistry, TransactionIndex};
use crate::models::Transaction;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Operations exposed to query handlers.
pub trait Parser: Send + Sync {
    /// Last fully processed block height.
    fn current_block(&self) -> u64;

    /// Watch `address`; always succeeds.
    fn subscribe(&self, address: &str) -> bool;

    /// Indexed history for `address`, empty when nothing matched.
    fn get_transactions(&self, address: &str) -> Vec<Transaction>;
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Transaction {0} is still pending")]
    Pending(String),

    #[error("Malformed transaction record: {0}")]
    Malformed(String),

    #[error("Ledger request failed: {0}")]
    Ledger(ClientError),
}

impl From<ClientError> for LookupError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::TransactionNotFound(hash) => LookupError::NotFound(hash),
            other => LookupError::Ledger(other),
        }
    }
}

/// Owns the subscription set, transaction index and progress counter.
///
/// Each structure has its own lock. The ingestion loop is the only writer of
/// the index and the progress counter; query handlers only add subscriptions.
pub struct EthereumParser {
    subscriptions: SubscriptionRegistry,
    index: TransactionIndex,
    progress: ProgressTracker,
    client: Arc<dyn LedgerClient>,
    decode_failures: AtomicU64,
    skipped_records: AtomicU64,
}

impl EthereumParser {
    /// Build a parser starting `settings.lookback` blocks behind the chain tip.
    ///
    /// Fails when the latest height cannot be learned.
    pub async fn connect(
        client: Arc<dyn LedgerClient>,
        settings: &PollingSettings,
    ) -> Result<Self, IngestError> {
        let start_height = polling::resolve_start_height(client.as_ref(), settings).await?;
        info!("Starting parser from block: {}", start_height);
        Ok(Self::with_start_height(client, start_height))
    }

    pub fn with_start_height(client: Arc<dyn LedgerClient>, start_height: u64) -> Self {
        Self {
            subscriptions: SubscriptionRegistry::new(),
            index: TransactionIndex::new(),
            progress: ProgressTracker::new(start_height),
            client,
            decode_failures: AtomicU64::new(0),
            skipped_records: AtomicU64::new(0),
        }
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    pub fn index(&self) -> &TransactionIndex {
        &self.index
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Total fields degraded to zero since startup.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Total malformed transaction records skipped since startup.
    pub fn skipped_records(&self) -> u64 {
        self.skipped_records.load(Ordering::Relaxed)
    }

    /// Filter a fetched block into the index. Does not touch progress.
    pub fn ingest_block(&self, block: &Value) -> BlockReport {
        let report = processor::process_block(block, &self.subscriptions, &self.index);

        if report.decode_failures > 0 {
            self.decode_failures
                .fetch_add(u64::from(report.decode_failures), Ordering::Relaxed);
            warn!(
                "Block {}: {} field(s) failed to decode and were zeroed",
                report.height, report.decode_failures
            );
        }
        if report.skipped > 0 {
            self.skipped_records
                .fetch_add(report.skipped as u64, Ordering::Relaxed);
        }

        debug!(
            "Block {}: scanned {}, matched {}, skipped {}",
            report.height, report.scanned, report.matched, report.skipped
        );
        report
    }

    /// Fetch a single transaction straight from the ledger.
    ///
    /// The containing block is fetched as well to resolve the timestamp.
    /// Runs outside every shared-state lock.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Transaction, LookupError> {
        let raw = self.client.transaction_by_hash(hash).await?;
        if !raw.is_object() {
            return Err(LookupError::Malformed(hash.to_string()));
        }

        let number = match containing_block(&raw) {
            None => return Err(LookupError::Pending(hash.to_string())),
            Some(Err(e)) => return Err(LookupError::Malformed(format!("{}: {}", hash, e))),
            Some(Ok(number)) => number,
        };

        let block = self.client.block_by_height(number).await?;

        let mut ctx = DecodeContext::new();
        let header = BlockHeader {
            number,
            timestamp: decode_timestamp(&block, &mut ctx),
        };

        let transaction = extract_transaction(&raw, &header, &mut ctx)
            .ok_or_else(|| LookupError::Malformed(hash.to_string()))?;

        if ctx.failures() > 0 {
            self.decode_failures
                .fetch_add(u64::from(ctx.failures()), Ordering::Relaxed);
            warn!(
                "Transaction {}: {} field(s) failed to decode and were zeroed",
                hash,
                ctx.failures()
            );
        }

        Ok(transaction)
    }
}

impl Parser for EthereumParser {
    fn current_block(&self) -> u64 {
        self.progress.current_height()
    }

    fn subscribe(&self, address: &str) -> bool {
        self.subscriptions.subscribe(address)
    }

    fn get_transactions(&self, address: &str) -> Vec<Transaction> {
        let transactions = self.index.transactions_for(address);
        debug!(
            "Fetching transactions for address: {} ({} found)",
            address.to_lowercase(),
            transactions.len()
        );
        transactions
    }
}
