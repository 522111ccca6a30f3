// Per-address transaction history

use super::keys::AddressKey;
use crate::models::Transaction;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Append-only mapping from canonical address to matched transactions,
/// kept in ingestion order (block height, then position within the block).
#[derive(Debug, Default)]
pub struct TransactionIndex {
    by_address: RwLock<HashMap<AddressKey, Vec<Transaction>>>,
}

impl TransactionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, address: &AddressKey, transaction: Transaction) {
        let mut by_address = self.by_address.write().unwrap_or_else(PoisonError::into_inner);
        let history = by_address.entry(address.clone()).or_default();
        history.push(transaction);
        debug!("Indexed transaction for {} ({} total)", address, history.len());
    }

    /// History for `address` in any letter case; empty when nothing matched.
    pub fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        let key = AddressKey::new(address);
        self.by_address
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count_for(&self, address: &str) -> usize {
        let key = AddressKey::new(address);
        self.by_address
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .map_or(0, Vec::len)
    }

    /// Number of addresses with at least one indexed transaction.
    pub fn address_count(&self) -> usize {
        self.by_address.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
