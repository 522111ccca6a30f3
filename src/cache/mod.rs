// Cache for single-transaction lookups by hash

use crate::{config::Config, models::Transaction};
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Mined transactions never change, so lookups by hash are safe to cache.
/// Keys are lower-cased hashes.
#[derive(Clone)]
pub struct TransactionLookupCache {
    cache: Cache<String, Transaction>,
}

impl TransactionLookupCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_capacity, config.cache_ttl)
    }

    pub async fn get(&self, hash: &str) -> Option<Transaction> {
        let result = self.cache.get(&hash.to_lowercase()).await;
        if result.is_some() {
            debug!("Lookup cache hit for {}", hash);
        } else {
            debug!("Lookup cache miss for {}", hash);
        }
        result
    }

    pub async fn insert(&self, transaction: Transaction) {
        let key = transaction.hash.to_lowercase();
        self.cache.insert(key.clone(), transaction).await;
        debug!("Cached transaction lookup: {}", key);
    }
}
