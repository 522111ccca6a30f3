use crate::cache::TransactionLookupCache;
use crate::config::Config;
use crate::service::EthereumParser;
use std::sync::Arc;

pub struct AppState {
    pub parser: Arc<EthereumParser>,
    pub lookup_cache: TransactionLookupCache,
}

impl AppState {
    pub fn new(config: &Config, parser: Arc<EthereumParser>) -> Self {
        Self {
            parser,
            lookup_cache: TransactionLookupCache::from_config(config),
        }
    }
}
