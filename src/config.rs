// Configuration for:
// - Ethereum JSON-RPC endpoint and request timeout
// - Server listening address/port
// - Ingestion pacing (lookback window, poll backoff, per-block delay)
// - Retry bounds and the skipped-block policy
// - Lookup cache settings (size, TTL)

use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Number of blocks behind the chain tip that ingestion starts from.
pub const DEFAULT_LOOKBACK_BLOCKS: u64 = 10_000;

/// What the ingestion loop does when a block inside a catch-up range cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkippedBlockPolicy {
    /// Log the failure and continue with the next height. A later success
    /// advances progress past the failed height, which is never rescanned.
    #[default]
    Skip,
    /// Stop the catch-up range at the failed height so the next poll retries it.
    Retry,
}

impl FromStr for SkippedBlockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "retry" => Ok(Self::Retry),
            other => Err(format!("unknown skipped block policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub eth_rpc_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub rpc_timeout_secs: u64,
    pub lookback_blocks: u64,
    pub poll_backoff: Duration,
    pub block_delay: Duration,
    pub max_poll_failures: Option<u32>,
    pub startup_retries: usize,
    pub skipped_block_policy: SkippedBlockPolicy,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eth_rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            rpc_timeout_secs: 30,
            lookback_blocks: DEFAULT_LOOKBACK_BLOCKS,
            poll_backoff: Duration::from_secs(5),
            block_delay: Duration::from_millis(200),
            max_poll_failures: None,
            startup_retries: 3,
            skipped_block_policy: SkippedBlockPolicy::Skip,
            cache_ttl: Duration::from_secs(60),
            cache_max_capacity: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let eth_rpc_url = env::var("ETH_RPC_URL").unwrap_or(defaults.eth_rpc_url);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = parse_var("SERVER_PORT").unwrap_or(defaults.server_port);
        let rpc_timeout_secs = parse_var("RPC_TIMEOUT_SECS").unwrap_or(defaults.rpc_timeout_secs);
        let lookback_blocks = parse_var("LOOKBACK_BLOCKS").unwrap_or(defaults.lookback_blocks);
        let poll_backoff = parse_var("POLL_BACKOFF_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_backoff);
        let block_delay = parse_var("BLOCK_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.block_delay);
        // Unset or 0 means retry forever
        let max_poll_failures = parse_var("MAX_POLL_FAILURES").filter(|&max: &u32| max > 0);
        let startup_retries = parse_var("STARTUP_RETRIES").unwrap_or(defaults.startup_retries);
        let skipped_block_policy =
            parse_var("SKIPPED_BLOCK_POLICY").unwrap_or(defaults.skipped_block_policy);
        let cache_ttl = parse_var("CACHE_TTL")
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let cache_max_capacity =
            parse_var("CACHE_MAX_CAPACITY").unwrap_or(defaults.cache_max_capacity);

        Self {
            eth_rpc_url,
            server_host,
            server_port,
            rpc_timeout_secs,
            lookback_blocks,
            poll_backoff,
            block_delay,
            max_poll_failures,
            startup_retries,
            skipped_block_policy,
            cache_ttl,
            cache_max_capacity,
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
