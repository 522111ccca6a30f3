use crate::codec;
use crate::config::Config;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Block {0} not found")]
    BlockNotFound(u64),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

/// The ledger calls the indexer depends on.
///
/// Blocks and transactions are returned as raw JSON objects; decoding is
/// lenient and lives in [`crate::blockchain::models`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Latest block height (`eth_blockNumber`).
    async fn latest_height(&self) -> Result<u64, ClientError>;

    /// Full block with transaction bodies (`eth_getBlockByNumber`).
    async fn block_by_height(&self, height: u64) -> Result<Value, ClientError>;

    /// Single transaction (`eth_getTransactionByHash`).
    async fn transaction_by_hash(&self, hash: &str) -> Result<Value, ClientError>;
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client for an Ethereum node over HTTP.
pub struct EthereumClient {
    http: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl EthereumClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.rpc_timeout_secs);

        info!(
            "Initializing Ethereum client with RPC endpoint: {}, timeout: {:?}",
            config.eth_rpc_url, timeout
        );

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            rpc_url: config.eth_rpc_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        debug!("Sending {} request #{}", method, id);

        let response: RpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl LedgerClient for EthereumClient {
    async fn latest_height(&self) -> Result<u64, ClientError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("block number: {}", result)))?;

        codec::try_hex_to_u64(hex)
            .map_err(|e| ClientError::UnexpectedResponse(format!("block number: {}", e)))
    }

    async fn block_by_height(&self, height: u64) -> Result<Value, ClientError> {
        let params = json!([format!("0x{:x}", height), true]);
        match self.call("eth_getBlockByNumber", params).await? {
            Value::Null => Err(ClientError::BlockNotFound(height)),
            block @ Value::Object(_) => Ok(block),
            other => Err(ClientError::UnexpectedResponse(format!(
                "block {} is not an object: {}",
                height, other
            ))),
        }
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<Value, ClientError> {
        match self.call("eth_getTransactionByHash", json!([hash])).await? {
            Value::Null => Err(ClientError::TransactionNotFound(hash.to_string())),
            tx @ Value::Object(_) => Ok(tx),
            other => Err(ClientError::UnexpectedResponse(format!(
                "transaction {} is not an object: {}",
                hash, other
            ))),
        }
    }
}
