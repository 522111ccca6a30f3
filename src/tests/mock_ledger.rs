// Scripted stand-in for the JSON-RPC ledger

use crate::blockchain::client::{ClientError, LedgerClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const GAS_PRICE_HEX: &str = "0x4a817c800"; // 20 gwei
pub const GAS_HEX: &str = "0x5208"; // 21000

/// Ledger double.
///
/// `latest_height` walks a script of heights (`None` is a failure); the last
/// entry repeats forever. Blocks listed in `failing_blocks` fail that many
/// times before being served.
#[derive(Default)]
pub struct MockLedger {
    latest: Mutex<VecDeque<Option<u64>>>,
    blocks: Mutex<HashMap<u64, Value>>,
    failing_blocks: Mutex<HashMap<u64, u32>>,
    transactions: Mutex<HashMap<String, Value>>,
    block_requests: Mutex<Vec<u64>>,
    latest_requests: AtomicUsize,
    transaction_requests: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(self, script: impl IntoIterator<Item = Option<u64>>) -> Self {
        *self.latest.lock().unwrap() = script.into_iter().collect();
        self
    }

    pub fn with_block(self, block: Value) -> Self {
        let number = block["number"]
            .as_str()
            .and_then(|hex| u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok())
            .expect("mock block needs a hex number");
        self.blocks.lock().unwrap().insert(number, block);
        self
    }

    pub fn failing_block(self, height: u64, times: u32) -> Self {
        self.failing_blocks.lock().unwrap().insert(height, times);
        self
    }

    pub fn with_transaction(self, tx: Value) -> Self {
        let hash = tx["hash"].as_str().unwrap_or_default().to_string();
        self.transactions.lock().unwrap().insert(hash, tx);
        self
    }

    pub fn block_requests(&self) -> Vec<u64> {
        self.block_requests.lock().unwrap().clone()
    }

    pub fn latest_requests(&self) -> usize {
        self.latest_requests.load(Ordering::SeqCst)
    }

    pub fn transaction_requests(&self) -> usize {
        self.transaction_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn latest_height(&self) -> Result<u64, ClientError> {
        self.latest_requests.fetch_add(1, Ordering::SeqCst);
        let mut script = self.latest.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().copied().flatten()
        };
        next.ok_or_else(|| ClientError::UnexpectedResponse("scripted failure".to_string()))
    }

    async fn block_by_height(&self, height: u64) -> Result<Value, ClientError> {
        self.block_requests.lock().unwrap().push(height);

        if let Some(remaining) = self.failing_blocks.lock().unwrap().get_mut(&height) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ClientError::UnexpectedResponse(format!(
                    "scripted failure for block {}",
                    height
                )));
            }
        }

        self.blocks
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .ok_or(ClientError::BlockNotFound(height))
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<Value, ClientError> {
        self.transaction_requests.fetch_add(1, Ordering::SeqCst);
        self.transactions
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or_else(|| ClientError::TransactionNotFound(hash.to_string()))
    }
}

pub fn block(number: u64, timestamp: u64, transactions: Vec<Value>) -> Value {
    json!({
        "number": format!("0x{:x}", number),
        "timestamp": format!("0x{:x}", timestamp),
        "transactions": transactions,
    })
}

/// Raw transaction paying 20 gwei for 21000 gas.
pub fn raw_tx(hash: &str, from: &str, to: &str, value_hex: &str) -> Value {
    json!({
        "hash": hash,
        "from": from,
        "to": to,
        "value": value_hex,
        "gasPrice": GAS_PRICE_HEX,
        "gas": GAS_HEX,
    })
}
