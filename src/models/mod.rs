// Transaction record served to callers
// API request/response models

use crate::codec;
use serde::{Deserialize, Serialize};

/// A matched ledger transaction.
///
/// Numeric quantities are base-10 strings so values wider than 64 bits
/// survive serialization unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    /// Empty for contract creation.
    pub to: String,
    pub value: String,
    pub gas_price: String,
    pub gas_used: String,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_fee: String,
}

impl Transaction {
    pub fn value_in_ether(&self) -> String {
        codec::wei_to_ether(&self.value)
    }

    pub fn fee_in_ether(&self) -> String {
        codec::wei_to_ether(&self.transaction_fee)
    }
}

// API request/response models
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub subscribed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBlockResponse {
    pub current_block: u64,
}
