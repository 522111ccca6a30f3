use crate::codec::{self, CodecError};
use crate::index::AddressKey;
use crate::models::Transaction;
use serde_json::Value;
use tracing::debug;

/// Block fields every extracted transaction inherits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub timestamp: u64,
}

/// Counts fields that failed to decode and were replaced by zero.
#[derive(Debug, Default)]
pub struct DecodeContext {
    failures: u32,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn record(&mut self, field: &str, error: CodecError) {
        self.failures += 1;
        debug!("Field {} degraded to zero: {}", field, error);
    }

    fn hex_decimal(&mut self, record: &Value, field: &str) -> String {
        match codec::try_hex_to_decimal(str_field(record, field)) {
            Ok(value) => value,
            Err(e) => {
                self.record(field, e);
                "0".to_string()
            }
        }
    }

    fn hex_u64(&mut self, record: &Value, field: &str) -> u64 {
        match codec::try_hex_to_u64(str_field(record, field)) {
            Ok(value) => value,
            Err(e) => {
                self.record(field, e);
                0
            }
        }
    }
}

// Missing or non-string fields read as empty
fn str_field<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Decode a block's height and timestamp; bad fields degrade to zero.
pub fn decode_header(block: &Value, ctx: &mut DecodeContext) -> BlockHeader {
    BlockHeader {
        number: ctx.hex_u64(block, "number"),
        timestamp: decode_timestamp(block, ctx),
    }
}

pub fn decode_timestamp(block: &Value, ctx: &mut DecodeContext) -> u64 {
    ctx.hex_u64(block, "timestamp")
}

/// The block's raw transaction records, if it carries any.
pub fn raw_transactions(block: &Value) -> Option<&Vec<Value>> {
    block.get("transactions").and_then(Value::as_array)
}

/// Decode one raw transaction record into a [`Transaction`] stamped with `header`.
///
/// Returns `None` when the record is not a JSON object. Numeric fields that
/// are missing or malformed become `"0"` and are counted on `ctx`. Addresses
/// come back in canonical form; a missing `to` stays empty.
pub fn extract_transaction(
    raw: &Value,
    header: &BlockHeader,
    ctx: &mut DecodeContext,
) -> Option<Transaction> {
    if !raw.is_object() {
        return None;
    }

    let value = ctx.hex_decimal(raw, "value");
    let gas_price = ctx.hex_decimal(raw, "gasPrice");
    // Node responses carry the gas limit under `gas`; it stands in for gas used
    let gas_used = ctx.hex_decimal(raw, "gas");
    let transaction_fee = codec::compute_fee(&gas_price, &gas_used);

    Some(Transaction {
        hash: str_field(raw, "hash").to_string(),
        from: AddressKey::new(str_field(raw, "from")).into_string(),
        to: AddressKey::new(str_field(raw, "to")).into_string(),
        value,
        gas_price,
        gas_used,
        block_number: header.number,
        timestamp: header.timestamp,
        transaction_fee,
    })
}

/// Height of the block containing a standalone transaction record.
///
/// `None` when the transaction is still pending (`blockNumber` is null).
pub fn containing_block(raw: &Value) -> Option<Result<u64, CodecError>> {
    match raw.get("blockNumber") {
        None | Some(Value::Null) => None,
        Some(value) => Some(codec::try_hex_to_u64(value.as_str().unwrap_or(""))),
    }
}
