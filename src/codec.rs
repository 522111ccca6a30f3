// Arbitrary-precision conversions for ledger quantities
//
// Wei amounts and gas prices routinely exceed 64 bits, so every monetary
// conversion goes through `BigInt` and is rendered back as base-10 text.
// The infallible helpers degrade to `"0"` on bad input; the `try_` variants
// report why so callers can count decode failures.

use bigdecimal::num_bigint::BigInt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;
const ETHER_DECIMALS: usize = 18;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("empty input")]
    Empty,

    #[error("invalid hex quantity: {0}")]
    InvalidHex(String),

    #[error("invalid decimal integer: {0}")]
    InvalidDecimal(String),

    #[error("quantity does not fit in 64 bits: {0}")]
    Overflow(String),
}

// Accepts an upper-case `0X` prefix as well; node output only ever uses `0x`
fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

fn hex_digits(input: &str) -> Result<&str, CodecError> {
    let digits = strip_hex_prefix(input);
    if digits.is_empty() {
        return Err(CodecError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidHex(input.to_string()));
    }
    Ok(digits)
}

fn parse_decimal(input: &str) -> Result<BigInt, CodecError> {
    if input.is_empty() {
        return Err(CodecError::Empty);
    }
    // Signed operands ("+5", "-5") are rejected rather than parsed
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidDecimal(input.to_string()));
    }
    BigInt::from_str(input).map_err(|_| CodecError::InvalidDecimal(input.to_string()))
}

/// Convert a hex quantity (optionally `0x`-prefixed) into a decimal string.
pub fn try_hex_to_decimal(hex: &str) -> Result<String, CodecError> {
    let digits = hex_digits(hex)?;
    BigInt::parse_bytes(digits.as_bytes(), 16)
        .map(|value| value.to_string())
        .ok_or_else(|| CodecError::InvalidHex(hex.to_string()))
}

/// Like [`try_hex_to_decimal`], but empty or malformed input yields `"0"`.
pub fn hex_to_decimal(hex: &str) -> String {
    try_hex_to_decimal(hex).unwrap_or_else(|e| {
        debug!("Hex conversion of {:?} degraded to zero: {}", hex, e);
        "0".to_string()
    })
}

/// Decode a hex quantity that must fit in 64 bits (heights, timestamps).
pub fn try_hex_to_u64(hex: &str) -> Result<u64, CodecError> {
    let digits = hex_digits(hex)?;
    u64::from_str_radix(digits, 16).map_err(|_| CodecError::Overflow(hex.to_string()))
}

pub fn hex_to_u64(hex: &str) -> u64 {
    try_hex_to_u64(hex).unwrap_or_else(|e| {
        debug!("Hex conversion of {:?} degraded to zero: {}", hex, e);
        0
    })
}

/// Fee paid for a transaction: `gas_price * gas_used`, both decimal strings.
///
/// Either operand failing to parse yields `"0"`.
pub fn compute_fee(gas_price: &str, gas_used: &str) -> String {
    match (parse_decimal(gas_price), parse_decimal(gas_used)) {
        (Ok(price), Ok(used)) => (price * used).to_string(),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Fee computation degraded to zero: {}", e);
            "0".to_string()
        }
    }
}

/// Render a wei amount as ether with exactly 18 fractional digits.
pub fn wei_to_ether(wei: &str) -> String {
    let wei = match parse_decimal(wei) {
        Ok(value) => value,
        Err(e) => {
            debug!("Ether conversion degraded to zero: {}", e);
            return "0".to_string();
        }
    };

    let unit = BigInt::from(WEI_PER_ETHER);
    let whole = &wei / &unit;
    let fraction = (&wei % &unit).to_string();

    format!("{}.{:0>width$}", whole, fraction, width = ETHER_DECIMALS)
}
