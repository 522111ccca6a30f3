// Canonical address keys

use std::fmt;

/// An address in canonical (lower-case) form.
///
/// All equality checks and map lookups on addresses go through this type, so
/// `0xABC` and `0xabc` always resolve to the same entry. No checksum or
/// format validation is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressKey(String);

impl AddressKey {
    pub fn new(address: &str) -> Self {
        Self(address.to_lowercase())
    }

    /// Empty for the `to` side of a contract creation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
