// Watched address registry

use super::keys::AddressKey;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Set of watched addresses, keyed by canonical form.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    addresses: RwLock<HashSet<AddressKey>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `address`. Subscribing twice, in any letter case, is a no-op.
    pub fn subscribe(&self, address: &str) -> bool {
        let key = AddressKey::new(address);
        if self.write().insert(key.clone()) {
            info!("Subscribed to address: {}", key);
        } else {
            debug!("Address already subscribed: {}", key);
        }
        true
    }

    pub fn is_subscribed(&self, address: &str) -> bool {
        self.contains(&AddressKey::new(address))
    }

    pub fn contains(&self, key: &AddressKey) -> bool {
        self.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted copy of the watched addresses.
    pub fn snapshot(&self) -> Vec<AddressKey> {
        let mut addresses: Vec<_> = self.read().iter().cloned().collect();
        addresses.sort();
        addresses
    }

    // A panicking writer cannot leave a HashSet half-inserted, so poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, HashSet<AddressKey>> {
        self.addresses.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<AddressKey>> {
        self.addresses.write().unwrap_or_else(PoisonError::into_inner)
    }
}
