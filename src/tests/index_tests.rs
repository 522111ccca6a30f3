use crate::index::{AddressKey, ProgressTracker, SubscriptionRegistry, TransactionIndex};
use crate::models::Transaction;
use std::sync::Arc;

fn transaction(hash: &str, block_number: u64) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        from: "0xaaa".to_string(),
        to: "0xbbb".to_string(),
        value: "1000000000000000000".to_string(),
        gas_price: "20000000000".to_string(),
        gas_used: "21000".to_string(),
        block_number,
        timestamp: 1_700_000_000,
        transaction_fee: "420000000000000".to_string(),
    }
}

#[test]
fn test_subscribe_is_case_insensitive_and_idempotent() {
    let registry = SubscriptionRegistry::new();
    let address = "0xAbCdEf0123";

    assert!(registry.subscribe(address));
    assert!(registry.subscribe(&address.to_uppercase()));
    assert!(registry.subscribe(address));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.snapshot(), vec![AddressKey::new("0xabcdef0123")]);
    assert!(registry.is_subscribed("0XABCDEF0123"));
    assert!(!registry.is_subscribed("0xabcdef0124"));
}

#[test]
fn test_subscribe_accepts_any_string() {
    let registry = SubscriptionRegistry::new();
    assert!(registry.subscribe("definitely not an address"));
    assert!(registry.is_subscribed("DEFINITELY NOT AN ADDRESS"));
}

#[test]
fn test_concurrent_subscriptions_collapse_to_one_entry() {
    let registry = Arc::new(SubscriptionRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let address = if i % 2 == 0 { "0xFEED" } else { "0xfeed" };
                for _ in 0..100 {
                    registry.subscribe(address);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unknown_address_has_empty_history() {
    let index = TransactionIndex::new();
    let history = index.transactions_for("0xnever-subscribed");
    assert!(history.is_empty());
    assert_eq!(index.count_for("0xnever-subscribed"), 0);
}

#[test]
fn test_index_preserves_append_order() {
    let index = TransactionIndex::new();
    let key = AddressKey::new("0xAAA");

    index.append(&key, transaction("0x1", 10));
    index.append(&key, transaction("0x2", 10));
    index.append(&key, transaction("0x3", 11));

    let hashes: Vec<_> = index
        .transactions_for("0xaaa")
        .into_iter()
        .map(|tx| tx.hash)
        .collect();
    assert_eq!(hashes, vec!["0x1", "0x2", "0x3"]);
    assert_eq!(index.count_for("0xAAA"), 3);
    assert_eq!(index.address_count(), 1);
}

#[test]
fn test_progress_tracker() {
    let progress = ProgressTracker::new(100);
    assert_eq!(progress.current_height(), 100);

    progress.advance(101);
    progress.advance(150);
    assert_eq!(progress.current_height(), 150);
}

#[test]
fn test_transaction_wire_format() {
    let json = serde_json::to_value(transaction("0x1", 7)).unwrap();

    assert_eq!(json["hash"], "0x1");
    assert_eq!(json["gasPrice"], "20000000000");
    assert_eq!(json["gasUsed"], "21000");
    assert_eq!(json["blockNumber"], 7);
    assert_eq!(json["transactionFee"], "420000000000000");
    assert_eq!(json.as_object().unwrap().len(), 9);
}
