use crate::blockchain::models::{decode_header, extract_transaction, raw_transactions, DecodeContext};
use crate::index::{AddressKey, SubscriptionRegistry, TransactionIndex};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of filtering one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockReport {
    pub height: u64,
    /// Transaction records seen, well-formed or not.
    pub scanned: usize,
    /// Transactions touching at least one subscribed address.
    pub matched: usize,
    /// Records skipped for having the wrong shape.
    pub skipped: usize,
    pub decode_failures: u32,
}

/// Filter a raw block against the subscription set and append matches to the index.
///
/// A matching transaction is appended to its sender's history when the
/// sender is subscribed, and to its receiver's history when the receiver is
/// subscribed, non-empty and differs from the sender. Nothing is kept for
/// transactions touching no subscribed address.
pub fn process_block(
    block: &Value,
    subscriptions: &SubscriptionRegistry,
    index: &TransactionIndex,
) -> BlockReport {
    let mut ctx = DecodeContext::new();
    let header = decode_header(block, &mut ctx);
    let mut report = BlockReport {
        height: header.number,
        ..BlockReport::default()
    };

    let Some(transactions) = raw_transactions(block) else {
        debug!("No transactions found in block {}", header.number);
        report.decode_failures = ctx.failures();
        return report;
    };

    for raw in transactions {
        report.scanned += 1;

        let Some(transaction) = extract_transaction(raw, &header, &mut ctx) else {
            warn!("Skipping malformed transaction record in block {}", header.number);
            report.skipped += 1;
            continue;
        };

        let from = AddressKey::new(&transaction.from);
        let to = AddressKey::new(&transaction.to);

        let from_subscribed = subscriptions.contains(&from);
        let to_subscribed = subscriptions.contains(&to);

        if !from_subscribed && !to_subscribed {
            continue;
        }

        info!(
            "Found transaction involving subscribed address in block {}: {}",
            header.number, transaction.hash
        );
        debug!(
            "Transaction {} moves {} ETH, fee {} ETH",
            transaction.hash,
            transaction.value_in_ether(),
            transaction.fee_in_ether()
        );
        report.matched += 1;

        let index_to = to_subscribed && to != from && !to.is_empty();

        if from_subscribed {
            index.append(&from, transaction.clone());
            debug!("Transaction added to 'from' address: {}", from);
        }
        if index_to {
            index.append(&to, transaction);
            debug!("Transaction added to 'to' address: {}", to);
        }
    }

    report.decode_failures = ctx.failures();
    report
}
