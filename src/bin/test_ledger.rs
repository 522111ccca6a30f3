// Manual smoke test against a live JSON-RPC endpoint (ETH_RPC_URL).
// Fetches the tip, filters the latest block for its first sender and looks
// that transaction up by hash.

use eth_address_indexer::{
    blockchain::{EthereumClient, LedgerClient},
    config::Config,
    EthereumParser, Parser,
};
use std::sync::Arc;
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting ledger smoke test...");

    let config = Config::from_env();
    let client: Arc<dyn LedgerClient> = Arc::new(EthereumClient::new(&config)?);

    // 1. Chain tip
    let latest = client.latest_height().await?;
    info!("✅ Latest block: {}", latest);

    // 2. Full block
    let block = client.block_by_height(latest).await?;
    let transactions = block["transactions"].as_array().cloned().unwrap_or_default();
    info!("✅ Block {} carries {} transactions", latest, transactions.len());

    let Some(first) = transactions.first() else {
        warn!("Latest block is empty, nothing to filter");
        return Ok(());
    };
    let sender = first["from"].as_str().unwrap_or_default().to_string();
    let hash = first["hash"].as_str().unwrap_or_default().to_string();

    // 3. Filter the block for the first sender, upper-cased to exercise canonicalization
    let parser = EthereumParser::with_start_height(client.clone(), latest.saturating_sub(1));
    parser.subscribe(&sender.to_uppercase());
    let report = parser.ingest_block(&block);
    info!(
        "✅ Filtered block {}: scanned {}, matched {}, decode failures {}",
        report.height, report.scanned, report.matched, report.decode_failures
    );
    for tx in parser.get_transactions(&sender) {
        info!(
            "   {} -> {} value {} ETH fee {} ETH",
            tx.from,
            tx.to,
            tx.value_in_ether(),
            tx.fee_in_ether()
        );
    }

    // 4. Lookup by hash
    match parser.transaction_by_hash(&hash).await {
        Ok(tx) => info!("✅ Looked up {} in block {} at {}", tx.hash, tx.block_number, tx.timestamp),
        Err(e) => error!("❌ Lookup of {} failed: {}", hash, e),
    }

    info!("Ledger smoke test complete");
    Ok(())
}
