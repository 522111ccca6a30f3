use crate::blockchain::client::{ClientError, LedgerClient};
use crate::config::{Config, SkippedBlockPolicy};
use crate::service::{EthereumParser, Parser};
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to fetch starting block height: {0}")]
    StartHeight(#[source] ClientError),

    #[error("Giving up after {attempts} consecutive poll failures: {last}")]
    PollFailures {
        attempts: u32,
        #[source]
        last: ClientError,
    },
}

/// Pacing and retry knobs for the ingestion loop.
#[derive(Debug, Clone)]
pub struct PollingSettings {
    /// Blocks behind the chain tip to start from.
    pub lookback: u64,
    /// Wait after a failed poll or when there are no new blocks.
    pub poll_backoff: Duration,
    /// Wait after each block in a catch-up range.
    pub block_delay: Duration,
    /// Consecutive poll failures tolerated before the loop stops. `None` or `Some(0)` retries forever.
    pub max_poll_failures: Option<u32>,
    pub startup_retries: usize,
    pub startup_retry_delay: Duration,
    pub skipped_block_policy: SkippedBlockPolicy,
}

impl From<&Config> for PollingSettings {
    fn from(config: &Config) -> Self {
        Self {
            lookback: config.lookback_blocks,
            poll_backoff: config.poll_backoff,
            block_delay: config.block_delay,
            max_poll_failures: config.max_poll_failures,
            startup_retries: config.startup_retries,
            startup_retry_delay: Duration::from_secs(1),
            skipped_block_policy: config.skipped_block_policy,
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// First height to treat as processed: `latest - lookback`, floored at zero.
pub fn lookback_start(latest: u64, lookback: u64) -> u64 {
    latest.saturating_sub(lookback)
}

/// Learn the chain tip and derive the starting height.
///
/// The tip fetch is retried with exponential backoff before giving up.
pub async fn resolve_start_height(
    client: &dyn LedgerClient,
    settings: &PollingSettings,
) -> Result<u64, IngestError> {
    let backoff = ExponentialBuilder::default()
        .with_min_delay(settings.startup_retry_delay)
        .with_max_times(settings.startup_retries);

    let latest = (|| client.latest_height())
        .retry(backoff)
        .notify(|err: &ClientError, dur: Duration| {
            warn!("Failed to fetch latest block number: {}; retrying in {:?}", err, dur);
        })
        .await
        .map_err(IngestError::StartHeight)?;

    Ok(lookback_start(latest, settings.lookback))
}

/// Spawn [`start_polling`] on the runtime.
///
/// A loop that gives up logs the failure and cancels `shutdown`, taking the
/// rest of the service down with it.
pub fn spawn_ingestion(
    parser: Arc<EthereumParser>,
    client: Arc<dyn LedgerClient>,
    settings: PollingSettings,
    shutdown: CancellationToken,
) -> JoinHandle<Result<(), IngestError>> {
    tokio::spawn(async move {
        let result = start_polling(parser, client, settings, shutdown.clone()).await;
        if let Err(e) = &result {
            error!("Block ingestion failed: {}", e);
            shutdown.cancel();
        }
        result
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainOutcome {
    Completed,
    /// Stopped at a height that failed to fetch.
    Interrupted(u64),
    Cancelled,
}

/// Run the catch-up loop until `shutdown` fires.
///
/// Each iteration polls the chain tip, then processes every block between
/// the current progress and the tip in ascending order, advancing progress
/// after each block that was fetched and filtered.
pub async fn start_polling(
    parser: Arc<EthereumParser>,
    client: Arc<dyn LedgerClient>,
    settings: PollingSettings,
    shutdown: CancellationToken,
) -> Result<(), IngestError> {
    info!("Starting block ingestion after block {}", parser.current_block());

    let mut consecutive_failures = 0u32;

    while !shutdown.is_cancelled() {
        let latest = match client.latest_height().await {
            Ok(latest) => {
                consecutive_failures = 0;
                latest
            }
            Err(e) => {
                consecutive_failures += 1;
                error!("Error getting latest block number: {}", e);

                if settings
                    .max_poll_failures
                    .filter(|&max| max > 0)
                    .is_some_and(|max| consecutive_failures >= max)
                {
                    return Err(IngestError::PollFailures {
                        attempts: consecutive_failures,
                        last: e,
                    });
                }
                if !pause(&shutdown, settings.poll_backoff).await {
                    break;
                }
                continue;
            }
        };
        debug!("Latest block number: {}", latest);

        let next = parser.current_block() + 1;
        if next > latest {
            debug!("No new blocks to process. Sleeping for {:?}", settings.poll_backoff);
            if !pause(&shutdown, settings.poll_backoff).await {
                break;
            }
            continue;
        }

        match drain(&parser, client.as_ref(), next, latest, &settings, &shutdown).await {
            DrainOutcome::Completed => {}
            DrainOutcome::Interrupted(height) => {
                info!("Catch-up stopped at block {}; retrying after backoff", height);
                if !pause(&shutdown, settings.poll_backoff).await {
                    break;
                }
            }
            DrainOutcome::Cancelled => break,
        }
    }

    info!(
        "Shutting down block ingestion at block {}",
        parser.current_block()
    );
    Ok(())
}

async fn drain(
    parser: &EthereumParser,
    client: &dyn LedgerClient,
    from: u64,
    to: u64,
    settings: &PollingSettings,
    shutdown: &CancellationToken,
) -> DrainOutcome {
    for height in from..=to {
        if shutdown.is_cancelled() {
            return DrainOutcome::Cancelled;
        }

        debug!("Processing block number: {}", height);

        match client.block_by_height(height).await {
            Ok(block) => {
                let report = parser.ingest_block(&block);
                if report.matched > 0 {
                    info!("Block {}: {} matching transaction(s)", height, report.matched);
                }
                parser.progress().advance(height);
            }
            Err(e) => {
                error!("Error getting block {}: {}", height, e);
                match settings.skipped_block_policy {
                    SkippedBlockPolicy::Skip => {
                        warn!("Block {} was not scanned and will not be retried", height);
                    }
                    SkippedBlockPolicy::Retry => return DrainOutcome::Interrupted(height),
                }
            }
        }

        // Bounds the request rate against the ledger
        if !pause(shutdown, settings.block_delay).await {
            return DrainOutcome::Cancelled;
        }
    }

    DrainOutcome::Completed
}

/// Sleep for `duration`; `false` when cancelled first.
async fn pause(shutdown: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = sleep(duration) => true,
        _ = shutdown.cancelled() => false,
    }
}
