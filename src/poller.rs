use crate::fetch::Fetcher;
use crate::{summary, PollStatus, SearchConfig, RETRY_DELAY};
use chrono::Local;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Runs the polling loop: fetch, extract, summarize, append, sleep, repeat.
///
/// A transport error or a degraded extraction is retried after a fixed 60 s
/// delay without writing anything; a poll with no surviving listings skips
/// the write and sleeps the configured interval. The loop has no terminal
/// state; it runs until the process is interrupted.
pub async fn run(config: &SearchConfig, fetcher: &Fetcher) {
    let data_file = config.data_file();
    let mut degraded = false;

    loop {
        info!("Searching for: {}", config.slug());
        let outcome = fetcher.poll(config).await;

        match outcome.status {
            PollStatus::Error => {
                warn!("General error occured. Trying again in 60s.");
                degraded = true;
                sleep(RETRY_DELAY).await;
            }
            PollStatus::Warn => {
                warn!("Scraping failed. Trying again in 60s.");
                degraded = true;
                sleep(RETRY_DELAY).await;
            }
            PollStatus::NoData => {
                if degraded {
                    info!("Continuing collecting data.");
                    degraded = false;
                }
                info!("No listings after filtering, nothing to record.");
                sleep(config.poll_interval).await;
            }
            PollStatus::Success => {
                if degraded {
                    info!("Continuing collecting data.");
                    degraded = false;
                }
                if let Some(row) = summary::summarize(config, &outcome.listings, Local::now()) {
                    info!("Found {} items, average price {}.", row.item_count, row.average_price);
                    if let Err(e) = summary::append_summary(&data_file, &row) {
                        error!("Writing {} failed: {e}", data_file.display());
                    }
                }
                sleep(config.poll_interval).await;
            }
        }
    }
}
