use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use kleinwatch::{
    config::{SearchConfig, SiteConfig},
    fetch::Fetcher,
    logging, poller,
};

/// Polls a kleinanzeigen.de search on a fixed interval and appends price
/// statistics to a CSV time series.
#[derive(Parser, Debug)]
#[command(name = "kleinwatch", version, about)]
struct Cli {
    /// The term to search for.
    #[arg(short = 's', long = "search-term", value_name = "term", default_value = "")]
    search_term: String,

    /// The minimal price of the item.
    #[arg(short = 'l', long = "min-price", value_name = "price", default_value_t = 0)]
    min_price: u32,

    /// The maximal price of the item.
    #[arg(short = 'u', long = "max-price", value_name = "price", default_value_t = 1000)]
    max_price: u32,

    /// The time intervall in seconds to poll the data.
    #[arg(short = 'i', long = "intervall", value_name = "seconds", default_value_t = 60)]
    intervall: u64,

    /// Listings whose title or description contains any of these terms are ignored.
    #[arg(short = 'e', long = "exclude", value_name = "term", num_args = 0..)]
    exclude: Vec<String>,

    /// Directory the CSV, log and PID files are written to.
    #[arg(short = 'o', long = "output-dir", value_name = "dir", default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = SearchConfig {
        term: cli.search_term,
        min_price: cli.min_price,
        max_price: cli.max_price,
        exclude_terms: cli.exclude,
        poll_interval: Duration::from_secs(cli.intervall),
        output_dir: cli.output_dir,
    };

    logging::init(&config.log_file())
        .with_context(|| format!("opening log file {}", config.log_file().display()))?;

    fs::write(config.pid_file(), std::process::id().to_string())
        .with_context(|| format!("writing PID file {}", config.pid_file().display()))?;

    let fetcher = Fetcher::new(SiteConfig::default())?;

    info!("Collecting data...");
    info!("Writing data to file {}.", config.data_file().display());

    tokio::select! {
        _ = poller::run(&config, &fetcher) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Exiting...");
        }
    }

    Ok(())
}
