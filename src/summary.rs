use crate::{Listing, PollSummary, Result, SearchConfig};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Header of the summary CSV, written once when the file is created.
const CSV_HEADER: &str = "# time,term,search min price,search max price,\
number of items,lowest price,highest price,average price";

/// Reduces one poll's listings to a `PollSummary` row.
///
/// Returns `None` for an empty input: the distinguished no-data outcome, not
/// an error. The result is invariant to listing order. The average is rounded
/// half-to-even, so a mean of 100.5 records as 100 and 101.5 as 102.
pub fn summarize(
    config: &SearchConfig,
    listings: &[Listing],
    timestamp: DateTime<Local>,
) -> Option<PollSummary> {
    if listings.is_empty() {
        return None;
    }

    let prices: Vec<u32> = listings.iter().map(|l| l.price).collect();
    let lowest = prices.iter().copied().min().unwrap_or(0);
    let highest = prices.iter().copied().max().unwrap_or(0);
    let sum: u64 = prices.iter().map(|&p| u64::from(p)).sum();
    let average = (sum as f64 / prices.len() as f64).round_ties_even() as u32;

    Some(PollSummary {
        timestamp,
        term: config.term.clone(),
        min_price: config.min_price,
        max_price: config.max_price,
        item_count: listings.len(),
        lowest_price: lowest,
        highest_price: highest,
        average_price: average,
    })
}

/// Appends one summary row to the CSV at `path`, creating the file with its
/// header line first if it does not exist. The file is opened and closed per
/// write; there is no locking, so one process per search term is assumed.
pub fn append_summary(path: &Path, summary: &PollSummary) -> Result<()> {
    let new_file = !path.exists();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if new_file {
        writeln!(file, "{CSV_HEADER}")?;
    }
    writeln!(
        file,
        "{},{},{},{},{},{},{},{}",
        summary.timestamp.format("%Y-%m-%d %H:%M:%S"),
        summary.term,
        summary.min_price,
        summary.max_price,
        summary.item_count,
        summary.lowest_price,
        summary.highest_price,
        summary.average_price,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config() -> SearchConfig {
        SearchConfig {
            term: "rtx 3090".to_string(),
            min_price: 0,
            max_price: 1000,
            exclude_terms: Vec::new(),
            poll_interval: Duration::from_secs(60),
            output_dir: PathBuf::from("."),
        }
    }

    fn listing(price: u32) -> Listing {
        Listing {
            title: format!("item at {price}"),
            description: "x".to_string(),
            place: "76187 Karlsruhe".to_string(),
            date: "Heute, 10:15".to_string(),
            url: "https://www.kleinanzeigen.de/s-anzeige/x/1".to_string(),
            price,
        }
    }

    #[test]
    fn empty_input_yields_no_summary() {
        assert!(summarize(&config(), &[], Local::now()).is_none());
    }

    #[test]
    fn single_listing_collapses_to_its_price() {
        let summary = summarize(&config(), &[listing(500)], Local::now()).unwrap();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.lowest_price, 500);
        assert_eq!(summary.highest_price, 500);
        assert_eq!(summary.average_price, 500);
    }

    #[test]
    fn min_max_avg_over_several_listings() {
        let listings = [listing(100), listing(300), listing(200)];
        let summary = summarize(&config(), &listings, Local::now()).unwrap();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.lowest_price, 100);
        assert_eq!(summary.highest_price, 300);
        assert_eq!(summary.average_price, 200);
    }

    #[test]
    fn summary_is_invariant_to_listing_order() {
        let now = Local::now();
        let a = summarize(&config(), &[listing(100), listing(300), listing(200)], now).unwrap();
        let b = summarize(&config(), &[listing(300), listing(200), listing(100)], now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn average_rounds_half_to_even() {
        // mean 100.5 rounds down to the even 100
        let summary = summarize(&config(), &[listing(100), listing(101)], Local::now()).unwrap();
        assert_eq!(summary.average_price, 100);

        // mean 101.5 rounds up to the even 102
        let summary = summarize(&config(), &[listing(101), listing(102)], Local::now()).unwrap();
        assert_eq!(summary.average_price, 102);
    }

    #[test]
    fn first_append_writes_header_then_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data-rtx_3090.csv");
        let summary = summarize(&config(), &[listing(500)], Local::now()).unwrap();

        append_summary(&path, &summary).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains(",rtx 3090,0,1000,1,500,500,500"));
    }

    #[test]
    fn later_appends_never_duplicate_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data-rtx_3090.csv");
        let summary = summarize(&config(), &[listing(500)], Local::now()).unwrap();

        append_summary(&path, &summary).unwrap();
        append_summary(&path, &summary).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with('#')).count(), 1);
    }
}
