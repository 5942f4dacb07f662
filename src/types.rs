use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One ad extracted from a results-page card. A `Listing` is only constructed
/// when all six fields were present on the card; partial cards are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub description: String,
    /// Location text as shown on the card, e.g. `76187 Karlsruhe`.
    pub place: String,
    /// The site's relative date text, e.g. `Heute, 10:15`. Not parsed.
    pub date: String,
    /// Absolute URL of the detail page.
    pub url: String,
    /// Price in whole euros, parsed from the card's free-text price.
    pub price: u32,
}

/// The outcome classification shared by fetching and summarizing, so callers
/// pattern-match exhaustively instead of comparing sentinel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollStatus {
    /// Every card on the page extracted cleanly.
    Success,
    /// At least one card failed extraction; the rest are usable.
    Warn,
    /// The transport call itself failed; no page to extract from.
    Error,
    /// The fetch succeeded but no listings survived filtering.
    NoData,
}

/// The result of one poll: a status and the listings extracted, in the order
/// their cards appeared in the document.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub status: PollStatus,
    pub listings: Vec<Listing>,
}

impl FetchOutcome {
    /// The outcome of a failed transport call: terminal for this poll,
    /// never a partial result.
    pub fn transport_error() -> Self {
        Self {
            status: PollStatus::Error,
            listings: Vec::new(),
        }
    }
}

/// One row of the CSV time series: the price statistics of a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSummary {
    pub timestamp: DateTime<Local>,
    pub term: String,
    pub min_price: u32,
    pub max_price: u32,
    pub item_count: usize,
    pub lowest_price: u32,
    pub highest_price: u32,
    /// Arithmetic mean of the listing prices, rounded half-to-even.
    pub average_price: u32,
}
