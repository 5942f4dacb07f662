use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod poller;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use config::{SearchConfig, SiteConfig};
pub use types::{FetchOutcome, Listing, PollStatus, PollSummary};

/// The `ScoutError` enum represents the errors that can occur while polling,
/// extracting and recording listings.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Represents a transport-level failure of the search request.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Represents an invalid CSS selector in the selector table.
    #[error("invalid selector `{0}`")]
    SelectorError(String),
    /// Represents a card that is missing one of its required fields.
    #[error("card extraction failed: {0}")]
    ExtractionError(String),
    /// Represents a failure to write the summary CSV.
    #[error("CSV write failed: {0}")]
    CsvError(#[from] std::io::Error),
}

/// A type alias for `Result` with the `ScoutError` error type.
pub type Result<T> = std::result::Result<T, ScoutError>;

// Constants

/// The default timeout duration for the search request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// The delay before retrying after a failed or degraded poll.
pub const RETRY_DELAY: Duration = Duration::from_secs(60);
/// Marker used by the site for want-to-buy posts; such cards are never recorded.
pub const BUYER_SEEKING_MARKER: &str = "suche";
