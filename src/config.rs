use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The `SearchConfig` struct holds one search's settings for the process
/// lifetime: the term, the price window, exclusion terms, the polling
/// interval and the directory receiving the CSV, log and PID files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The term to search for, as given on the command line.
    pub term: String,
    /// The minimal price of the item.
    pub min_price: u32,
    /// The maximal price of the item.
    pub max_price: u32,
    /// Listings whose title or description contains any of these terms
    /// (case-insensitive) are dropped.
    pub exclude_terms: Vec<String>,
    /// The time between polls.
    pub poll_interval: Duration,
    /// The directory all output files are written to.
    pub output_dir: PathBuf,
}

impl SearchConfig {
    /// The search term normalized for the request path: lowercase, whitespace
    /// joined with `-`.
    pub fn slug(&self) -> String {
        self.term
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The search term normalized for file names: lowercase, whitespace
    /// joined with `_`.
    pub fn file_stem(&self) -> String {
        self.term
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The CSV time-series file this search appends to.
    pub fn data_file(&self) -> PathBuf {
        self.output_dir.join(format!("data-{}.csv", self.file_stem()))
    }

    /// The PID file overwritten at startup for external supervision.
    pub fn pid_file(&self) -> PathBuf {
        self.output_dir
            .join(format!("process-{}.id", self.file_stem()))
    }

    /// The append-only log file, shared by all searches in the directory.
    pub fn log_file(&self) -> PathBuf {
        self.output_dir.join("collection.log")
    }
}

/// The `SiteConfig` struct holds the HTTP-facing settings: the site base URL,
/// the User-Agent header and the request timeout. Kept separate from
/// `SearchConfig` so tests can point the fetcher at a local server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// The base URL of the listings site, without a trailing slash.
    pub base_url: String,
    /// The user agent string sent with the search request.
    pub user_agent: String,
    /// The timeout duration for the search request.
    pub timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://www.kleinanzeigen.de"),
            user_agent: String::from(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/115.0",
            ),
            timeout: crate::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(term: &str) -> SearchConfig {
        SearchConfig {
            term: term.to_string(),
            min_price: 0,
            max_price: 1000,
            exclude_terms: Vec::new(),
            poll_interval: Duration::from_secs(60),
            output_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(config("RTX 3090").slug(), "rtx-3090");
        assert_eq!(config("  Thinkpad   X1  ").slug(), "thinkpad-x1");
    }

    #[test]
    fn file_stem_uses_underscores() {
        assert_eq!(config("RTX 3090").file_stem(), "rtx_3090");
        assert_eq!(
            config("rtx 3090").data_file(),
            PathBuf::from("./data-rtx_3090.csv")
        );
        assert_eq!(
            config("rtx 3090").pid_file(),
            PathBuf::from("./process-rtx_3090.id")
        );
    }
}
