use crate::extract::{ListingExtractor, SelectorSet};
use crate::types::FetchOutcome;
use crate::{Result, SearchConfig, SiteConfig};
use reqwest::Client;
use tracing::{debug, error};

/// The `Fetcher` performs one search-page request per poll and hands the body
/// to the extractor. One instance lives for the whole process; the underlying
/// client is reused across polls.
pub struct Fetcher {
    client: Client,
    extractor: ListingExtractor,
    site: SiteConfig,
}

impl Fetcher {
    /// Creates a new `Fetcher` for the given site.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn new(site: SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&site.user_agent)
            .timeout(site.timeout)
            .gzip(true)
            .build()?;

        let extractor = ListingExtractor::new(SelectorSet::kleinanzeigen(), site.base_url.clone());

        Ok(Self {
            client,
            extractor,
            site,
        })
    }

    /// The search URL for the configured term and price window, encoding the
    /// bounds and the slugified term as path segments.
    pub fn search_url(&self, config: &SearchConfig) -> String {
        format!(
            "{}/s-preis:{}:{}/{}/k0",
            self.site.base_url,
            config.min_price,
            config.max_price,
            config.slug()
        )
    }

    /// Performs one poll: a single blocking GET of the first results page,
    /// then extraction and filtering.
    ///
    /// Any transport-level failure (DNS, connection, timeout, body read) is
    /// terminal for this poll: it is logged and yields an `Error` outcome
    /// with no listings, never a partial result.
    pub async fn poll(&self, config: &SearchConfig) -> FetchOutcome {
        let url = self.search_url(config);
        debug!("Search URL: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Request failed: {e}");
                return FetchOutcome::transport_error();
            }
        };

        debug!("Response status: {}", response.status());

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                error!("Reading response body failed: {e}");
                return FetchOutcome::transport_error();
            }
        };

        self.extractor.extract(&html, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn search_url_encodes_bounds_and_slug() {
        let fetcher = Fetcher::new(SiteConfig::default()).unwrap();
        let config = SearchConfig {
            term: "RTX 3090".to_string(),
            min_price: 0,
            max_price: 1000,
            exclude_terms: Vec::new(),
            poll_interval: Duration::from_secs(60),
            output_dir: PathBuf::from("."),
        };

        assert_eq!(
            fetcher.search_url(&config),
            "https://www.kleinanzeigen.de/s-preis:0:1000/rtx-3090/k0"
        );
    }
}
