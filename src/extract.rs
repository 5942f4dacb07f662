use crate::{Listing, PollStatus, Result, ScoutError, SearchConfig};
use scraper::{ElementRef, Html, Selector};
use tracing::{instrument, warn};

use crate::types::FetchOutcome;

/// The CSS selectors locating an ad card and its fields in the site's markup.
///
/// The markup class names are an external, versioned contract with the site;
/// when the site re-skins, this table is the only thing that changes.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    /// One listing's container on the results page.
    pub card: Selector,
    /// The detail-page link carrying the title.
    pub link: Selector,
    pub price: Selector,
    pub description: Selector,
    pub place: Selector,
    pub date: Selector,
}

impl SelectorSet {
    /// Builds a selector set from raw CSS strings, failing on the first
    /// invalid one rather than silently skipping it.
    pub fn new(
        card: &str,
        link: &str,
        price: &str,
        description: &str,
        place: &str,
        date: &str,
    ) -> Result<Self> {
        let parse =
            |s: &str| Selector::parse(s).map_err(|_| ScoutError::SelectorError(s.to_string()));
        Ok(Self {
            card: parse(card)?,
            link: parse(link)?,
            price: parse(price)?,
            description: parse(description)?,
            place: parse(place)?,
            date: parse(date)?,
        })
    }

    /// The selector table for kleinanzeigen.de's current results page.
    pub fn kleinanzeigen() -> Self {
        Self::new(
            "div.aditem-main",
            "a.ellipsis",
            "p.aditem-main--middle--price-shipping--price",
            "p.aditem-main--middle--description",
            "div.aditem-main--top--left",
            "div.aditem-main--top--right",
        )
        .expect("built-in selectors are valid")
    }
}

/// The `ListingExtractor` turns a rendered results page into `Listing`
/// records. Extraction is per card: a malformed card is logged and skipped,
/// never aborting the batch.
pub struct ListingExtractor {
    selectors: SelectorSet,
    /// Base URL joined onto relative detail-page links.
    base_url: String,
}

impl ListingExtractor {
    pub fn new(selectors: SelectorSet, base_url: impl Into<String>) -> Self {
        Self {
            selectors,
            base_url: base_url.into(),
        }
    }

    /// Extracts all listings from the given HTML, in document order, applying
    /// the buyer-seeking and exclude-term filters from `config`.
    ///
    /// The returned status is `Success` when every card extracted cleanly,
    /// `Warn` when at least one card failed, and `NoData` when no listing
    /// survived extraction and filtering.
    #[instrument(skip(self, html, config), fields(html_length = html.len()))]
    pub fn extract(&self, html: &str, config: &SearchConfig) -> FetchOutcome {
        let document = Html::parse_document(html);

        let mut listings = Vec::new();
        let mut failures = 0usize;

        for card in document.select(&self.selectors.card) {
            match self.extract_card(card) {
                Ok(listing) => {
                    if !is_filtered(&listing, config) {
                        listings.push(listing);
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("Warning: parsing failed: {e}");
                }
            }
        }

        let status = if failures > 0 {
            PollStatus::Warn
        } else if listings.is_empty() {
            PollStatus::NoData
        } else {
            PollStatus::Success
        };

        FetchOutcome { status, listings }
    }

    /// Extracts the six fields of a single card. Any missing or malformed
    /// field fails the whole card; no partial `Listing` is ever produced.
    fn extract_card(&self, card: ElementRef<'_>) -> Result<Listing> {
        let link = card
            .select(&self.selectors.link)
            .next()
            .ok_or_else(|| ScoutError::ExtractionError("missing title link".into()))?;

        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| ScoutError::ExtractionError("title link has no href".into()))?;
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        };

        let title = squish(&text_of(link));
        let price_text = self.field(card, &self.selectors.price, "price")?;
        let description = self.field(card, &self.selectors.description, "description")?;
        let place = self.field(card, &self.selectors.place, "place")?;
        let date = self.field(card, &self.selectors.date, "date")?;

        if title.is_empty() {
            return Err(ScoutError::ExtractionError("empty title".into()));
        }

        Ok(Listing {
            title,
            description,
            place,
            date,
            url,
            price: parse_price(&price_text)?,
        })
    }

    /// Extracts one whitespace-normalized, non-empty text field from a card.
    fn field(&self, card: ElementRef<'_>, selector: &Selector, name: &str) -> Result<String> {
        let text = card
            .select(selector)
            .next()
            .map(|el| squish(&text_of(el)))
            .ok_or_else(|| ScoutError::ExtractionError(format!("missing {name}")))?;
        if text.is_empty() {
            return Err(ScoutError::ExtractionError(format!("empty {name}")));
        }
        Ok(text)
    }
}

/// Whether a listing is a want-to-buy post or matches a configured exclusion
/// term. Matching is case-insensitive substring against title and description.
fn is_filtered(listing: &Listing, config: &SearchConfig) -> bool {
    let title = listing.title.to_lowercase();
    let description = listing.description.to_lowercase();

    if title.contains(crate::BUYER_SEEKING_MARKER)
        || description.contains(crate::BUYER_SEEKING_MARKER)
    {
        return true;
    }

    config.exclude_terms.iter().any(|term| {
        let term = term.to_lowercase();
        title.contains(&term) || description.contains(&term)
    })
}

/// Parses the card's free-text price: the first run of digits and dots is
/// taken, dots are dropped as thousands separators, and the rest parsed as
/// whole euros. `"1.234 € VB"` parses to 1234.
fn parse_price(text: &str) -> Result<u32> {
    let run: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .filter(|c| c.is_ascii_digit())
        .collect();

    run.parse()
        .map_err(|_| ScoutError::ExtractionError(format!("no price in `{}`", text.trim())))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

/// Collapses all whitespace runs to single spaces and trims the ends.
fn squish(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
