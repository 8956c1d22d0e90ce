// Core data structures for the rever crawler

use serde::{Deserialize, Serialize};

/// Listing fields as extracted from one listing card
///
/// Produced once per listing node by the extractor. The sequence number is
/// assigned later, when the whole crawl is known.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedListing {
    pub listing_id: Option<String>,
    pub title: Option<String>,
    pub price_billion: Option<f64>,
    pub area_sq_m: Option<f64>,
    pub bedroom_count: Option<i64>,
    pub bathroom_count: Option<i64>,
    pub address: Option<String>,
    pub orientation: Option<String>,
    pub url: Option<String>,
    pub price_per_sq_m_million: Option<f64>,
}

impl ParsedListing {
    /// Fill in the derived price per square meter from price and area
    pub fn with_derived_fields(mut self) -> Self {
        self.price_per_sq_m_million = price_per_sq_m_million(self.price_billion, self.area_sq_m);
        self
    }
}

/// Price per m² in millions, from a price in billions and an area in m²
///
/// Present only when both inputs are present and the area is nonzero.
pub fn price_per_sq_m_million(price_billion: Option<f64>, area_sq_m: Option<f64>) -> Option<f64> {
    match (price_billion, area_sq_m) {
        (Some(price), Some(area)) if area != 0.0 => Some(round2(price * 1000.0 / area)),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row of the export
///
/// Field names serialize to the export column headers, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "STT")]
    pub sequence_number: u32,
    #[serde(rename = "ID tin")]
    pub listing_id: Option<String>,
    #[serde(rename = "Tiêu đề")]
    pub title: Option<String>,
    #[serde(rename = "Giá (tỷ)")]
    pub price_billion: Option<f64>,
    #[serde(rename = "Diện tích (m²)")]
    pub area_sq_m: Option<f64>,
    #[serde(rename = "PN")]
    pub bedroom_count: Option<i64>,
    #[serde(rename = "WC")]
    pub bathroom_count: Option<i64>,
    #[serde(rename = "Địa chỉ")]
    pub address: Option<String>,
    #[serde(rename = "Hướng")]
    pub orientation: Option<String>,
    #[serde(rename = "Link")]
    pub url: Option<String>,
    #[serde(rename = "Giá/m² (triệu)")]
    pub price_per_sq_m_million: Option<f64>,
}

impl ListingRecord {
    /// Column headers in export order
    pub const COLUMNS: [&'static str; 11] = [
        "STT",
        "ID tin",
        "Tiêu đề",
        "Giá (tỷ)",
        "Diện tích (m²)",
        "PN",
        "WC",
        "Địa chỉ",
        "Hướng",
        "Link",
        "Giá/m² (triệu)",
    ];

    /// Number a parsed listing
    pub fn new(sequence_number: u32, listing: ParsedListing) -> Self {
        Self {
            sequence_number,
            listing_id: listing.listing_id,
            title: listing.title,
            price_billion: listing.price_billion,
            area_sq_m: listing.area_sq_m,
            bedroom_count: listing.bedroom_count,
            bathroom_count: listing.bathroom_count,
            address: listing.address,
            orientation: listing.orientation,
            url: listing.url,
            price_per_sq_m_million: listing.price_per_sq_m_million,
        }
    }
}

/// Assign sequence numbers 1..=N in the given order
pub fn number_listings(listings: Vec<ParsedListing>) -> Vec<ListingRecord> {
    listings
        .into_iter()
        .zip(1u32..)
        .map(|(listing, n)| ListingRecord::new(n, listing))
        .collect()
}

/// Outcome of one page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageOutcome {
    /// Page index
    pub page: u32,

    /// Listing containers found on the page
    pub found: usize,

    /// Listings dropped because extraction failed
    pub dropped: usize,

    /// Whether loading the page failed
    pub failed: bool,
}

impl PageOutcome {
    /// Outcome of a page that could not be loaded
    pub fn failed(page: u32) -> Self {
        Self {
            page,
            failed: true,
            ..Default::default()
        }
    }

    /// Number of listings extracted
    pub fn extracted(&self) -> usize {
        self.found - self.dropped
    }
}

/// Crawl statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub listings_found: usize,
    pub listings_dropped: usize,
}

impl CrawlStats {
    /// Fold one page outcome into the totals
    pub fn record(&mut self, outcome: &PageOutcome) {
        self.pages_visited += 1;
        if outcome.failed {
            self.pages_failed += 1;
        }
        self.listings_found += outcome.found;
        self.listings_dropped += outcome.dropped;
    }

    /// Listings that made it into the export
    pub fn listings_extracted(&self) -> usize {
        self.listings_found - self.listings_dropped
    }
}
