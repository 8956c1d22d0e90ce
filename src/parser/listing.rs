//! Listing card extraction
//!
//! Turns one `article.box.listView` card into a [`ParsedListing`]. Missing
//! elements leave their field empty; only malformed values fail the card.

use crate::models::ParsedListing;
use crate::parser::dom::{DomNode, RenderedPage};
use crate::parser::normalize::{strip_tokens, to_count, try_extract_number};
use crate::parser::selectors::{InfoKind, ListingSelectors};
use crate::utils::error::ExtractError;

/// Separator the site appends to the listing identifier
const ID_SEPARATOR: &str = " •";

/// Currency tokens stripped from the price before normalizing
const PRICE_TOKENS: &[&str] = &["tỷ", "VND"];

/// Unit suffix stripped from the area before normalizing
const AREA_TOKENS: &[&str] = &["m²"];

/// Extractor for rever.vn listing cards
pub struct ListingExtractor {
    selectors: ListingSelectors,
}

impl ListingExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: ListingSelectors::new(),
        }
    }

    /// Extract one listing card
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::MissingIconClass` for an info icon without a
    /// class, `ExtractError::InvalidNumber` when a numeric field holds a
    /// malformed number and `ExtractError::InvalidCount` when a room count is
    /// out of range.
    pub fn parse_listing<N: DomNode>(&self, node: &N) -> Result<ParsedListing, ExtractError> {
        let listing_id = node
            .query(self.selectors.listing_id)
            .map(|el| el.text().replace(ID_SEPARATOR, "").trim().to_string());

        let (title, url) = match node.query(self.selectors.title_link) {
            Some(link) => (link.attribute("title"), link.attribute("href")),
            None => (None, None),
        };

        let price_billion = self.extract_price(node)?;
        let address = self.extract_address(node);
        let info = self.extract_info(node)?;

        let listing = ParsedListing {
            listing_id,
            title,
            price_billion,
            area_sq_m: info.area,
            bedroom_count: info.bedrooms,
            bathroom_count: info.bathrooms,
            address,
            orientation: info.orientation,
            url,
            price_per_sq_m_million: None,
        };

        Ok(listing.with_derived_fields())
    }

    /// Extract every listing card on a page, in document order
    pub fn extract_page(&self, page: &RenderedPage) -> Vec<Result<ParsedListing, ExtractError>> {
        page.query_all(self.selectors.container)
            .iter()
            .map(|card| self.parse_listing(card))
            .collect()
    }

    fn extract_price<N: DomNode>(&self, node: &N) -> Result<Option<f64>, ExtractError> {
        let Some(price) = node.query(self.selectors.price) else {
            return Ok(None);
        };

        let text = price.text();
        if text.is_empty() {
            return Ok(None);
        }

        try_extract_number(Some(&strip_tokens(&text, PRICE_TOKENS)))
            .map_err(|e| e.in_field("price"))
    }

    fn extract_address<N: DomNode>(&self, node: &N) -> Option<String> {
        let parts: Vec<String> = node
            .query_all(self.selectors.address_parts)
            .iter()
            .map(|el| el.text())
            .filter(|text| !text.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Walk the info list; a later item of the same kind replaces an earlier one
    fn extract_info<N: DomNode>(&self, node: &N) -> Result<InfoFields, ExtractError> {
        let mut info = InfoFields::default();

        for (index, item) in node.query_all(self.selectors.info_items).iter().enumerate() {
            let Some(icon) = item.query(self.selectors.info_icon) else {
                continue;
            };

            let icon_class = icon
                .attribute("class")
                .ok_or(ExtractError::MissingIconClass { item: index })?;

            let Some(kind) = InfoKind::classify(&icon_class) else {
                tracing::trace!(item = index, class = %icon_class, "Ignoring unknown info icon");
                continue;
            };

            let text = item.text();
            match kind {
                InfoKind::Bedrooms => {
                    info.bedrooms = count_from(&text).map_err(|e| e.in_field("bedrooms"))?;
                }
                InfoKind::Bathrooms => {
                    info.bathrooms = count_from(&text).map_err(|e| e.in_field("bathrooms"))?;
                }
                InfoKind::Area => {
                    let stripped = strip_tokens(&text, AREA_TOKENS);
                    info.area = try_extract_number(Some(stripped.trim()))
                        .map_err(|e| e.in_field("area"))?;
                }
                InfoKind::Orientation => {
                    info.orientation = Some(text);
                }
            }
        }

        Ok(info)
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct InfoFields {
    bedrooms: Option<i64>,
    bathrooms: Option<i64>,
    area: Option<f64>,
    orientation: Option<String>,
}

fn count_from(text: &str) -> Result<Option<i64>, ExtractError> {
    to_count(try_extract_number(Some(text))?)
}
