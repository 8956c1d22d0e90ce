//! CSS selectors for rever.vn search result pages
//!
//! A results page holds one `article.box.listView` card per listing. Inside a
//! card, the address block carries the listing identifier in its first
//! paragraph followed by the address fragments as links; the info list holds
//! one `li` per attribute, each tagged with an icon whose class names the
//! attribute.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Listing card container; also the readiness marker for a results page
pub const LISTING_CONTAINER: &str = "article.box.listView";

lazy_static! {
    static ref CONTAINER: Selector = parse_selector!("article.box.listView");
    static ref LISTING_ID: Selector = parse_selector!("div.listing-address p:first-child");
    static ref TITLE_LINK: Selector = parse_selector!("h3 a.listing-name");
    static ref PRICE: Selector = parse_selector!("div.listing-price a.listing-price-link");
    static ref ADDRESS_PARTS: Selector = parse_selector!("div.listing-address p:not(:first-child) a");
    static ref INFO_ITEMS: Selector = parse_selector!("ul.listing-info li");
    static ref INFO_ICON: Selector = parse_selector!("i");
}

/// Selectors for one listing card
pub struct ListingSelectors {
    pub container: &'static Selector,
    pub listing_id: &'static Selector,
    pub title_link: &'static Selector,
    pub price: &'static Selector,
    pub address_parts: &'static Selector,
    pub info_items: &'static Selector,
    pub info_icon: &'static Selector,
}

impl ListingSelectors {
    pub fn new() -> Self {
        Self {
            container: &CONTAINER,
            listing_id: &LISTING_ID,
            title_link: &TITLE_LINK,
            price: &PRICE,
            address_parts: &ADDRESS_PARTS,
            info_items: &INFO_ITEMS,
            info_icon: &INFO_ICON,
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute an info-list item describes, told apart by its icon class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    Bedrooms,
    Bathrooms,
    Area,
    Orientation,
}

impl InfoKind {
    /// Icon class markers, checked in this order
    const MARKERS: [(&'static str, InfoKind); 4] = [
        ("zmdi-airline-seat-individual-suite", InfoKind::Bedrooms),
        ("icon-bath-room", InfoKind::Bathrooms),
        ("zmdi-photo-size-select-small", InfoKind::Area),
        ("zmdi-compass", InfoKind::Orientation),
    ];

    /// Classify an icon by substring match on its class attribute
    pub fn classify(icon_class: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| icon_class.contains(marker))
            .map(|(_, kind)| *kind)
    }
}
