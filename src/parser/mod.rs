//! HTML parsing and data extraction
//!
//! This module handles reading rendered rever.vn result pages and extracting
//! structured listing data from each listing card.

pub mod dom;
pub mod listing;
pub mod normalize;
pub mod selectors;

// Re-export main parser and public types
pub use dom::{DomNode, RenderedPage};
pub use listing::ListingExtractor;
pub use normalize::extract_number;
pub use selectors::{InfoKind, ListingSelectors, LISTING_CONTAINER};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_keeps_document_order() {
        let html = r#"
            <main>
              <article class="box listView"><div class="listing-address"><p>A1 •</p></div></article>
              <article class="box gridView"><div class="listing-address"><p>skip</p></div></article>
              <article class="box listView"><ul class="listing-info"><li><i></i>1</li></ul></article>
              <article class="box listView"><div class="listing-address"><p>A3 •</p></div></article>
            </main>
        "#;
        let page = RenderedPage::parse(html);
        let results = ListingExtractor::new().extract_page(&page);

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap().listing_id.as_deref(),
            Some("A1")
        );
        assert!(results[1].is_err());
        assert_eq!(
            results[2].as_ref().unwrap().listing_id.as_deref(),
            Some("A3")
        );
    }

    #[test]
    fn test_extract_page_without_listings() {
        let page = RenderedPage::parse("<html><body><p>Không có kết quả</p></body></html>");
        assert!(ListingExtractor::new().extract_page(&page).is_empty());
    }
}
