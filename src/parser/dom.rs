//! DOM query capability used by the extractor
//!
//! Extraction only needs to run selectors under a node and read text and
//! attributes. [`DomNode`] captures that, so listing cards can be parsed from
//! any snapshot of a rendered page, including in-memory fixtures.

use scraper::{ElementRef, Html, Selector};

use crate::utils::normalize_whitespace;

/// A queryable element handle
pub trait DomNode: Sized {
    /// First descendant matching the selector
    fn query(&self, selector: &Selector) -> Option<Self>;

    /// All descendants matching the selector, in document order
    fn query_all(&self, selector: &Selector) -> Vec<Self>;

    /// Rendered text with whitespace collapsed and trimmed
    fn text(&self) -> String;

    /// Attribute value, if present
    fn attribute(&self, name: &str) -> Option<String>;
}

impl DomNode for ElementRef<'_> {
    fn query(&self, selector: &Selector) -> Option<Self> {
        self.select(selector).next()
    }

    fn query_all(&self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn text(&self) -> String {
        normalize_whitespace(&ElementRef::text(self).collect::<String>())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Parsed snapshot of a rendered page
pub struct RenderedPage {
    document: Html,
}

impl RenderedPage {
    /// Parse the serialized document returned by a renderer
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// All elements matching the selector, in document order
    pub fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.document.select(selector).collect()
    }

    /// Whether any element matches the selector
    pub fn contains(&self, selector: &Selector) -> bool {
        self.document.select(selector).next().is_some()
    }
}
