//! Listing search and featured ranking rules.
//!
//! Adapters that push these rules into a query language must agree with the
//! in-process definitions here; the in-memory store uses them directly.

use std::cmp::Ordering;

use crate::domain::Business;

/// Number of businesses shown on the featured strip.
pub const FEATURED_LIMIT: usize = 3;

/// Case-insensitive substring filter over name, category and location.
///
/// A blank query matches every listing.
///
/// # Examples
/// ```
/// use pulse_backend::domain::SearchQuery;
///
/// let query = SearchQuery::new(Some("  CAFE ".into()));
/// assert_eq!(query.needle(), Some("cafe"));
/// assert!(SearchQuery::new(Some("   ".into())).needle().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    pub fn new(raw: Option<String>) -> Self {
        let needle = raw
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty());
        Self { needle }
    }

    /// Lower-cased search text, or `None` when the query matches everything.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    pub fn matches(&self, business: &Business) -> bool {
        let Some(needle) = self.needle() else {
            return true;
        };
        [&business.name, &business.category, &business.location]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Ordering of search results: name, case-insensitively, then id.
pub fn listing_order(a: &Business, b: &Business) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

/// Featured ranking: average rating descending, then review count
/// descending, then id for a stable result.
pub fn featured_order(a: &Business, b: &Business) -> Ordering {
    b.rating
        .average()
        .cmp(&a.rating.average())
        .then_with(|| b.rating.review_count().cmp(&a.rating.review_count()))
        .then_with(|| a.id.cmp(&b.id))
}
