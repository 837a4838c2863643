//! Search and category filtering for post listings.
//!
//! A record is kept when both hold:
//!
//! - **search**: the term is empty, or appears in the title or excerpt,
//!   ignoring case;
//! - **category**: the facet is [`CategoryFilter::All`], or equals the
//!   record's category exactly (case-sensitive).
//!
//! Filtering is stable and never looks at publication status. An empty result
//! is a normal outcome the caller renders as an empty state.

use crate::types::ContentRecord;

/// Category facet selected in the listing UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a facet parameter. `None`, empty, and `"all"` select everything.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("") | Some("all") => CategoryFilter::All,
            Some(category) => CategoryFilter::Only(category.to_string()),
        }
    }

    pub fn matches(&self, record: &ContentRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == *category,
        }
    }
}

fn matches_search(record: &ContentRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.title.to_lowercase().contains(needle)
        || record.excerpt.to_lowercase().contains(needle)
}

/// Records matching both the search term and the category facet, in input
/// order.
pub fn filter_content<'a, I>(
    records: I,
    search_term: &str,
    category: &CategoryFilter,
) -> Vec<&'a ContentRecord>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let needle = search_term.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches_search(record, &needle) && category.matches(record))
        .collect()
}
