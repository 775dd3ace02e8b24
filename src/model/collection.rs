//! Pure operations over an ordered link collection.
//!
//! A collection is a plain `[LinkRecord]` slice whose order is the canonical
//! display order. Nothing here mutates its input except [`set_description`];
//! every other function hands back a new snapshot for the caller to commit.

use std::collections::HashSet;

use super::link::LinkRecord;

/// Raised when a collection contains the same identifier twice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate link id `{0}` in collection")]
pub struct DuplicateIdError(pub String);

/// Which links a filtered view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every link.
    #[default]
    All,
    /// Only links filed under the given category id.
    Only(String),
}

impl CategoryFilter {
    /// Builds a filter from an optional category id; `None` and `"all"` mean [`CategoryFilter::All`].
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("all") => Self::All,
            Some(id) => Self::Only(id.to_string()),
        }
    }

    fn matches(&self, link: &LinkRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => link.category_id == *id,
        }
    }
}

/// Returns the index of the record with the given id.
#[must_use]
pub fn position(links: &[LinkRecord], id: &str) -> Option<usize> {
    links.iter().position(|link| link.id == id)
}

/// Moves `moved_id` so that it sits immediately before `target_id`.
///
/// Returns the input unchanged when both ids are equal or either one is
/// absent. The result is always a permutation of the input in which every
/// other pair of records keeps its relative order.
#[must_use]
pub fn move_before(links: &[LinkRecord], moved_id: &str, target_id: &str) -> Vec<LinkRecord> {
    if moved_id == target_id {
        return links.to_vec();
    }
    let (Some(from), Some(_)) = (position(links, moved_id), position(links, target_id)) else {
        return links.to_vec();
    };

    let mut reordered = links.to_vec();
    let moved = reordered.remove(from);
    // The target shifts left by one when the moved record came before it.
    let to = position(&reordered, target_id).unwrap_or(reordered.len());
    reordered.insert(to, moved);
    reordered
}

/// Returns `true` when both slices list the same ids in the same order.
#[must_use]
pub fn same_order(a: &[LinkRecord], b: &[LinkRecord]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id == y.id)
}

/// Ids of the records lacking a description, in collection order.
#[must_use]
pub fn missing_descriptions(links: &[LinkRecord]) -> Vec<String> {
    links.iter().filter(|link| link.needs_description()).map(|link| link.id.clone()).collect()
}

/// Replaces the description of the record with the given id.
///
/// Matches by identity, not position. Returns `false` if no record has that id.
pub fn set_description(links: &mut [LinkRecord], id: &str, description: &str) -> bool {
    match links.iter_mut().find(|link| link.id == id) {
        Some(link) => {
            link.description = Some(description.to_string());
            true
        }
        None => false,
    }
}

/// Returns the records matching `filter`, preserving order.
#[must_use]
pub fn filter_by_category<'a>(links: &'a [LinkRecord], filter: &CategoryFilter) -> Vec<&'a LinkRecord> {
    links.iter().filter(|link| filter.matches(link)).collect()
}

/// Distinct category ids in order of first appearance.
#[must_use]
pub fn categories_in_use(links: &[LinkRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| seen.insert(link.category_id.as_str()))
        .map(|link| link.category_id.clone())
        .collect()
}

/// Checks that every id appears at most once.
///
/// # Errors
///
/// Returns the first repeated id.
pub fn ensure_unique_ids(links: &[LinkRecord]) -> Result<(), DuplicateIdError> {
    let mut seen = HashSet::new();
    for link in links {
        if !seen.insert(link.id.as_str()) {
            return Err(DuplicateIdError(link.id.clone()));
        }
    }
    Ok(())
}
