//! Link record and category types.

use serde::{Deserialize, Serialize};

/// A single bookmarked link.
///
/// The `id` is opaque and stable for the lifetime of the record. Records are
/// created and deleted outside this crate; here only their position and
/// description ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Short description. Absence marks the record for enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon URI or text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Category this link is filed under.
    pub category_id: String,
}

impl LinkRecord {
    /// Creates a record without description or icon.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            description: None,
            icon: None,
            category_id: category_id.into(),
        }
    }

    /// Returns a copy of this record carrying the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` when the record has no usable description.
    ///
    /// Blank descriptions count as missing.
    #[must_use]
    pub fn needs_description(&self) -> bool {
        self.description.as_deref().is_none_or(|d| d.trim().is_empty())
    }
}

/// A category links can be filed under. Read-only from this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier referenced by [`LinkRecord::category_id`].
    pub id: String,
    /// Human-readable name.
    pub name: String,
}
