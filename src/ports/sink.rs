//! Commit port: the external store of record for the collection.

use crate::model::LinkRecord;

/// A commit was refused or could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to commit collection: {0}")]
pub struct CommitError(pub String);

/// Receives full collection snapshots.
///
/// Every call replaces the store's notion of the collection; there is no
/// partial update. Callers treat a returned `Ok` as "persisted".
pub trait CollectionSink: Send + Sync {
    /// Replaces the stored collection with `links`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot accept the snapshot.
    fn commit(&self, links: &[LinkRecord]) -> Result<(), CommitError>;
}
