//! Clock port for timestamping failures and recordings.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Swapped for a fixed clock in tests so failure records are deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
