//! Observable progress of an enrichment run.

use std::fmt;

use serde::Serialize;

/// Snapshot published at start, after every item and at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    /// Items processed so far, successes and failures alike.
    pub current: usize,
    /// Items targeted by the run.
    pub total: usize,
    /// Whether a run is live.
    pub running: bool,
}

impl Progress {
    /// Percentage complete, `100` for an empty run.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.current.min(self.total) * 100 / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.current, self.total, self.percent())
    }
}
