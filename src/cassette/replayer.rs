//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions in order, one queue per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Indexes the cassette's interactions.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Loads a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette {}: {e}", path.display()))?;
        Ok(Self::new(&cassette))
    }

    /// Interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Returns the next interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics with the available pairs when the cassette has nothing (left)
    /// for this pair; a replay that diverges from its recording is a bug in
    /// the test, not a runtime condition.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: "describe".into(), input: json!({}), output }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), interactions }
    }

    #[test]
    fn serves_each_port_in_recording_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "describer", json!({"Ok": "one"})),
            interaction(1, "other", json!({"Ok": "x"})),
            interaction(2, "describer", json!({"Ok": "two"})),
        ]));

        assert_eq!(replayer.next_interaction("describer", "describe").seq, 0);
        assert_eq!(replayer.next_interaction("describer", "describe").seq, 2);
        assert_eq!(replayer.remaining(), 1);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_queue_panics() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![interaction(0, "describer", json!({"Ok": "a"}))]));
        let _ = replayer.next_interaction("describer", "describe");
        let _ = replayer.next_interaction("describer", "describe");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![]));
        let _ = replayer.next_interaction("describer", "describe");
    }
}
