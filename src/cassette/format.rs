//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded call to a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `"describer"`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// What was sent.
    pub input: serde_json::Value,
    /// What came back, using the `{"Ok": ..}` / `{"Err": ..}` convention for fallible calls.
    pub output: serde_json::Value,
}

/// A named sequence of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording was written.
    pub recorded_at: DateTime<Utc>,
    /// Interactions in recording order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Parses a cassette from YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document does not match the format.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hand_written_cassette() {
        let yaml = r#"
name: two-links
recorded_at: 2025-03-01T12:00:00Z
interactions:
  - seq: 0
    port: describer
    method: describe
    input: { title: GitHub, url: "https://github.com" }
    output: { Ok: "Code hosting." }
  - seq: 1
    port: describer
    method: describe
    input: { title: Broken, url: "https://broken.example" }
    output: { Err: "HTTP 500" }
"#;
        let cassette = Cassette::from_yaml(yaml).unwrap();
        assert_eq!(cassette.name, "two-links");
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].output, json!({"Ok": "Code hosting."}));
        assert_eq!(cassette.interactions[1].input["title"], "Broken");
    }
}
