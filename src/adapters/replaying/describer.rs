//! Replaying adapter for the `DescriptionGenerator` port.

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::config::ProviderConfig;
use crate::ports::describer::{DescribeFuture, DescribeRequest, DescriptionGenerator, ProviderError};

/// Serves recorded descriptions in order, ignoring the request contents.
pub struct ReplayingDescriber {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingDescriber {
    /// Creates a describer backed by `replayer`.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next_output(&self) -> Result<String, ProviderError> {
        let output = {
            let mut replayer = self
                .replayer
                .lock()
                .map_err(|_| ProviderError::Other("cassette replayer lock poisoned".into()))?;
            replayer.next_interaction("describer", "describe").output
        };
        decode_output(&output)
    }
}

/// Decodes the `{"Ok": text}` / `{"Err": message}` convention.
fn decode_output(output: &serde_json::Value) -> Result<String, ProviderError> {
    if let Some(text) = output.get("Ok").and_then(serde_json::Value::as_str) {
        return Ok(text.to_string());
    }
    if let Some(message) = output.get("Err").and_then(serde_json::Value::as_str) {
        return Err(ProviderError::Other(message.to_string()));
    }
    Err(ProviderError::Other(format!("unrecognised cassette output: {output}")))
}

impl DescriptionGenerator for ReplayingDescriber {
    fn describe(&self, _request: &DescribeRequest, _config: &ProviderConfig) -> DescribeFuture<'_> {
        let result = self.next_output();
        Box::pin(async move { result })
    }
}
