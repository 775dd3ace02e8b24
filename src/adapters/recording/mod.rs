//! Recording adapters that capture interactions to cassettes.

pub mod describer;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use describer::RecordingDescriber;

/// Records a fallible call using the `{"Ok": v}` / `{"Err": "message"}` convention.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output = match result {
        Ok(value) => serde_json::json!({ "Ok": value }),
        Err(err) => serde_json::json!({ "Err": err.to_string() }),
    };
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => tracing::warn!(port, method, "cassette recorder lock poisoned; interaction dropped"),
    }
}
