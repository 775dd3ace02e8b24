//! Recording adapter for the `DescriptionGenerator` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::ProviderConfig;
use crate::ports::describer::{DescribeFuture, DescribeRequest, DescriptionGenerator};

/// What gets written for each call. The API key is deliberately absent.
#[derive(Serialize)]
struct RecordedInput<'a> {
    title: &'a str,
    url: &'a str,
    provider: &'a str,
    model: &'a str,
}

/// Delegates to an inner generator and records every call.
pub struct RecordingDescriber {
    inner: Box<dyn DescriptionGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingDescriber {
    /// Wraps `inner`, appending to `recorder`.
    pub fn new(inner: Box<dyn DescriptionGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl DescriptionGenerator for RecordingDescriber {
    fn describe(&self, request: &DescribeRequest, config: &ProviderConfig) -> DescribeFuture<'_> {
        let request = request.clone();
        let config = config.clone();

        Box::pin(async move {
            let result = self.inner.describe(&request, &config).await;
            let input = RecordedInput {
                title: &request.title,
                url: &request.url,
                provider: config.provider.as_str(),
                model: config.effective_model(),
            };
            record_result(&self.recorder, "describer", "describe", &input, &result);
            result
        })
    }
}
