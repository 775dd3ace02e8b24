//! Live adapter for the `DescriptionGenerator` port.
//!
//! Dispatches on [`ProviderConfig::provider`] to the Gemini or
//! OpenAI-compatible client and normalises the text they return.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{gemini, openai};
use crate::config::{Provider, ProviderConfig};
use crate::enrich::prompt::{build_prompt, clean_description};
use crate::ports::describer::{DescribeFuture, DescribeRequest, DescriptionGenerator, ProviderError};

/// Calls the configured provider over HTTPS.
pub struct LiveDescriber {
    client: Client,
}

impl LiveDescriber {
    /// Creates a describer with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveDescriber {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionGenerator for LiveDescriber {
    fn describe(&self, request: &DescribeRequest, config: &ProviderConfig) -> DescribeFuture<'_> {
        let prompt = build_prompt(request);
        let config = config.clone();

        Box::pin(async move {
            let raw = match config.provider {
                Provider::Gemini => gemini::generate(&self.client, &config, &prompt).await?,
                Provider::OpenaiCompatible => {
                    openai::generate(&self.client, &config, &prompt).await?
                }
            };
            clean_description(&raw)
                .ok_or_else(|| ProviderError::Empty { provider: config.provider.to_string() })
        })
    }
}

/// Error body shared by both providers: `{"error": {"message": "..."}}`.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Detail inside an error body.
#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Sends `body` as JSON and returns the response text of a successful call.
pub(crate) async fn post_json<B: Serialize>(
    request: RequestBuilder,
    body: &B,
    provider: Provider,
) -> Result<String, ProviderError> {
    let response = request.json(body).send().await.map_err(|e| ProviderError::Transport {
        provider: provider.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| ProviderError::Transport {
        provider: provider.to_string(),
        message: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
            message: error_message(&text),
        });
    }
    Ok(text)
}

/// Pulls the provider's error message out of a body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body).map_or_else(|_| body.trim().to_string(), |e| e.error.message)
}

pub(crate) fn malformed(provider: Provider, err: &serde_json::Error) -> ProviderError {
    ProviderError::Malformed { provider: provider.to_string(), message: err.to_string() }
}
