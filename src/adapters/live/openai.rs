//! OpenAI-compatible chat-completions client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::describer::{malformed, post_json};
use crate::config::{Provider, ProviderConfig};
use crate::ports::describer::ProviderError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions URL under the configured base URL.
#[must_use]
pub fn endpoint(config: &ProviderConfig) -> String {
    let base = config.base_url.as_deref().unwrap_or_default().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

/// Sends `prompt` as a single user message and returns the first choice.
///
/// # Errors
///
/// Returns a [`ProviderError`] on transport, HTTP status or parse failures.
pub async fn generate(
    client: &Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, ProviderError> {
    let body = ChatRequest {
        model: config.effective_model(),
        messages: vec![ChatMessage { role: "user", content: prompt }],
    };
    let request = client.post(endpoint(config)).bearer_auth(&config.api_key);
    let text = post_json(request, &body, Provider::OpenaiCompatible).await?;
    parse_response(&text)
}

/// Extracts the first choice's message content.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] if the body is not a chat response.
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| malformed(Provider::OpenaiCompatible, &e))?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default())
}
