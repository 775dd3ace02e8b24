//! Google Gemini `generateContent` client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::describer::{malformed, post_json};
use crate::config::{Provider, ProviderConfig};
use crate::ports::describer::ProviderError;

const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Endpoint for `model`, honouring a custom API root when one is configured.
#[must_use]
pub fn endpoint(config: &ProviderConfig) -> String {
    let root = config.base_url.as_deref().unwrap_or(GEMINI_API_ROOT).trim_end_matches('/');
    format!("{root}/models/{}:generateContent", config.effective_model())
}

/// Sends `prompt` and returns the raw text of the first candidate.
///
/// # Errors
///
/// Returns a [`ProviderError`] on transport, HTTP status or parse failures.
pub async fn generate(
    client: &Client,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<String, ProviderError> {
    let body = GenerateRequest { contents: vec![Content { parts: vec![Part { text: prompt }] }] };
    let request = client.post(endpoint(config)).header("x-goog-api-key", &config.api_key);
    let text = post_json(request, &body, Provider::Gemini).await?;
    parse_response(&text)
}

/// Concatenates the text parts of the first candidate.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] if the body is not a generate response.
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| malformed(Provider::Gemini, &e))?;
    Ok(response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default())
}
