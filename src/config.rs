//! Provider and application settings.
//!
//! Settings come from the environment (optionally seeded from a `.env` file
//! by the binary) and can be overridden by CLI flags.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default model for the Gemini provider.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default model for OpenAI-compatible providers.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
/// Default location of the collection document.
pub const DEFAULT_STORE_PATH: &str = "links.yaml";

/// Which text-generation backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// Any endpoint speaking the `OpenAI` chat-completions protocol.
    OpenaiCompatible,
}

impl Provider {
    /// Stable name used in logs, errors and cassettes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenaiCompatible => "openai-compatible",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" | "openai-compatible" => Ok(Self::OpenaiCompatible),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No API key configured.
    #[error("no API key configured for {0}; set LINKBOARD_API_KEY")]
    MissingApiKey(Provider),
    /// The OpenAI-compatible provider needs an endpoint.
    #[error("provider openai-compatible requires a base URL; set LINKBOARD_BASE_URL")]
    MissingBaseUrl,
    /// Unrecognised provider name.
    #[error("unknown provider `{0}` (expected gemini or openai-compatible)")]
    UnknownProvider(String),
}

/// Static configuration handed to every generation call.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend selector.
    pub provider: Provider,
    /// Secret API key.
    #[serde(default)]
    pub api_key: String,
    /// Endpoint root, required for [`Provider::OpenaiCompatible`].
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model name; empty selects the provider default.
    #[serde(default)]
    pub model: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderConfig {
    /// Checks that the configuration is usable for generation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] or [`ConfigError::MissingBaseUrl`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(self.provider));
        }
        if self.provider == Provider::OpenaiCompatible
            && self.base_url.as_deref().is_none_or(|url| url.trim().is_empty())
        {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(())
    }

    /// The configured model, or the provider default when none is set.
    #[must_use]
    pub fn effective_model(&self) -> &str {
        let model = self.model.trim();
        if !model.is_empty() {
            return model;
        }
        match self.provider {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenaiCompatible => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Everything the CLI needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path of the YAML collection document.
    pub store_path: PathBuf,
    /// Generation backend configuration.
    pub provider: ProviderConfig,
}

impl Settings {
    /// Reads settings from `LINKBOARD_*` environment variables.
    ///
    /// Missing variables fall back to defaults; validation of the provider
    /// happens later, when a run actually needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if `LINKBOARD_PROVIDER` names an unknown provider.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider variable names an unknown provider.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = non_empty("LINKBOARD_PROVIDER")
            .map(|value| value.parse::<Provider>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            store_path: non_empty("LINKBOARD_STORE")
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from),
            provider: ProviderConfig {
                provider,
                api_key: non_empty("LINKBOARD_API_KEY").unwrap_or_default(),
                base_url: non_empty("LINKBOARD_BASE_URL")
                    .map(|url| url.trim().trim_end_matches('/').to_string()),
                model: non_empty("LINKBOARD_MODEL").unwrap_or_default(),
            },
        })
    }
}
