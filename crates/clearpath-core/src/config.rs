//! Runtime configuration assembled from environment variables.
//!
//! Every value has a default except the Gemini API key, which is only
//! required once a generator is actually built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClearPathError, Result};

pub const DEFAULT_REGISTRY_URL: &str = "https://api.nhtsa.gov/recalls/recallsByVehicle";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_VERDICT_TOKEN: &str = "VERDICT";

const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 15;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Recall registry endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Full URL of the recall-lookup endpoint (query string is appended)
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            endpoint: DEFAULT_REGISTRY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REGISTRY_TIMEOUT_SECS),
        }
    }
}

impl RegistryConfig {
    pub fn new(endpoint: &str) -> Self {
        RegistryConfig {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini text-generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL, without the `/v1beta/...` path
    pub base_url: String,
    /// Model name, e.g. `gemini-1.5-flash`
    pub model: String,
    /// API key (never serialized)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    pub fn new(base_url: &str, model: &str) -> Self {
        GeminiConfig {
            base_url: base_url.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, or a `Config` error when none was supplied.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClearPathError::Config("GEMINI_API_KEY is not set".to_string()))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearPathConfig {
    pub registry: RegistryConfig,
    pub gemini: GeminiConfig,
    /// Classification token the prompt requests and the parser matches
    pub verdict_token: Option<String>,
}

impl ClearPathConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClearPathConfig::default();

        if let Some(url) = lookup("CLEARPATH_REGISTRY_URL") {
            config.registry.endpoint = url;
        }
        if let Some(secs) = lookup("CLEARPATH_REGISTRY_TIMEOUT") {
            config.registry.timeout = parse_timeout("CLEARPATH_REGISTRY_TIMEOUT", &secs)?;
        }
        if let Some(url) = lookup("CLEARPATH_GEMINI_URL") {
            config.gemini.base_url = url;
        }
        if let Some(model) = lookup("CLEARPATH_MODEL") {
            config.gemini.model = model;
        }
        if let Some(secs) = lookup("CLEARPATH_GENERATION_TIMEOUT") {
            config.gemini.timeout = parse_timeout("CLEARPATH_GENERATION_TIMEOUT", &secs)?;
        }
        config.gemini.api_key = lookup("GEMINI_API_KEY");
        config.verdict_token = lookup("CLEARPATH_VERDICT_TOKEN");

        Ok(config)
    }

    /// Effective verdict token, falling back to `VERDICT`.
    pub fn verdict_token(&self) -> &str {
        self.verdict_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or(DEFAULT_VERDICT_TOKEN)
    }
}

fn parse_timeout(var: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            ClearPathError::Config(format!("{var} must be a positive number of seconds, got {raw:?}"))
        })
}
