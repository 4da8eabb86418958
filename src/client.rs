//! Model handle factory.
//!
//! Configuration types and constructors for callable model handles bound to
//! an API key. Handles hold a configured HTTP client; sending requests is the
//! caller's concern.

use crate::error::ModelError;
use crate::models::{self, is_gateway_model};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted when no API key is passed explicitly.
const API_KEY_ENV: &str = "OPENAI_KEY";

/// Configuration for constructing model handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The API key for authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Whether to request provider-enforced structured outputs
    pub structured_outputs: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            structured_outputs: true,
        }
    }
}

impl ProviderConfig {
    /// Creates a new provider configuration with the given API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use prompt_fit::client::ProviderConfig;
    ///
    /// let config = ProviderConfig::new("sk-...");
    /// assert!(!config.api_key.is_empty());
    /// ```
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration with the API key taken from the `OPENAI_KEY`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn from_env() -> Result<Self, ModelError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(ModelError::missing_api_key()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the base URL for the API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables structured outputs.
    #[must_use]
    pub fn without_structured_outputs(mut self) -> Self {
        self.structured_outputs = false;
        self
    }

    /// Returns the full API endpoint URL for chat completions.
    #[must_use]
    pub fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// A callable model handle bound to an API key.
///
/// Wraps a configured [`reqwest::Client`] together with the model identifier
/// and provider settings. The handle performs no I/O itself.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    /// HTTP client with the configured timeout
    client: Client,
    /// The model identifier
    model: String,
    /// Provider settings used to build this handle
    config: ProviderConfig,
}

impl ModelHandle {
    /// Returns the model identifier this handle is bound to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the HTTP client.
    #[must_use]
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Returns the chat completions endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.config.completions_endpoint()
    }

    /// Returns true if structured outputs are requested for this handle.
    #[must_use]
    pub fn structured_outputs(&self) -> bool {
        self.config.structured_outputs
    }
}

/// How a model identifier should be used by the caller.
#[derive(Debug, Clone)]
pub enum ModelRoute {
    /// A gateway identifier; pass it through as-is, the gateway routes it
    Gateway(String),
    /// A directly constructed handle
    Direct(ModelHandle),
}

/// Creates a model handle for the given identifier.
///
/// The identifier must be registered and the configuration must carry an
/// API key.
///
/// # Errors
///
/// Returns an error if the model is unknown, the API key is missing, or the
/// HTTP client cannot be constructed.
pub fn create_model(model_id: &str, config: &ProviderConfig) -> Result<ModelHandle, ModelError> {
    if !models::is_supported_model(model_id) {
        return Err(ModelError::unknown_model(model_id));
    }

    if config.api_key.is_empty() {
        return Err(ModelError::missing_api_key());
    }

    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| ModelError::http_client_failed(e.to_string()))?;

    tracing::debug!(model = %model_id, "model handle created");

    Ok(ModelHandle {
        client,
        model: model_id.to_string(),
        config: config.clone(),
    })
}

/// Resolves a model identifier to its usage route.
///
/// Gateway identifiers (`provider/model-name`) are returned as-is; the
/// gateway handles routing. Everything else gets a direct handle via
/// [`create_model`].
///
/// # Errors
///
/// Returns an error if a direct handle is needed but cannot be created.
pub fn model_for_usage(model_id: &str, config: &ProviderConfig) -> Result<ModelRoute, ModelError> {
    if is_gateway_model(model_id) {
        return Ok(ModelRoute::Gateway(model_id.to_string()));
    }

    create_model(model_id, config).map(ModelRoute::Direct)
}
