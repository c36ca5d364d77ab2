//! LLM — hosted model adapter for the article chat.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables. `LlmClient` owns the
//! Gemini HTTP client plus the model name and generation options, so the
//! chat service only passes the system prompt and history per call.

pub mod config;
pub mod gemini;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, GenerationOptions, LlmError, Message};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client backed by the Gemini API.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: gemini::GeminiClient,
    model: String,
    options: GenerationOptions,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a value is malformed,
    /// or the HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model, options: config.options })
    }

    /// Return the configured model name (e.g. `"gemini-3-flash-preview"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generation options applied when the caller does not override them.
    #[must_use]
    pub fn options(&self) -> GenerationOptions {
        self.options
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn generate(
        &self,
        system: &str,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChatResponse, LlmError> {
        self.inner
            .generate(&self.model, system, messages, options)
            .await
    }
}
