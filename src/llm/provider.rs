// ABOUTME: Unified generation provider selector for construction-time backend switching
// ABOUTME: Abstracts over Gemini, Groq, local, and disabled providers via configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Provider Selector
//!
//! A unified wrapper over the concrete generation backends, selected once at
//! construction time from configuration. The engine receives the constructed
//! provider by injection; there is no runtime provider switching and no
//! hidden global state.
//!
//! ## Configuration
//!
//! Set the `FOCUSPLAN_LLM_PROVIDER` environment variable:
//! - `groq` (default): Groq's `OpenAI`-compatible API (requires `GROQ_API_KEY`)
//! - `gemini`: Google Gemini (requires `GEMINI_API_KEY`)
//! - `local`/`ollama`/`vllm`: `OpenAI`-compatible local server
//! - `disabled`: every call fails, forcing the fallback path
//!
//! ## Example
//!
//! ```rust,no_run
//! use focusplan::llm::{ChatMessage, ChatRequest, ChatProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), focusplan::errors::AppError> {
//!     let provider = ChatProvider::from_env()?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

use super::{
    ChatRequest, ChatResponse, DisabledProvider, GeminiProvider, GroqProvider, LlmCapabilities,
    LlmProvider, OpenAiCompatibleProvider,
};
use crate::config::{EngineConfig, LlmProviderType};
use crate::errors::AppError;

/// Unified chat provider wrapping the configured backend
///
/// This enum provides a consistent interface regardless of which underlying
/// provider is configured.
pub enum ChatProvider {
    /// Google Gemini provider
    Gemini(GeminiProvider),
    /// Groq provider for fast, cost-effective inference
    Groq(GroqProvider),
    /// Local LLM provider via `OpenAI`-compatible API (Ollama, vLLM)
    Local(OpenAiCompatibleProvider),
    /// Explicitly disabled provider, fails every call
    Disabled(DisabledProvider),
}

impl ChatProvider {
    /// Create a provider from environment configuration
    ///
    /// Reads `FOCUSPLAN_LLM_PROVIDER` to determine which provider to use.
    ///
    /// # Errors
    ///
    /// Returns an error if the required API key environment variable is
    /// missing (for cloud providers).
    pub fn from_env() -> Result<Self, AppError> {
        let provider_type = LlmProviderType::from_env();

        info!(
            "Initializing LLM provider: {} (set {} to change)",
            provider_type,
            LlmProviderType::ENV_VAR
        );

        let provider = Self::create_provider(provider_type)?;
        debug!(
            "Provider {} initialized with model: {}",
            provider.display_name(),
            provider.default_model()
        );
        Ok(provider)
    }

    /// Create a provider from a materialized engine configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider cannot be constructed.
    pub fn from_config(config: &EngineConfig) -> Result<Self, AppError> {
        let provider = match config.provider {
            LlmProviderType::Gemini => {
                let mut p = GeminiProvider::from_env()?;
                if let Some(model) = &config.model {
                    p = p.with_default_model(model);
                }
                Self::Gemini(p)
            }
            LlmProviderType::Groq => {
                let mut p = GroqProvider::from_env()?;
                if let Some(model) = &config.model {
                    p = p.with_default_model(model);
                }
                Self::Groq(p)
            }
            LlmProviderType::Local => Self::Local(OpenAiCompatibleProvider::from_env()?),
            LlmProviderType::Disabled => Self::Disabled(DisabledProvider::new()),
        };
        Ok(provider)
    }

    /// Create a provider for a specific type
    fn create_provider(provider_type: LlmProviderType) -> Result<Self, AppError> {
        match provider_type {
            LlmProviderType::Groq => Self::groq(),
            LlmProviderType::Gemini => Self::gemini(),
            LlmProviderType::Local => Self::local(),
            LlmProviderType::Disabled => Ok(Self::Disabled(DisabledProvider::new())),
        }
    }

    /// Create a Gemini provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set.
    pub fn gemini() -> Result<Self, AppError> {
        Ok(Self::Gemini(GeminiProvider::from_env()?))
    }

    /// Create a Groq provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not set.
    pub fn groq() -> Result<Self, AppError> {
        Ok(Self::Groq(GroqProvider::from_env()?))
    }

    /// Create a local LLM provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn local() -> Result<Self, AppError> {
        Ok(Self::Local(OpenAiCompatibleProvider::from_env()?))
    }

    /// Create a Gemini provider with a specific API key
    #[must_use]
    pub fn gemini_with_key(api_key: &str) -> Self {
        Self::Gemini(GeminiProvider::new(api_key))
    }

    /// Create a Groq provider with a specific API key
    #[must_use]
    pub fn groq_with_key(api_key: String) -> Self {
        Self::Groq(GroqProvider::new(api_key))
    }

    /// Get the provider type
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::Gemini(_) => LlmProviderType::Gemini,
            Self::Groq(_) => LlmProviderType::Groq,
            Self::Local(_) => LlmProviderType::Local,
            Self::Disabled(_) => LlmProviderType::Disabled,
        }
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini(_) => f.debug_tuple("ChatProvider::Gemini").finish(),
            Self::Groq(_) => f.debug_tuple("ChatProvider::Groq").finish(),
            Self::Local(_) => f.debug_tuple("ChatProvider::Local").finish(),
            Self::Disabled(_) => f.debug_tuple("ChatProvider::Disabled").finish(),
        }
    }
}

// Delegate LlmProvider trait methods to the underlying provider
#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::Groq(p) => p.name(),
            Self::Local(p) => p.name(),
            Self::Disabled(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.display_name(),
            Self::Groq(p) => p.display_name(),
            Self::Local(p) => p.display_name(),
            Self::Disabled(p) => p.display_name(),
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        match self {
            Self::Gemini(p) => p.capabilities(),
            Self::Groq(p) => p.capabilities(),
            Self::Local(p) => p.capabilities(),
            Self::Disabled(p) => p.capabilities(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Gemini(p) => p.default_model(),
            Self::Groq(p) => p.default_model(),
            Self::Local(p) => p.default_model(),
            Self::Disabled(p) => p.default_model(),
        }
    }

    fn available_models(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini(p) => p.available_models(),
            Self::Groq(p) => p.available_models(),
            Self::Local(p) => p.available_models(),
            Self::Disabled(p) => p.available_models(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::Gemini(p) => p.complete(request).await,
            Self::Groq(p) => p.complete(request).await,
            Self::Local(p) => p.complete(request).await,
            Self::Disabled(p) => p.complete(request).await,
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::Gemini(p) => p.health_check().await,
            Self::Groq(p) => p.health_check().await,
            Self::Local(p) => p.health_check().await,
            Self::Disabled(p) => p.health_check().await,
        }
    }
}
