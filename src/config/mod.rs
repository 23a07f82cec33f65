// ABOUTME: Configuration management for the plan engine, read once at process start
// ABOUTME: Provides EngineConfig assembled from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Configuration Management
//!
//! Environment-driven configuration, read once at startup and treated as
//! read-only for the process lifetime. Provider credentials (`GEMINI_API_KEY`,
//! `GROQ_API_KEY`, `LOCAL_LLM_BASE_URL`, ...) are read by the individual
//! providers; this module covers engine-level settings.

mod types;

pub use types::{LlmProviderType, LogLevel};

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Total attempts per week before the pipeline gives up
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Default delay between generation attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Engine-level configuration, materialized once from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which generation backend to use
    pub provider: LlmProviderType,
    /// Model override, None uses the provider default
    pub model: Option<String>,
    /// Delay between generation attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Log level for subscriber initialization
    pub log_level: LogLevel,
}

impl EngineConfig {
    /// Environment variable for the retry delay override
    pub const RETRY_DELAY_ENV_VAR: &'static str = "FOCUSPLAN_RETRY_DELAY_MS";

    /// Environment variable for log level
    pub const LOG_LEVEL_ENV_VAR: &'static str = "FOCUSPLAN_LOG_LEVEL";

    /// Load configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            provider: LlmProviderType::from_env(),
            model: LlmProviderType::model_from_env(),
            retry_delay_ms: env::var(Self::RETRY_DELAY_ENV_VAR)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            log_level: env::var(Self::LOG_LEVEL_ENV_VAR)
                .map(|s| LogLevel::from_str_or_default(&s))
                .unwrap_or_default(),
        }
    }

    /// Delay between generation attempts
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            model: None,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            log_level: LogLevel::default(),
        }
    }
}
