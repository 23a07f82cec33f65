// ABOUTME: Integration tests for environment-driven configuration
// ABOUTME: Serialized because they mutate process-wide environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;

use focusplan::config::{
    EngineConfig, LlmProviderType, LogLevel, DEFAULT_RETRY_DELAY_MS,
};
use focusplan::llm::{ChatProvider, LlmProvider};

fn clear_env() {
    std::env::remove_var(LlmProviderType::ENV_VAR);
    std::env::remove_var(LlmProviderType::MODEL_ENV_VAR);
    std::env::remove_var(EngineConfig::RETRY_DELAY_ENV_VAR);
    std::env::remove_var(EngineConfig::LOG_LEVEL_ENV_VAR);
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
#[serial]
fn test_defaults_with_clean_environment() {
    clear_env();
    let config = EngineConfig::from_env();
    assert_eq!(config.provider, LlmProviderType::Groq);
    assert_eq!(config.model, None);
    assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
    assert_eq!(config.log_level, LogLevel::Info);
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
#[serial]
fn test_provider_and_model_from_env() {
    clear_env();
    std::env::set_var(LlmProviderType::ENV_VAR, "disabled");
    std::env::set_var(LlmProviderType::MODEL_ENV_VAR, "some-model");

    let config = EngineConfig::from_env();
    assert_eq!(config.provider, LlmProviderType::Disabled);
    assert_eq!(config.model.as_deref(), Some("some-model"));
    clear_env();
}

#[test]
#[serial]
fn test_retry_delay_override() {
    clear_env();
    std::env::set_var(EngineConfig::RETRY_DELAY_ENV_VAR, "250");
    let config = EngineConfig::from_env();
    assert_eq!(config.retry_delay().as_millis(), 250);

    // Unparseable values fall back to the default
    std::env::set_var(EngineConfig::RETRY_DELAY_ENV_VAR, "soon");
    let config = EngineConfig::from_env();
    assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
    clear_env();
}

#[test]
#[serial]
fn test_log_level_override() {
    clear_env();
    std::env::set_var(EngineConfig::LOG_LEVEL_ENV_VAR, "debug");
    let config = EngineConfig::from_env();
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_tracing_level(), tracing::Level::DEBUG);
    clear_env();
}

#[test]
#[serial]
fn test_empty_model_treated_as_unset() {
    clear_env();
    std::env::set_var(LlmProviderType::MODEL_ENV_VAR, "");
    let config = EngineConfig::from_env();
    assert_eq!(config.model, None);
    clear_env();
}

// ============================================================================
// Provider construction from configuration
// ============================================================================

#[test]
#[serial]
fn test_disabled_provider_constructs_without_credentials() {
    clear_env();
    std::env::set_var(LlmProviderType::ENV_VAR, "disabled");
    let provider = ChatProvider::from_env().unwrap();
    assert_eq!(provider.provider_type(), LlmProviderType::Disabled);
    assert_eq!(provider.name(), "disabled");
    clear_env();
}

#[test]
#[serial]
fn test_cloud_provider_requires_api_key() {
    clear_env();
    std::env::remove_var("GEMINI_API_KEY");
    std::env::set_var(LlmProviderType::ENV_VAR, "gemini");
    assert!(ChatProvider::from_env().is_err());
    clear_env();
}
