// ABOUTME: Always-failing provider for configurations with generation turned off
// ABOUTME: Forces callers onto the deterministic fallback plan path
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Disabled Provider
//!
//! A provider variant that fails every call immediately. Selected with
//! `FOCUSPLAN_LLM_PROVIDER=disabled`, it lets deployments run without any
//! generation backend (the caller catches the failure and invokes the
//! fallback generator) and gives tests a deterministic way to exercise the
//! degraded path.

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::errors::{AppError, ErrorCode};

/// Provider that rejects every generation call
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

impl DisabledProvider {
    /// Create a new disabled provider
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn unavailable() -> AppError {
        AppError::new(
            ErrorCode::ExternalServiceUnavailable,
            "generation backend is disabled by configuration",
        )
    }
}

#[async_trait]
impl LlmProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn display_name(&self) -> &'static str {
        "Disabled"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::empty()
    }

    fn default_model(&self) -> &str {
        "none"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &[]
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        Err(Self::unavailable())
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(false)
    }
}
