// ABOUTME: Unified error handling system with standard error codes for the plan engine
// ABOUTME: Maps the generation pipeline failure taxonomy onto codes and HTTP responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Centralized error handling for the focusplan engine. Defines standard
//! error types, error codes, and HTTP response formatting so the calling
//! layer (REST handlers, CLI) can translate engine failures consistently.
//!
//! The pipeline failure taxonomy maps onto codes as follows:
//!
//! - Input validation: [`ErrorCode::InvalidInput`], [`ErrorCode::MissingRequiredField`],
//!   [`ErrorCode::ValueOutOfRange`] - rejected before any generation attempt, never retried.
//! - Transport: [`ErrorCode::ExternalServiceError`], [`ErrorCode::ExternalAuthFailed`],
//!   [`ErrorCode::ExternalRateLimited`], [`ErrorCode::ExternalServiceUnavailable`] - retryable.
//! - Parsing: [`ErrorCode::ResponseParseFailed`] - retryable (a fresh generation
//!   attempt may produce parseable output).
//! - Terminal: [`ErrorCode::RetryExhausted`] (budget spent for one week, aborts the
//!   whole plan), [`ErrorCode::InvalidPlan`] (assembler invariant violation,
//!   a programming-error signal), [`ErrorCode::OperationCancelled`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required assessment field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// A value is outside the acceptable range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // External generation backend (5000-5999)
    /// The generation backend returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The generation backend is unavailable (includes explicitly disabled providers)
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Authentication with the generation backend failed
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The generation backend rate-limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Plan generation pipeline (7000-7999)
    /// Model output could not be repaired into a valid week structure
    #[serde(rename = "RESPONSE_PARSE_FAILED")]
    ResponseParseFailed = 7000,
    /// All generation attempts for one week failed
    #[serde(rename = "RETRY_EXHAUSTED")]
    RetryExhausted = 7001,
    /// Plan assembler invariant violation
    #[serde(rename = "INVALID_PLAN")]
    InvalidPlan = 7002,
    /// The operation was cancelled by the caller
    #[serde(rename = "OPERATION_CANCELLED")]
    OperationCancelled = 7003,

    // Internal (9000-9999)
    /// An internal error occurred
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::ExternalRateLimited => 429,
            Self::OperationCancelled => 499,
            Self::ExternalServiceError | Self::ResponseParseFailed => 502,
            Self::ExternalServiceUnavailable | Self::ExternalAuthFailed | Self::RetryExhausted => {
                503
            }
            Self::ConfigError | Self::InvalidPlan | Self::InternalError => 500,
        }
    }

    /// Whether the generation-with-retry loop may retry after this error
    ///
    /// Transport and parse failures are transient from the pipeline's point of
    /// view. Validation failures, assembler violations, and cancellation are
    /// terminal and surface to the caller immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError
                | Self::ExternalServiceUnavailable
                | Self::ExternalAuthFailed
                | Self::ExternalRateLimited
                | Self::ResponseParseFailed
        )
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the assessment",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ExternalServiceError => "The generation backend encountered an error",
            Self::ExternalServiceUnavailable => "The generation backend is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the generation backend failed",
            Self::ExternalRateLimited => "Generation backend rate limit exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::ResponseParseFailed => "Generated output could not be parsed into a valid week",
            Self::RetryExhausted => "All generation attempts failed",
            Self::InvalidPlan => "Plan assembly invariant violated",
            Self::OperationCancelled => "The operation was cancelled",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Week number the error relates to, if applicable
    pub week_number: Option<u32>,
    /// Attempt number when the error occurred
    pub attempt: Option<u32>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            week_number: None,
            attempt: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the week number the error occurred in
    #[must_use]
    pub const fn with_week(mut self, week_number: u32) -> Self {
        self.context.week_number = Some(week_number);
        self
    }

    /// Attach the attempt number the error occurred on
    #[must_use]
    pub const fn with_attempt(mut self, attempt: u32) -> Self {
        self.context.attempt = Some(attempt);
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether the retry loop may retry after this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload details for HTTP responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Week number if the failure is week-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u32>,
    /// Additional details
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                week_number: error.context.week_number,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required assessment field missing
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("missing required field: {}", field.into()),
        )
    }

    /// External generation backend error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Generation backend authentication failure
    pub fn external_auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Model output could not be parsed
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResponseParseFailed, message)
    }

    /// Retry budget spent for one week
    pub fn retry_exhausted(week_number: u32, attempts: u32) -> Self {
        Self::new(
            ErrorCode::RetryExhausted,
            format!("week {week_number} generation failed after {attempts} attempts"),
        )
        .with_week(week_number)
        .with_attempt(attempts)
    }

    /// Plan assembler invariant violation
    pub fn invalid_plan(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPlan, message)
    }

    /// The caller cancelled the operation
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(
            ErrorCode::OperationCancelled,
            "plan generation cancelled by caller",
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Conversion from `anyhow::Error` to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::ExternalRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::RetryExhausted.http_status(), 503);
        assert_eq!(ErrorCode::InvalidPlan.http_status(), 500);
    }

    #[test]
    fn test_retry_policy() {
        assert!(ErrorCode::ExternalServiceError.is_retryable());
        assert!(ErrorCode::ResponseParseFailed.is_retryable());
        assert!(!ErrorCode::MissingRequiredField.is_retryable());
        assert!(!ErrorCode::RetryExhausted.is_retryable());
        assert!(!ErrorCode::InvalidPlan.is_retryable());
        assert!(!ErrorCode::OperationCancelled.is_retryable());
    }

    #[test]
    fn test_app_error_context() {
        let error = AppError::retry_exhausted(3, 3);
        assert_eq!(error.code, ErrorCode::RetryExhausted);
        assert_eq!(error.context.week_number, Some(3));
        assert_eq!(error.context.attempt, Some(3));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::parse("unbalanced braces").with_week(2);
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("RESPONSE_PARSE_FAILED"));
        assert!(json.contains("week_number"));
    }
}
