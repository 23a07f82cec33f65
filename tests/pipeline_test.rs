// ABOUTME: Integration tests for the generation pipeline - retries, cancellation, analysis
// ABOUTME: Uses a scripted in-process provider so no network is involved
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline Orchestration Tests
//!
//! The engine takes its provider by injection, so these tests drive the
//! retry loop, exhaustion policy, cancellation, and analysis fallback with
//! a scripted provider that fails on demand and counts its calls.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use focusplan::config::{EngineConfig, MAX_GENERATION_ATTEMPTS};
use focusplan::engine::{
    generate_fallback_plan, generate_fallback_week, AssessmentRecord, PlanEngine,
};
use focusplan::errors::{AppError, ErrorCode};
use focusplan::llm::{
    ChatRequest, ChatResponse, DisabledProvider, LlmCapabilities, LlmProvider,
};

// ============================================================================
// Scripted provider
// ============================================================================

/// Provider that fails a fixed number of times, then returns a fixed payload
struct ScriptedProvider {
    calls: AtomicU32,
    failures_before_success: u32,
    payload: String,
}

impl ScriptedProvider {
    fn new(failures_before_success: u32, payload: impl Into<String>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures_before_success,
            payload: payload.into(),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::full_featured()
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["scripted-model"]
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(AppError::external_service("scripted", "induced failure"));
        }
        Ok(ChatResponse {
            content: self.payload.clone(),
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        retry_delay_ms: 0,
        ..EngineConfig::default()
    }
}

fn week_payload() -> String {
    let week = generate_fallback_week(&AssessmentRecord::default(), 1);
    serde_json::to_string(&week).unwrap()
}

fn engine_with(provider: Arc<ScriptedProvider>) -> PlanEngine {
    PlanEngine::new(provider, fast_config())
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_multi_week_plan_one_call_per_week() {
    let provider = Arc::new(ScriptedProvider::new(0, week_payload()));
    let engine = engine_with(provider.clone());

    let plan = engine
        .generate_training_plan(&AssessmentRecord::default(), 3)
        .await
        .unwrap();

    assert_eq!(provider.calls(), 3);
    assert_eq!(plan.total_weeks, 3);
    assert_eq!(plan.total_days, 21);
    // Weeks renumbered by position even though the payload always says week 1
    let numbers: Vec<u32> = plan.weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(plan.weeks[2].days[0].day_number, 15);
}

// ============================================================================
// Retry budget
// ============================================================================

#[tokio::test]
async fn test_two_failures_then_success_uses_three_calls() {
    let provider = Arc::new(ScriptedProvider::new(2, week_payload()));
    let engine = engine_with(provider.clone());

    let plan = engine
        .generate_training_plan(&AssessmentRecord::default(), 1)
        .await
        .unwrap();

    assert_eq!(provider.calls(), MAX_GENERATION_ATTEMPTS);
    assert_eq!(plan.total_weeks, 1);
}

#[tokio::test]
async fn test_persistent_transport_failure_exhausts_retries() {
    let provider = Arc::new(ScriptedProvider::new(u32::MAX, week_payload()));
    let engine = engine_with(provider.clone());

    let err = engine
        .generate_training_plan(&AssessmentRecord::default(), 2)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RetryExhausted);
    assert_eq!(err.context.week_number, Some(1));
    // Week 1 burned the whole budget; week 2 was never attempted
    assert_eq!(provider.calls(), MAX_GENERATION_ATTEMPTS);
}

#[tokio::test]
async fn test_unparseable_output_is_retried_then_exhausted() {
    let provider = Arc::new(ScriptedProvider::new(0, "not json at all"));
    let engine = engine_with(provider.clone());

    let err = engine
        .generate_training_plan(&AssessmentRecord::default(), 1)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RetryExhausted);
    assert_eq!(provider.calls(), MAX_GENERATION_ATTEMPTS);
}

#[tokio::test]
async fn test_shape_violation_is_retried() {
    // Parses as JSON but fails the 7-day gate
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days.truncate(6);
    let payload = serde_json::to_string(&week).unwrap();

    let provider = Arc::new(ScriptedProvider::new(0, payload));
    let engine = engine_with(provider.clone());

    let err = engine
        .generate_training_plan(&AssessmentRecord::default(), 1)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RetryExhausted);
    assert_eq!(provider.calls(), MAX_GENERATION_ATTEMPTS);
}

// ============================================================================
// Input validation happens before any call
// ============================================================================

#[tokio::test]
async fn test_missing_focus_rejected_without_calls() {
    let provider = Arc::new(ScriptedProvider::new(0, week_payload()));
    let engine = engine_with(provider.clone());

    let record = AssessmentRecord {
        focus_level: None,
        ..AssessmentRecord::default()
    };
    let err = engine.generate_training_plan(&record, 4).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_bad_duration_rejected_without_calls() {
    let provider = Arc::new(ScriptedProvider::new(0, week_payload()));
    let engine = engine_with(provider.clone());

    for weeks in [0, 13, 400] {
        let err = engine
            .generate_training_plan(&AssessmentRecord::default(), weeks)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
    assert_eq!(provider.calls(), 0);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_pre_cancelled_token_stops_before_any_call() {
    let provider = Arc::new(ScriptedProvider::new(0, week_payload()));
    let engine = engine_with(provider.clone());

    let token = CancellationToken::new();
    token.cancel();

    let err = engine
        .generate_training_plan_with_cancel(&AssessmentRecord::default(), 2, &token)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::OperationCancelled);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_cancellation_during_retry_delay() {
    let provider = Arc::new(ScriptedProvider::new(u32::MAX, week_payload()));
    let config = EngineConfig {
        retry_delay_ms: 60_000,
        ..EngineConfig::default()
    };
    let engine = PlanEngine::new(provider, config);

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = engine
        .generate_training_plan_with_cancel(&AssessmentRecord::default(), 1, &token)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::OperationCancelled);
    // Cancellation interrupted the 60s delay rather than waiting it out
    assert!(started.elapsed() < Duration::from_secs(10));
}

// ============================================================================
// Explicit fallback composition
// ============================================================================

#[tokio::test]
async fn test_disabled_provider_fails_and_fallback_succeeds() {
    let engine = PlanEngine::new(Arc::new(DisabledProvider::new()), fast_config());
    let record = AssessmentRecord::default();

    let err = engine.generate_training_plan(&record, 2).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RetryExhausted);

    // Exhaustion does not invoke the fallback; the caller composes it explicitly
    let plan = generate_fallback_plan(&record, 2).unwrap();
    assert_eq!(plan.total_weeks, 2);
}

// ============================================================================
// Advisory analysis
// ============================================================================

#[tokio::test]
async fn test_analysis_uses_backend_output_when_parseable() {
    let payload =
        r#"{"analysis": "Your focus base is solid.", "recommendations": ["Protect your mornings."]}"#;
    let provider = Arc::new(ScriptedProvider::new(0, payload));
    let engine = engine_with(provider);

    let analysis = engine
        .analyze_assessment(&AssessmentRecord::default())
        .await
        .unwrap();

    assert_eq!(analysis.analysis, "Your focus base is solid.");
    assert_eq!(analysis.suggested_duration_weeks, 4);
}

#[tokio::test]
async fn test_analysis_falls_back_on_backend_failure() {
    let provider = Arc::new(ScriptedProvider::new(u32::MAX, String::new()));
    let engine = engine_with(provider.clone());

    let analysis = engine
        .analyze_assessment(&AssessmentRecord::default())
        .await
        .unwrap();

    // One attempt, no retries, templated result
    assert_eq!(provider.calls(), 1);
    assert!(!analysis.analysis.is_empty());
    assert!(analysis.recommendations.len() >= 3);
}

#[tokio::test]
async fn test_analysis_falls_back_on_unparseable_output() {
    let provider = Arc::new(ScriptedProvider::new(0, "sorry, no JSON today"));
    let engine = engine_with(provider);

    let analysis = engine
        .analyze_assessment(&AssessmentRecord::default())
        .await
        .unwrap();

    assert!(!analysis.recommendations.is_empty());
    assert!(!analysis.suggested_tier_label.is_empty());
}

#[tokio::test]
async fn test_analysis_still_validates_input() {
    let provider = Arc::new(ScriptedProvider::new(0, week_payload()));
    let engine = engine_with(provider.clone());

    let record = AssessmentRecord {
        focus_level: None,
        ..AssessmentRecord::default()
    };
    let err = engine.analyze_assessment(&record).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(provider.calls(), 0);
}
