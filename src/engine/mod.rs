// ABOUTME: Plan generation engine - orchestrates difficulty, prompts, retries, assembly
// ABOUTME: The only module that composes the generation backend with the pure components
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Generation Engine
//!
//! Turns an assessment into a complete multi-week training plan. The engine
//! owns the orchestration only; every component it composes is independently
//! testable:
//!
//! - [`assessment`]: input record, defaulting and validation
//! - [`difficulty`]: pure ability-score and tier computation
//! - [`prompt`]: deterministic prompt construction
//! - [`repair`]: response repair and strict parsing
//! - [`plan`]: output data model and plan assembly
//! - [`fallback`]: deterministic no-backend week/plan generator
//! - [`analysis`]: single-call advisory analysis
//!
//! ## Pipeline
//!
//! Validate input, compute difficulty once, then for each week: build the
//! prompt, call the provider, repair and parse, retrying up to
//! [`MAX_GENERATION_ATTEMPTS`](crate::config::MAX_GENERATION_ATTEMPTS) times
//! with a fixed delay. Retry exhaustion on any week aborts the whole plan;
//! there is no silent per-week fallback substitution - a plan with one
//! deterministic week mixed among generated weeks would read inconsistently.
//! Callers that need guaranteed output invoke
//! [`fallback::generate_fallback_plan`] explicitly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use focusplan::engine::{AssessmentRecord, PlanEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), focusplan::errors::AppError> {
//!     let engine = PlanEngine::from_env()?;
//!     let assessment = AssessmentRecord::default();
//!     let plan = engine.generate_training_plan(&assessment, 4).await?;
//!     println!("{} days of training", plan.training_days);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod assessment;
pub mod difficulty;
pub mod fallback;
pub mod plan;
pub mod prompt;
pub mod repair;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::{EngineConfig, MAX_GENERATION_ATTEMPTS};
use crate::errors::{AppError, ErrorCode};
use crate::llm::{ChatMessage, ChatProvider, ChatRequest, LlmProvider};

pub use analysis::{suggested_duration_weeks, AssessmentAnalysis};
pub use assessment::{AssessmentRecord, ExperienceLevel, NormalizedLevels, PrimaryGoal};
pub use difficulty::{compute_difficulty, TierParams, WeekSpec};
pub use fallback::{generate_fallback_plan, generate_fallback_week};
pub use plan::{Challenge, ChallengeKind, DayType, Plan, TrainingDay, WeekResult};
pub use repair::{parse_week, ParseError};

/// Longest plan the engine will generate
pub const MAX_PLAN_WEEKS: u32 = 12;

/// Sampling temperature for week generation
const WEEK_TEMPERATURE: f32 = 0.7;

/// Token budget for one generated week
const WEEK_MAX_TOKENS: u32 = 4096;

/// Sampling temperature for the advisory analysis
const ANALYSIS_TEMPERATURE: f32 = 0.5;

/// Token budget for the advisory analysis
const ANALYSIS_MAX_TOKENS: u32 = 1024;

/// Plan generation engine with an injected generation backend
///
/// Construct once and share; the engine holds no per-request mutable state.
/// The provider is injected rather than globally resolved so tests can pass
/// a fake backend and exercise the retry logic directly.
pub struct PlanEngine {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
}

impl std::fmt::Debug for PlanEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanEngine")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl PlanEngine {
    /// Create an engine with an explicit provider and configuration
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Create an engine from environment configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured provider cannot be constructed,
    /// typically because its API key environment variable is missing.
    pub fn from_env() -> Result<Self, AppError> {
        let config = EngineConfig::from_env();
        let provider = ChatProvider::from_config(&config)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// The configured generation backend
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Generate a complete training plan
    ///
    /// Weeks are generated sequentially so ability-derived context stays
    /// consistent in logs. Each week gets up to
    /// [`MAX_GENERATION_ATTEMPTS`](crate::config::MAX_GENERATION_ATTEMPTS)
    /// attempts; exhaustion aborts the whole plan.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField`/`InvalidInput` for a bad assessment,
    /// `ValueOutOfRange` for a bad duration, `RetryExhausted` when a week
    /// fails all attempts, or the terminal error of a non-retryable failure.
    #[instrument(skip(self, assessment), fields(provider = self.provider.name()))]
    pub async fn generate_training_plan(
        &self,
        assessment: &AssessmentRecord,
        duration_weeks: u32,
    ) -> Result<Plan, AppError> {
        self.run_pipeline(assessment, duration_weeks, None).await
    }

    /// Generate a plan with caller-initiated cancellation
    ///
    /// Cancellation is honored between weeks, between attempts, during the
    /// inter-attempt delay, and while a generation call is in flight. A
    /// cancelled run never returns a partial plan.
    ///
    /// # Errors
    ///
    /// As [`Self::generate_training_plan`], plus `OperationCancelled` when
    /// the token fires before the plan completes.
    #[instrument(skip(self, assessment, cancel), fields(provider = self.provider.name()))]
    pub async fn generate_training_plan_with_cancel(
        &self,
        assessment: &AssessmentRecord,
        duration_weeks: u32,
        cancel: &CancellationToken,
    ) -> Result<Plan, AppError> {
        self.run_pipeline(assessment, duration_weeks, Some(cancel))
            .await
    }

    async fn run_pipeline(
        &self,
        assessment: &AssessmentRecord,
        duration_weeks: u32,
        cancel: Option<&CancellationToken>,
    ) -> Result<Plan, AppError> {
        assessment.validate()?;

        if duration_weeks == 0 || duration_weeks > MAX_PLAN_WEEKS {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!("duration must be 1-{MAX_PLAN_WEEKS} weeks, got {duration_weeks}"),
            ));
        }

        let (ability, tier) = compute_difficulty(assessment);
        info!(
            ability = format!("{ability:.2}"),
            tier = tier.tier,
            label = tier.label,
            duration_weeks,
            "starting plan generation"
        );

        let mut weeks = Vec::with_capacity(duration_weeks as usize);
        for week_number in 1..=duration_weeks {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(AppError::cancelled());
                }
            }
            let week = self
                .generate_week(assessment, ability, tier, week_number, cancel)
                .await?;
            weeks.push(week);
        }

        let plan = Plan::assemble(weeks)?;
        info!(plan_id = %plan.id, total_days = plan.total_days, "plan assembled");
        Ok(plan)
    }

    /// Generate one week, retrying on retryable failures
    #[instrument(skip(self, assessment, cancel), fields(week = week_number))]
    async fn generate_week(
        &self,
        assessment: &AssessmentRecord,
        ability: f64,
        tier: TierParams,
        week_number: u32,
        cancel: Option<&CancellationToken>,
    ) -> Result<WeekResult, AppError> {
        let spec = tier.for_week(week_number, ability);
        let user_prompt = prompt::build_week_prompt(assessment, ability, &tier, &spec);

        let mut request = ChatRequest::new(vec![
            ChatMessage::system(prompt::SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
        .with_temperature(WEEK_TEMPERATURE)
        .with_max_tokens(WEEK_MAX_TOKENS);

        if self.provider.capabilities().supports_json_mode() {
            request = request.with_structured_output();
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            match self.attempt_week(&request, week_number, cancel).await {
                Ok(mut week) => {
                    week.normalize_numbering(week_number);
                    debug!(attempt, "week generated");
                    return Ok(week);
                }
                Err(err) if err.code == ErrorCode::OperationCancelled => return Err(err),
                Err(err) if err.is_retryable() && attempt < MAX_GENERATION_ATTEMPTS => {
                    warn!(attempt, error = %err, "week generation attempt failed, retrying");
                    self.retry_delay(cancel).await?;
                }
                Err(err) if err.is_retryable() => {
                    warn!(attempt, error = %err, "week generation attempts exhausted");
                    return Err(AppError::retry_exhausted(
                        week_number,
                        MAX_GENERATION_ATTEMPTS,
                    ));
                }
                Err(err) => return Err(err),
            }
        }

        // The loop always returns; attempts >= 1 is a config invariant
        Err(AppError::retry_exhausted(
            week_number,
            MAX_GENERATION_ATTEMPTS,
        ))
    }

    /// One generation call plus repair and parse
    async fn attempt_week(
        &self,
        request: &ChatRequest,
        week_number: u32,
        cancel: Option<&CancellationToken>,
    ) -> Result<WeekResult, AppError> {
        let response = match cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => return Err(AppError::cancelled()),
                result = self.provider.complete(request) => result?,
            },
            None => self.provider.complete(request).await?,
        };

        parse_week(&response.content).map_err(|err| {
            AppError::parse(err.to_string())
                .with_week(week_number)
                .with_source(err)
        })
    }

    /// Wait the fixed inter-attempt delay, honoring cancellation
    async fn retry_delay(&self, cancel: Option<&CancellationToken>) -> Result<(), AppError> {
        let delay = self.config.retry_delay();
        match cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => Err(AppError::cancelled()),
                () = tokio::time::sleep(delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    /// Advisory analysis of an assessment
    ///
    /// One generation attempt, no retries. Any backend or parse failure
    /// falls back to the deterministic templated analysis, so a valid
    /// assessment always gets an answer.
    ///
    /// # Errors
    ///
    /// Returns an error only when the assessment itself fails validation.
    #[instrument(skip(self, assessment), fields(provider = self.provider.name()))]
    pub async fn analyze_assessment(
        &self,
        assessment: &AssessmentRecord,
    ) -> Result<AssessmentAnalysis, AppError> {
        assessment.validate()?;

        let (ability, tier) = compute_difficulty(assessment);
        let user_prompt = prompt::build_analysis_prompt(assessment, ability, &tier);

        let mut request = ChatRequest::new(vec![ChatMessage::user(user_prompt)])
            .with_temperature(ANALYSIS_TEMPERATURE)
            .with_max_tokens(ANALYSIS_MAX_TOKENS);
        if self.provider.capabilities().supports_json_mode() {
            request = request.with_structured_output();
        }

        match self.provider.complete(&request).await {
            Ok(response) => match analysis::parse_analysis_response(&response.content, assessment)
            {
                Ok(result) => Ok(result),
                Err(err) => {
                    warn!(error = %err, "analysis response unusable, using template");
                    Ok(analysis::templated_analysis(assessment))
                }
            },
            Err(err) => {
                warn!(error = %err, "analysis generation failed, using template");
                Ok(analysis::templated_analysis(assessment))
            }
        }
    }
}
