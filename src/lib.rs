// ABOUTME: Library entry point for the focusplan training-plan generation engine
// ABOUTME: Exposes the engine, generation providers, configuration, and error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Focusplan
//!
//! An AI-assisted training-plan engine for Pomodoro-style focus training.
//! From a short self-assessment it derives a difficulty tier and generates a
//! multi-week plan of daily challenges, using an interchangeable
//! text-generation backend with a deterministic fallback.
//!
//! ## Features
//!
//! - **Difficulty model**: pure, deterministic ability scoring and tier
//!   selection with exact, testable boundaries
//! - **Provider polymorphism**: Gemini, Groq, and `OpenAI`-compatible local
//!   backends behind one trait, selected at construction time
//! - **Response repair**: heuristic normalization of near-JSON backend
//!   output with a strict validation gate
//! - **Bounded retries**: three attempts per week with a fixed delay, then
//!   the whole plan fails rather than silently degrading
//! - **Deterministic fallback**: a complete no-backend plan generator with
//!   the same shape guarantees
//!
//! ## Example
//!
//! ```rust,no_run
//! use focusplan::engine::{AssessmentRecord, PlanEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), focusplan::errors::AppError> {
//!     focusplan::logging::init_from_env().ok();
//!
//!     let engine = PlanEngine::from_env()?;
//!     let assessment = AssessmentRecord::default();
//!     let plan = engine.generate_training_plan(&assessment, 4).await?;
//!
//!     println!("plan {} with {} training days", plan.id, plan.training_days);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod llm;
pub mod logging;
