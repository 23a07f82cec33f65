// ABOUTME: Assessment record types with default-filling, clamping, and validation
// ABOUTME: The single structured input every engine operation consumes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assessment Record
//!
//! The flat self-reported record a user submits before plan generation.
//! Numeric levels are 1-10; optional levels have fixed defaults and all
//! values clamp into range rather than being rejected. Only a missing focus
//! level is a hard validation failure.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::AppError;

/// Default distraction level when not reported
pub const DEFAULT_DISTRACTION_LEVEL: f64 = 5.0;

/// Default motivation level when not reported
pub const DEFAULT_MOTIVATION_LEVEL: f64 = 7.0;

/// Default energy level when not reported
pub const DEFAULT_ENERGY_LEVEL: f64 = 7.0;

/// Default stress level when not reported
pub const DEFAULT_STRESS_LEVEL: f64 = 5.0;

/// What the user primarily wants out of focus training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    /// Deep work for professional tasks
    Work,
    /// Study sessions and exam preparation
    Study,
    /// Creative projects (writing, design, music)
    Creative,
    /// Managing attention-deficit tendencies
    AdhdManagement,
    /// General concentration improvement (default)
    #[default]
    General,
}

impl Display for PrimaryGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Work => write!(f, "deep work"),
            Self::Study => write!(f, "study"),
            Self::Creative => write!(f, "creative projects"),
            Self::AdhdManagement => write!(f, "attention management"),
            Self::General => write!(f, "general concentration"),
        }
    }
}

/// Self-reported experience with structured focus practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to timed focus sessions (default)
    #[default]
    Beginner,
    /// Has used Pomodoro-style timers before
    Intermediate,
    /// Regular practitioner looking to push further
    Advanced,
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Flat assessment record submitted by the user
///
/// Immutable once submitted; the engine never mutates the caller's record.
/// All level fields are 1-10 after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    /// Current ability to sustain focus (1-10, required)
    pub focus_level: Option<f64>,
    /// How easily the user is distracted (1-10, defaults to 5)
    #[serde(default)]
    pub distraction_level: Option<f64>,
    /// Current motivation (1-10, defaults to 7)
    #[serde(default)]
    pub motivation_level: Option<f64>,
    /// Typical daily energy (1-10, defaults to 7)
    #[serde(default)]
    pub energy_level: Option<f64>,
    /// Current stress (1-10, defaults to 5)
    #[serde(default)]
    pub stress_level: Option<f64>,
    /// Primary training goal
    #[serde(default)]
    pub primary_goal: PrimaryGoal,
    /// Minutes per day the user can commit
    #[serde(default = "default_available_minutes")]
    pub available_minutes_per_day: u32,
    /// Preferred focus session length in minutes
    #[serde(default = "default_session_minutes")]
    pub preferred_session_minutes: u32,
    /// Experience with structured focus practice
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Distraction categories the user struggles with (e.g. "social_media")
    #[serde(default)]
    pub distraction_tags: Vec<String>,
}

const fn default_available_minutes() -> u32 {
    60
}

const fn default_session_minutes() -> u32 {
    25
}

/// Assessment levels after default-filling and clamping
///
/// Derived, never persisted. Every generation call recomputes this from the
/// raw record so a stored assessment can never go stale against the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLevels {
    /// Focus level, clamped to 1-10
    pub focus: f64,
    /// Distraction level, clamped to 1-10
    pub distraction: f64,
    /// Motivation level, clamped to 1-10
    pub motivation: f64,
    /// Energy level, clamped to 1-10
    pub energy: f64,
    /// Stress level, clamped to 1-10
    pub stress: f64,
}

/// Clamp a level into the 1-10 band
fn clamp_level(value: f64) -> f64 {
    value.clamp(1.0, 10.0)
}

impl AssessmentRecord {
    /// Validate the record before any generation attempt
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` if the focus level is absent, or
    /// `InvalidInput` if it is not a finite number. Out-of-range values are
    /// not errors; they clamp during normalization.
    pub fn validate(&self) -> Result<(), AppError> {
        let focus = self
            .focus_level
            .ok_or_else(|| AppError::missing_field("focusLevel"))?;

        if !focus.is_finite() {
            return Err(AppError::invalid_input("focusLevel must be a finite number"));
        }

        Ok(())
    }

    /// Default-fill and clamp the five numeric levels
    ///
    /// Missing optional levels take their documented defaults; every value
    /// clamps into 1-10. Requires a validated record (missing focus falls
    /// back to the minimum rather than panicking).
    #[must_use]
    pub fn normalized_levels(&self) -> NormalizedLevels {
        NormalizedLevels {
            focus: clamp_level(self.focus_level.unwrap_or(1.0)),
            distraction: clamp_level(self.distraction_level.unwrap_or(DEFAULT_DISTRACTION_LEVEL)),
            motivation: clamp_level(self.motivation_level.unwrap_or(DEFAULT_MOTIVATION_LEVEL)),
            energy: clamp_level(self.energy_level.unwrap_or(DEFAULT_ENERGY_LEVEL)),
            stress: clamp_level(self.stress_level.unwrap_or(DEFAULT_STRESS_LEVEL)),
        }
    }
}

impl Default for AssessmentRecord {
    fn default() -> Self {
        Self {
            focus_level: Some(5.0),
            distraction_level: None,
            motivation_level: None,
            energy_level: None,
            stress_level: None,
            primary_goal: PrimaryGoal::default(),
            available_minutes_per_day: default_available_minutes(),
            preferred_session_minutes: default_session_minutes(),
            experience_level: ExperienceLevel::default(),
            distraction_tags: Vec::new(),
        }
    }
}
