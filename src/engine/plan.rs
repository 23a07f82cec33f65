// ABOUTME: Plan data model - challenges, training days, week results, assembled plans
// ABOUTME: Carries the shape invariants and the week-to-plan aggregation step
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Data Model
//!
//! Structured output types shared by the generation pipeline and the
//! fallback generator. Wire names are camelCase to match the format the
//! generation backend is instructed to emit, so a compliant response
//! deserializes directly into [`WeekResult`].
//!
//! Shape invariants (every producer must satisfy them, the parser enforces
//! them on generated content):
//!
//! - a week has exactly 7 days; days 1-6 are training, day 7 is rest
//! - every training day has exactly 3 challenges, a rest day has none
//! - challenge duration is a positive number of minutes
//! - challenge difficulty is 1-10

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Days in a week
pub const DAYS_PER_WEEK: usize = 7;

/// Training days per week (the 7th day is rest)
pub const TRAINING_DAYS_PER_WEEK: usize = 6;

/// Challenges on every training day
pub const CHALLENGES_PER_TRAINING_DAY: usize = 3;

/// Kind of atomic timed activity within a training day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Timed Pomodoro-style focus session
    FocusSession,
    /// Breathing exercise
    Breathing,
    /// Mindfulness practice
    Mindfulness,
    /// Written reflection
    Reflection,
    /// Physical stretching break
    Stretching,
}

/// Whether a day trains or rests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Day with challenges
    Training,
    /// Recovery day, no challenges
    Rest,
}

/// One atomic timed activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Activity kind
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    /// Short title
    pub title: String,
    /// Length in minutes, always positive
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Difficulty rating 1-10
    pub difficulty: u8,
    /// One-sentence description
    pub description: String,
    /// 3-4 short imperative steps
    pub instructions: Vec<String>,
    /// What the user gains
    pub benefits: Vec<String>,
    /// Practical hints
    pub tips: Vec<String>,
}

/// One day within a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDay {
    /// Day number, 1-indexed across the whole plan
    pub day_number: u32,
    /// Training or rest
    #[serde(rename = "type")]
    pub day_type: DayType,
    /// Exactly 3 challenges on training days, empty on rest days
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

/// One generated (or fallback-built) week
///
/// Created by a single generation call or by the fallback generator,
/// validated, then immutable; only the assembler consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResult {
    /// Week number, 1-indexed
    pub week_number: u32,
    /// Theme label
    pub theme: String,
    /// Exactly 7 days
    pub days: Vec<TrainingDay>,
}

impl WeekResult {
    /// Renumber days so day numbers run globally across the plan
    ///
    /// Week 1 covers days 1-7, week 2 days 8-14, and so on. Normalization
    /// also pins the week number, so a backend that miscounts either field
    /// cannot corrupt plan-level ordering.
    pub fn normalize_numbering(&mut self, week_number: u32) {
        self.week_number = week_number;
        let base = (week_number - 1) * DAYS_PER_WEEK as u32;
        for (index, day) in self.days.iter_mut().enumerate() {
            day.day_number = base + index as u32 + 1;
        }
    }

    /// Count training days in this week
    #[must_use]
    pub fn training_day_count(&self) -> u32 {
        self.days
            .iter()
            .filter(|d| d.day_type == DayType::Training)
            .count() as u32
    }

    /// Count rest days in this week
    #[must_use]
    pub fn rest_day_count(&self) -> u32 {
        self.days
            .iter()
            .filter(|d| d.day_type == DayType::Rest)
            .count() as u32
    }
}

/// Fully assembled multi-week plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Unique plan identifier
    pub id: Uuid,
    /// Weeks in ascending order
    pub weeks: Vec<WeekResult>,
    /// Number of weeks
    pub total_weeks: u32,
    /// Total days across all weeks
    pub total_days: u32,
    /// Training days across all weeks
    pub training_days: u32,
    /// Rest days across all weeks
    pub rest_days: u32,
    /// Assembly timestamp
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Assemble validated week results into a plan
    ///
    /// Weeks are sorted by week number; aggregation sums day counts from the
    /// week contents rather than assuming the 6+1 split, so a violation
    /// upstream shows up in the totals.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlan` if `weeks` is empty, contains duplicate week
    /// numbers, or is not contiguous from week 1. These are programming
    /// errors in the calling pipeline, not retry targets.
    pub fn assemble(mut weeks: Vec<WeekResult>) -> Result<Self, AppError> {
        if weeks.is_empty() {
            return Err(AppError::invalid_plan("no weeks to assemble"));
        }

        weeks.sort_by_key(|w| w.week_number);

        for (index, week) in weeks.iter().enumerate() {
            let expected = index as u32 + 1;
            if week.week_number != expected {
                return Err(AppError::invalid_plan(format!(
                    "weeks must be contiguous from 1: expected week {expected}, found week {}",
                    week.week_number
                )));
            }
        }

        let total_days = weeks.iter().map(|w| w.days.len() as u32).sum();
        let training_days = weeks.iter().map(WeekResult::training_day_count).sum();
        let rest_days = weeks.iter().map(WeekResult::rest_day_count).sum();

        Ok(Self {
            id: Uuid::new_v4(),
            total_weeks: weeks.len() as u32,
            total_days,
            training_days,
            rest_days,
            created_at: Utc::now(),
            weeks,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::fallback::generate_fallback_week;
    use crate::engine::AssessmentRecord;
    use crate::errors::ErrorCode;

    fn sample_week(week_number: u32) -> WeekResult {
        generate_fallback_week(&AssessmentRecord::default(), week_number)
    }

    #[test]
    fn test_assemble_sorts_out_of_order_weeks() {
        let plan = Plan::assemble(vec![sample_week(2), sample_week(1)]).unwrap();
        assert_eq!(plan.weeks[0].week_number, 1);
        assert_eq!(plan.weeks[1].week_number, 2);
        assert_eq!(plan.total_weeks, 2);
        assert_eq!(plan.total_days, 14);
        assert_eq!(plan.training_days, 12);
        assert_eq!(plan.rest_days, 2);
    }

    #[test]
    fn test_assemble_empty_fails() {
        let err = Plan::assemble(vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPlan);
    }

    #[test]
    fn test_assemble_gap_fails() {
        let err = Plan::assemble(vec![sample_week(1), sample_week(3)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPlan);
    }

    #[test]
    fn test_normalize_numbering() {
        let mut week = sample_week(1);
        week.normalize_numbering(3);
        assert_eq!(week.week_number, 3);
        assert_eq!(week.days[0].day_number, 15);
        assert_eq!(week.days[6].day_number, 21);
    }
}
