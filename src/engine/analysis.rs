// ABOUTME: Advisory assessment analysis - backend-assisted with a templated fallback
// ABOUTME: Independent of plan generation; one attempt, no retries
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assessment Analysis
//!
//! A single-call advisory read of an assessment: a short narrative, a list
//! of recommendations, and suggested tier/duration. The narrative and
//! recommendations may come from the generation backend; the suggested tier
//! and duration always come from the difficulty model, so they stay
//! consistent with what plan generation would actually do. Any backend
//! failure falls back to the deterministic template - analysis never fails.

use serde::{Deserialize, Serialize};

use super::assessment::{AssessmentRecord, ExperienceLevel, PrimaryGoal};
use super::difficulty::compute_difficulty;
use super::repair::{extract_json_object, repair_json, strip_code_fences, ParseError};

/// Maximum suggested plan length in weeks
const MAX_SUGGESTED_WEEKS: u32 = 6;

/// Advisory analysis of one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAnalysis {
    /// Short narrative addressed to the user
    pub analysis: String,
    /// Actionable recommendations
    pub recommendations: Vec<String>,
    /// Difficulty tier label the plan would start at
    pub suggested_tier_label: String,
    /// Recommended plan length in weeks
    pub suggested_duration_weeks: u32,
}

/// Narrative-and-recommendations fragment the backend is asked to produce
#[derive(Debug, Deserialize)]
struct AnalysisFragment {
    analysis: String,
    recommendations: Vec<String>,
}

/// Suggested plan duration from experience and goal
///
/// Beginners start at 4 weeks, advanced users at 6; attention-management
/// and study goals get one extra week of runway, capped at 6.
#[must_use]
pub fn suggested_duration_weeks(assessment: &AssessmentRecord) -> u32 {
    let base = match assessment.experience_level {
        ExperienceLevel::Beginner => 4,
        ExperienceLevel::Intermediate => 5,
        ExperienceLevel::Advanced => 6,
    };

    let adjusted = match assessment.primary_goal {
        PrimaryGoal::AdhdManagement | PrimaryGoal::Study => base + 1,
        PrimaryGoal::Work | PrimaryGoal::Creative | PrimaryGoal::General => base,
    };

    adjusted.min(MAX_SUGGESTED_WEEKS)
}

/// Goal-specific recommendation
fn goal_recommendation(goal: PrimaryGoal) -> &'static str {
    match goal {
        PrimaryGoal::Work => {
            "Block your focus sessions in your work calendar so meetings cannot land on them."
        }
        PrimaryGoal::Study => {
            "Attach each focus session to one specific topic or problem set, decided the night before."
        }
        PrimaryGoal::Creative => {
            "Start each session by rereading your last few minutes of output instead of planning."
        }
        PrimaryGoal::AdhdManagement => {
            "Keep sessions short and non-negotiable; consistency matters more than length."
        }
        PrimaryGoal::General => {
            "Pick one recurring daily task and always run it inside a focus session."
        }
    }
}

/// Experience-specific recommendation
fn experience_recommendation(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::Beginner => {
            "Finish every planned session this week, even if the timer feels short. The habit comes first."
        }
        ExperienceLevel::Intermediate => {
            "Track which hour of the day gives you the cleanest sessions and protect it."
        }
        ExperienceLevel::Advanced => {
            "Raise the bar on session quality: one task, zero tab switches, notes afterward."
        }
    }
}

/// Deterministic templated analysis, the guaranteed fallback path
#[must_use]
pub fn templated_analysis(assessment: &AssessmentRecord) -> AssessmentAnalysis {
    let (ability, tier) = compute_difficulty(assessment);
    let levels = assessment.normalized_levels();

    let analysis = format!(
        "Your current ability score is {ability:.1} out of 10, which places you in the \
         {label} tier. Your focus training starts with {work}-minute sessions and builds \
         from there week by week. With your reported focus at {focus:.0}/10 and \
         distraction at {distraction:.0}/10, the plan emphasizes steady, repeatable \
         sessions over long stretches.",
        label = tier.label,
        work = tier.work_minutes,
        focus = levels.focus,
        distraction = levels.distraction,
    );

    let mut recommendations = vec![
        goal_recommendation(assessment.primary_goal).to_owned(),
        experience_recommendation(assessment.experience_level).to_owned(),
        format!(
            "Keep sessions at {} minutes until they feel easy, then let the weekly \
             progression extend them.",
            tier.work_minutes
        ),
    ];

    if levels.stress >= 7.0 {
        recommendations.push(
            "Your stress is high. Do the breathing challenge before every session, not after."
                .to_owned(),
        );
    }
    if levels.distraction >= 7.0 {
        recommendations.push(
            "Remove your single biggest distraction physically before starting, rather than \
             relying on willpower."
                .to_owned(),
        );
    }

    AssessmentAnalysis {
        analysis,
        recommendations,
        suggested_tier_label: tier.label.to_owned(),
        suggested_duration_weeks: suggested_duration_weeks(assessment),
    }
}

/// Parse a backend analysis response into a full [`AssessmentAnalysis`]
///
/// Runs the same repair pipeline as week parsing. The suggested tier and
/// duration are always computed locally from the assessment, never taken
/// from the backend.
///
/// # Errors
///
/// Returns [`ParseError`] if the repaired text does not parse into the
/// expected fragment, or the narrative or recommendations are empty.
pub fn parse_analysis_response(
    raw: &str,
    assessment: &AssessmentRecord,
) -> Result<AssessmentAnalysis, ParseError> {
    let text = strip_code_fences(raw);
    let text = extract_json_object(&text);
    let text = repair_json(&text);

    let fragment: AnalysisFragment = serde_json::from_str(&text).map_err(|e| ParseError {
        message: format!("invalid analysis JSON: {e}"),
        offset: None,
        context: None,
    })?;

    if fragment.analysis.trim().is_empty() {
        return Err(ParseError {
            message: "analysis narrative is empty".to_owned(),
            offset: None,
            context: None,
        });
    }
    if fragment.recommendations.is_empty() {
        return Err(ParseError {
            message: "analysis has no recommendations".to_owned(),
            offset: None,
            context: None,
        });
    }

    let (_, tier) = compute_difficulty(assessment);

    Ok(AssessmentAnalysis {
        analysis: fragment.analysis,
        recommendations: fragment.recommendations,
        suggested_tier_label: tier.label.to_owned(),
        suggested_duration_weeks: suggested_duration_weeks(assessment),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_templated_analysis_is_deterministic() {
        let record = AssessmentRecord::default();
        let a = templated_analysis(&record);
        let b = templated_analysis(&record);
        assert_eq!(a.analysis, b.analysis);
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn test_suggested_duration_by_experience() {
        let beginner = AssessmentRecord::default();
        assert_eq!(suggested_duration_weeks(&beginner), 4);

        let advanced = AssessmentRecord {
            experience_level: ExperienceLevel::Advanced,
            ..AssessmentRecord::default()
        };
        assert_eq!(suggested_duration_weeks(&advanced), 6);
    }

    #[test]
    fn test_goal_adjustment_caps_at_six() {
        let record = AssessmentRecord {
            experience_level: ExperienceLevel::Advanced,
            primary_goal: PrimaryGoal::AdhdManagement,
            ..AssessmentRecord::default()
        };
        assert_eq!(suggested_duration_weeks(&record), 6);
    }

    #[test]
    fn test_parse_analysis_response_fills_local_fields() {
        let raw = "```json\n{\"analysis\": \"You are on track.\", \"recommendations\": [\"Start small.\"]}\n```";
        let record = AssessmentRecord::default();
        let analysis = parse_analysis_response(raw, &record).unwrap();
        assert_eq!(analysis.analysis, "You are on track.");
        assert_eq!(analysis.suggested_duration_weeks, 4);
        assert!(!analysis.suggested_tier_label.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_recommendations() {
        let raw = "{\"analysis\": \"ok\", \"recommendations\": []}";
        assert!(parse_analysis_response(raw, &AssessmentRecord::default()).is_err());
    }

    #[test]
    fn test_high_stress_adds_breathing_recommendation() {
        let record = AssessmentRecord {
            stress_level: Some(9.0),
            ..AssessmentRecord::default()
        };
        let analysis = templated_analysis(&record);
        assert!(analysis.recommendations.iter().any(|r| r.contains("breathing")));
    }
}
