// ABOUTME: Integration tests for the deterministic fallback generator
// ABOUTME: Uses the parser's shape gate as the oracle for structural validity
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback Generator Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use focusplan::engine::repair::validate_week_shape;
use focusplan::engine::{
    compute_difficulty, generate_fallback_plan, generate_fallback_week, AssessmentRecord,
    ChallengeKind, DayType,
};

// ============================================================================
// Shape guarantees
// ============================================================================

#[test]
fn test_every_fallback_week_passes_the_shape_gate() {
    let record = AssessmentRecord::default();
    for week_number in 1..=8 {
        let week = generate_fallback_week(&record, week_number);
        validate_week_shape(&week)
            .unwrap_or_else(|e| panic!("week {week_number} failed shape gate: {e}"));
    }
}

#[test]
fn test_training_rest_split() {
    let week = generate_fallback_week(&AssessmentRecord::default(), 1);
    for day in &week.days[..6] {
        assert_eq!(day.day_type, DayType::Training);
        assert_eq!(day.challenges.len(), 3);
    }
    assert_eq!(week.days[6].day_type, DayType::Rest);
    assert!(week.days[6].challenges.is_empty());
}

#[test]
fn test_every_training_day_has_one_focus_session() {
    let week = generate_fallback_week(&AssessmentRecord::default(), 3);
    for day in &week.days[..6] {
        let sessions = day
            .challenges
            .iter()
            .filter(|c| c.kind == ChallengeKind::FocusSession)
            .count();
        assert_eq!(sessions, 1);
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_inputs_produce_identical_weeks() {
    let record = AssessmentRecord {
        focus_level: Some(7.0),
        stress_level: Some(3.0),
        ..AssessmentRecord::default()
    };
    for week_number in [1, 2, 5] {
        let a = generate_fallback_week(&record, week_number);
        let b = generate_fallback_week(&record, week_number);
        assert_eq!(a, b);
    }
}

// ============================================================================
// Difficulty progression
// ============================================================================

#[test]
fn test_difficulty_rises_to_day_five_then_drops() {
    for week_number in 1..=6 {
        let week = generate_fallback_week(&AssessmentRecord::default(), week_number);
        let difficulties: Vec<u8> = week.days[..6]
            .iter()
            .map(|d| d.challenges[0].difficulty)
            .collect();

        for pair in difficulties[..5].windows(2) {
            assert!(pair[1] >= pair[0], "difficulty decreased before day 5");
        }
        assert!(
            difficulties[5] < difficulties[4],
            "day 6 must be lighter than the day-5 peak (week {week_number})"
        );
    }
}

#[test]
fn test_difficulty_scales_with_week_then_caps() {
    let record = AssessmentRecord::default();
    let day1 = |week_number| {
        generate_fallback_week(&record, week_number).days[0].challenges[0].difficulty
    };
    assert_eq!(day1(1), 3);
    assert_eq!(day1(2), 4);
    assert_eq!(day1(3), 5);
    // Base caps at 5 from week 3 on
    assert_eq!(day1(6), 5);
}

#[test]
fn test_all_difficulties_stay_in_band() {
    let record = AssessmentRecord::default();
    for week_number in 1..=10 {
        let week = generate_fallback_week(&record, week_number);
        for day in &week.days {
            for challenge in &day.challenges {
                assert!((1..=10).contains(&challenge.difficulty));
            }
        }
    }
}

// ============================================================================
// Tier-derived durations
// ============================================================================

#[test]
fn test_focus_durations_follow_week_adjusted_tier() {
    let record = AssessmentRecord::default();
    let (ability, tier) = compute_difficulty(&record);

    for week_number in 1..=4 {
        let expected = tier.for_week(week_number, ability).work_minutes;
        let week = generate_fallback_week(&record, week_number);
        for day in &week.days[..6] {
            let session = day
                .challenges
                .iter()
                .find(|c| c.kind == ChallengeKind::FocusSession)
                .unwrap();
            assert_eq!(session.duration_minutes, expected);
        }
    }
}

#[test]
fn test_low_ability_user_gets_short_sessions() {
    let record = AssessmentRecord {
        focus_level: Some(2.0),
        distraction_level: Some(8.0),
        motivation_level: Some(4.0),
        energy_level: Some(3.0),
        stress_level: Some(8.0),
        ..AssessmentRecord::default()
    };
    let week = generate_fallback_week(&record, 1);
    let session = &week.days[0].challenges[0];
    assert_eq!(session.duration_minutes, 10);
}

// ============================================================================
// Plans
// ============================================================================

#[test]
fn test_fallback_plan_aggregates() {
    let plan = generate_fallback_plan(&AssessmentRecord::default(), 6).unwrap();
    assert_eq!(plan.total_weeks, 6);
    assert_eq!(plan.total_days, 42);
    assert_eq!(plan.training_days, 36);
    assert_eq!(plan.rest_days, 6);
    // Day numbers run globally
    assert_eq!(plan.weeks[5].days[6].day_number, 42);
}

#[test]
fn test_fallback_plan_themes_progress() {
    let plan = generate_fallback_plan(&AssessmentRecord::default(), 3).unwrap();
    assert_eq!(plan.weeks[0].theme, "Getting Started");
    assert_eq!(plan.weeks[1].theme, "Building Rhythm");
    assert_eq!(plan.weeks[2].theme, "Deep Focus");
}

#[test]
fn test_challenge_text_fields_are_populated() {
    let week = generate_fallback_week(&AssessmentRecord::default(), 1);
    for day in &week.days[..6] {
        for challenge in &day.challenges {
            assert!(!challenge.title.is_empty());
            assert!(!challenge.description.is_empty());
            assert!((3..=4).contains(&challenge.instructions.len()));
            assert!(!challenge.benefits.is_empty());
            assert!(!challenge.tips.is_empty());
        }
    }
}
