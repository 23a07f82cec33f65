// ABOUTME: Integration tests for the plan data model and assembler
// ABOUTME: Covers ordering, contiguity, aggregate counts, and wire format
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan Assembler Tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use focusplan::engine::{generate_fallback_week, AssessmentRecord, Plan, WeekResult};
use focusplan::errors::ErrorCode;

fn week(week_number: u32) -> WeekResult {
    generate_fallback_week(&AssessmentRecord::default(), week_number)
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_assemble_counts() {
    let plan = Plan::assemble(vec![week(1), week(2), week(3)]).unwrap();
    assert_eq!(plan.total_weeks, 3);
    assert_eq!(plan.total_days, 21);
    assert_eq!(plan.training_days, 18);
    assert_eq!(plan.rest_days, 3);
}

#[test]
fn test_assemble_sorts_weeks() {
    let plan = Plan::assemble(vec![week(3), week(1), week(2)]).unwrap();
    let numbers: Vec<u32> = plan.weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_assemble_empty_is_invalid_plan() {
    let err = Plan::assemble(vec![]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPlan);
}

#[test]
fn test_assemble_rejects_gap() {
    let err = Plan::assemble(vec![week(1), week(2), week(4)]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPlan);
}

#[test]
fn test_assemble_rejects_duplicate_weeks() {
    let err = Plan::assemble(vec![week(1), week(1)]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPlan);
}

#[test]
fn test_assemble_rejects_not_starting_at_one() {
    let err = Plan::assemble(vec![week(2), week(3)]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPlan);
}

// ============================================================================
// Day numbering
// ============================================================================

#[test]
fn test_day_numbers_run_globally() {
    let plan = Plan::assemble(vec![week(1), week(2)]).unwrap();
    assert_eq!(plan.weeks[0].days[0].day_number, 1);
    assert_eq!(plan.weeks[0].days[6].day_number, 7);
    assert_eq!(plan.weeks[1].days[0].day_number, 8);
    assert_eq!(plan.weeks[1].days[6].day_number, 14);
}

#[test]
fn test_normalize_numbering_pins_both_fields() {
    let mut w = week(1);
    // A backend that miscounts cannot corrupt plan-level ordering
    w.week_number = 99;
    w.days[0].day_number = 42;
    w.normalize_numbering(2);
    assert_eq!(w.week_number, 2);
    assert_eq!(w.days[0].day_number, 8);
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn test_plan_serializes_camel_case() {
    let plan = Plan::assemble(vec![week(1)]).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert!(json.get("totalWeeks").is_some());
    assert!(json.get("trainingDays").is_some());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("total_weeks").is_none());

    let day = &json["weeks"][0]["days"][0];
    assert_eq!(day["type"], "training");
    assert!(day["dayNumber"].is_number());
    let challenge = &day["challenges"][0];
    assert_eq!(challenge["type"], "focus_session");
    assert!(challenge["duration"].is_number());
}

#[test]
fn test_plan_round_trips_through_json() {
    let plan = Plan::assemble(vec![week(1), week(2)]).unwrap();
    let json = serde_json::to_string(&plan).unwrap();
    let back: Plan = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, plan.id);
    assert_eq!(back.weeks, plan.weeks);
    assert_eq!(back.total_days, plan.total_days);
}

#[test]
fn test_plan_ids_are_unique() {
    let a = Plan::assemble(vec![week(1)]).unwrap();
    let b = Plan::assemble(vec![week(1)]).unwrap();
    assert_ne!(a.id, b.id);
}
