// ABOUTME: Integration tests for response repair and strict week parsing
// ABOUTME: Exercises the pipeline against realistic malformed backend output
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response Repair and Parser Tests
//!
//! The repair pipeline is the highest-risk correctness surface, so it gets
//! tested independently of any generation backend: clean input, fenced
//! input, prose-wrapped input, structurally broken input, diacritics, and
//! every shape violation the validation gate must catch.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use focusplan::engine::repair::{
    extract_json_object, repair_json, strip_code_fences, strip_diacritics, validate_week_shape,
};
use focusplan::engine::{generate_fallback_week, parse_week, AssessmentRecord, DayType};

// ============================================================================
// Helpers
// ============================================================================

/// A known-valid week serialized to clean JSON
fn clean_week_json() -> String {
    let week = generate_fallback_week(&AssessmentRecord::default(), 1);
    serde_json::to_string(&week).unwrap()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_clean_json_parses_unchanged() {
    let week = generate_fallback_week(&AssessmentRecord::default(), 1);
    let json = serde_json::to_string(&week).unwrap();
    let parsed = parse_week(&json).unwrap();
    assert_eq!(parsed, week);
}

#[test]
fn test_pretty_printed_json_parses() {
    let week = generate_fallback_week(&AssessmentRecord::default(), 2);
    let json = serde_json::to_string_pretty(&week).unwrap();
    let parsed = parse_week(&json).unwrap();
    assert_eq!(parsed, week);
}

// ============================================================================
// Wrapping and prose
// ============================================================================

#[test]
fn test_fenced_json_parses() {
    let wrapped = format!("```json\n{}\n```", clean_week_json());
    let parsed = parse_week(&wrapped).unwrap();
    assert_eq!(parsed.days.len(), 7);
}

#[test]
fn test_bare_fences_parse() {
    let wrapped = format!("```\n{}\n```", clean_week_json());
    assert!(parse_week(&wrapped).is_ok());
}

#[test]
fn test_prose_wrapped_json_parses() {
    let wrapped = format!(
        "Here is your training week, carefully designed for you!\n\n{}\n\nGood luck with the plan!",
        clean_week_json()
    );
    let parsed = parse_week(&wrapped).unwrap();
    assert_eq!(parsed.week_number, 1);
}

#[test]
fn test_extract_ignores_braces_inside_strings() {
    let text = r#"note {"a": "look: } and { inside", "b": 2} trailing"#;
    assert_eq!(
        extract_json_object(text),
        r#"{"a": "look: } and { inside", "b": 2}"#
    );
}

// ============================================================================
// Structural repair
// ============================================================================

#[test]
fn test_bare_keys_and_trailing_commas_repair() {
    let json = clean_week_json();
    // Unquote two keys and add a trailing comma before the final brace
    let broken = json
        .replace("\"theme\":", "theme:")
        .replace("\"weekNumber\":", "weekNumber:")
        .replacen("]}", "],}", 1);
    let parsed = parse_week(&broken).unwrap();
    assert_eq!(parsed.days.len(), 7);
}

#[test]
fn test_newlines_inside_object_repair() {
    let json = clean_week_json().replace(',', ",\n");
    assert!(parse_week(&json).is_ok());
}

#[test]
fn test_repair_is_idempotent_on_real_payload() {
    let broken = clean_week_json().replace("\"theme\":", "theme:");
    let once = repair_json(&broken);
    let twice = repair_json(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_missing_commas_between_literals_repair() {
    let fragment = r#"{"a": [{"x": 1} {"x": 2}], "b": ["one" "two"]}"#;
    let repaired = repair_json(fragment);
    let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
    assert_eq!(value["a"].as_array().unwrap().len(), 2);
    assert_eq!(value["b"][1], "two");
}

// ============================================================================
// Diacritics
// ============================================================================

#[test]
fn test_diacritics_strip_to_ascii() {
    assert_eq!(strip_diacritics("luyện tập trung"), "luyen tap trung");
    assert_eq!(strip_diacritics("hít thở đều"), "hit tho deu");
    assert_eq!(strip_diacritics("café résumé"), "cafe resume");
}

#[test]
fn test_smart_punctuation_never_becomes_double_quotes() {
    let stripped = strip_diacritics("say \u{201C}ready\u{201D} then start\u{2026}");
    assert!(!stripped.contains('"'));
    assert_eq!(stripped, "say 'ready' then start...");
}

#[test]
fn test_accented_content_inside_week_parses() {
    let json = clean_week_json().replace("Box Breathing Warm-Up", "Thở hộp khởi động");
    let parsed = parse_week(&json).unwrap();
    let title = &parsed.days[0].challenges[1].title;
    assert_eq!(title, "Tho hop khoi dong");
}

// ============================================================================
// Parse failures carry diagnostics
// ============================================================================

#[test]
fn test_unparseable_text_fails_with_offset() {
    let err = parse_week("{\"weekNumber\": , \"theme\": \"x\"}").unwrap_err();
    assert!(err.offset.is_some());
    let context = err.context.unwrap();
    assert!(context.contains("weekNumber"));
}

#[test]
fn test_text_without_json_fails() {
    assert!(parse_week("I could not generate a plan this time, sorry.").is_err());
}

#[test]
fn test_empty_input_fails() {
    assert!(parse_week("").is_err());
}

// ============================================================================
// Shape gate
// ============================================================================

#[test]
fn test_six_day_week_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days.pop();
    assert!(validate_week_shape(&week).is_err());
}

#[test]
fn test_wrong_challenge_count_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days[2].challenges.pop();
    let err = validate_week_shape(&week).unwrap_err();
    assert!(err.message.contains("3 challenges"));
}

#[test]
fn test_rest_day_with_challenges_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    let challenge = week.days[0].challenges[0].clone();
    week.days[6].challenges.push(challenge);
    assert!(validate_week_shape(&week).is_err());
}

#[test]
fn test_training_day_in_rest_slot_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days[6].day_type = DayType::Training;
    assert!(validate_week_shape(&week).is_err());
}

#[test]
fn test_zero_duration_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days[0].challenges[0].duration_minutes = 0;
    assert!(validate_week_shape(&week).is_err());
}

#[test]
fn test_difficulty_out_of_band_rejected() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days[0].challenges[0].difficulty = 11;
    assert!(validate_week_shape(&week).is_err());

    week.days[0].challenges[0].difficulty = 0;
    assert!(validate_week_shape(&week).is_err());
}

#[test]
fn test_shape_violation_through_parse_week() {
    let mut week = generate_fallback_week(&AssessmentRecord::default(), 1);
    week.days.truncate(5);
    let json = serde_json::to_string(&week).unwrap();
    let err = parse_week(&json).unwrap_err();
    assert!(err.message.contains("7 days"));
}

// ============================================================================
// Individual steps stay total
// ============================================================================

#[test]
fn test_steps_never_panic_on_garbage() {
    for garbage in ["", "{{{{", "]}[", "``` ```", "\u{0}\u{1}\u{2}", "週間"] {
        let _ = strip_code_fences(garbage);
        let _ = extract_json_object(garbage);
        let _ = strip_diacritics(garbage);
        let _ = repair_json(garbage);
        let _ = parse_week(garbage);
    }
}
