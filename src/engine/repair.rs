// ABOUTME: Response repair and strict parsing of generated week JSON
// ABOUTME: Best-effort heuristic normalization with a hard validation gate after parse
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Response Repair and Parsing
//!
//! Generation backends are instructed to emit a single clean JSON object,
//! but real responses arrive wrapped in code fences, surrounded by prose,
//! sprinkled with diacritics, or structurally broken (bare keys, trailing
//! commas, missing commas). This module normalizes raw text into a valid
//! [`WeekResult`] through a fixed pipeline:
//!
//! 1. strip code-fence wrapping
//! 2. extract the first balanced `{...}` span
//! 3. strip diacritics and legacy special letters
//! 4. heuristic structural repair (regex patching)
//! 5. strict parse + shape validation
//!
//! Steps 1-4 are total: they only transform, never fail. Step 5 is the hard
//! gate; anything that survives repair but is not a structurally valid week
//! raises [`ParseError`] with the failure offset and a context window for
//! diagnostics. The repair pass is deliberately heuristic; correctness comes
//! from the gate, not from the patching.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::plan::{
    DayType, WeekResult, CHALLENGES_PER_TRAINING_DAY, DAYS_PER_WEEK, TRAINING_DAYS_PER_WEEK,
};

/// Characters of context shown on each side of a parse failure
const CONTEXT_WINDOW_CHARS: usize = 40;

/// Failure to produce a structurally valid week from raw generated text
#[derive(Debug, Error)]
#[error("{}", self.render())]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// Byte offset of the failure in the repaired text, when known
    pub offset: Option<usize>,
    /// Snippet of the repaired text around the failure point
    pub context: Option<String>,
}

impl ParseError {
    fn render(&self) -> String {
        let mut out = self.message.clone();
        if let Some(offset) = self.offset {
            out.push_str(&format!(" at offset {offset}"));
        }
        if let Some(context) = &self.context {
            out.push_str(&format!(" near: ...{context}..."));
        }
        out
    }

    /// Shape or content violation with no specific text offset
    fn shape(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
            context: None,
        }
    }
}

// ============================================================================
// Step 1: code fence stripping
// ============================================================================

/// Strip leading/trailing code-fence wrapping if present
///
/// Handles ```json ... ``` and bare ``` ... ``` blocks; text without fences
/// passes through trimmed.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_owned();
    };

    // Drop the language tag on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = body.strip_suffix("```").unwrap_or(body);

    body.trim().to_owned()
}

// ============================================================================
// Step 2: balanced object extraction
// ============================================================================

/// Extract the first balanced `{...}` span from text with surrounding prose
///
/// Tracks string literals and escapes so braces inside strings do not
/// unbalance the scan. Text with no opening brace, or an object that never
/// closes, passes through unchanged and fails at the parse gate with a
/// useful offset instead of being silently truncated here.
#[must_use]
pub fn extract_json_object(text: &str) -> String {
    let Some(start) = text.find('{') else {
        return text.trim().to_owned();
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return text[start..=start + index].to_owned();
                }
            }
            _ => {}
        }
    }

    text[start..].to_owned()
}

// ============================================================================
// Step 3: diacritic stripping
// ============================================================================

/// Strip combining diacritics plus a fixed table of special letters
///
/// The generation backend is instructed to emit plain ASCII but sometimes
/// produces accented characters anyway. NFD decomposition separates base
/// letters from combining marks, which are then dropped; letters that do not
/// decompose (like the stroked d) and smart punctuation go through a fixed
/// replacement table. Smart double quotes map to an apostrophe, never to a
/// straight double quote, so content quoting cannot corrupt the JSON
/// structure around it.
#[must_use]
pub fn strip_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for ch in text.nfd().filter(|c| !is_combining_mark(*c)) {
        match ch {
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'ı' => out.push('i'),
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            '\u{2018}' | '\u{2019}' | '\u{201B}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => out.push('\''),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            _ => out.push(ch),
        }
    }

    out
}

// ============================================================================
// Step 4: structural repair
// ============================================================================

static RE_BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    // Safe: pattern is a compile-time constant
    #[allow(clippy::unwrap_used)]
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap()
});

static RE_TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r",\s*([}\]])").unwrap()
});

static RE_MISSING_COMMA_OBJECTS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\}\s*\{").unwrap()
});

static RE_MISSING_COMMA_ARRAYS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\]\s*\[").unwrap()
});

static RE_MISSING_COMMA_STRINGS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r#""\s+""#).unwrap()
});

static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\s{2,}").unwrap()
});

/// Heuristic structural repair of near-JSON text
///
/// Patches the common structural mistakes the backends make: newlines inside
/// the object, unquoted keys, trailing commas, missing commas between
/// adjacent literals or strings, control characters, and whitespace runs.
/// Idempotent: repairing already-repaired text changes nothing.
#[must_use]
pub fn repair_json(text: &str) -> String {
    // Newlines become spaces so the remaining passes see one line
    let text = text.replace(['\r', '\n'], " ");

    // Control characters have no business inside generated JSON
    let text: String = text.chars().filter(|c| !c.is_control()).collect();

    let text = RE_BARE_KEY.replace_all(&text, "$1\"$2\":");
    let text = RE_TRAILING_COMMA.replace_all(&text, "$1");
    let text = RE_MISSING_COMMA_OBJECTS.replace_all(&text, "}, {");
    let text = RE_MISSING_COMMA_ARRAYS.replace_all(&text, "], [");
    let text = RE_MISSING_COMMA_STRINGS.replace_all(&text, "\", \"");
    let text = RE_WHITESPACE_RUN.replace_all(&text, " ");

    text.trim().to_owned()
}

// ============================================================================
// Step 5: strict parse + shape gate
// ============================================================================

/// Convert a serde line/column position into a byte offset
fn offset_from_line_col(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0usize;
    for (index, candidate) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return (offset + column.saturating_sub(1)).min(text.len());
        }
        offset += candidate.len();
    }
    text.len().saturating_sub(1)
}

/// Cut a context window around a byte offset, respecting char boundaries
fn context_window(text: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(CONTEXT_WINDOW_CHARS);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + CONTEXT_WINDOW_CHARS).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_owned()
}

/// Validate the shape invariants of a parsed week
///
/// # Errors
///
/// Returns [`ParseError`] when the week violates the 7-day structure, the
/// training/rest split, the exact challenge count, or a challenge field
/// range.
pub fn validate_week_shape(week: &WeekResult) -> Result<(), ParseError> {
    if week.days.len() != DAYS_PER_WEEK {
        return Err(ParseError::shape(format!(
            "week must have {DAYS_PER_WEEK} days, found {}",
            week.days.len()
        )));
    }

    if week.theme.trim().is_empty() {
        return Err(ParseError::shape("week theme must not be empty"));
    }

    for (index, day) in week.days.iter().enumerate() {
        let position = index + 1;
        let expected_type = if position <= TRAINING_DAYS_PER_WEEK {
            DayType::Training
        } else {
            DayType::Rest
        };

        if day.day_type != expected_type {
            return Err(ParseError::shape(format!(
                "day {position} must be {expected_type:?}, found {:?}",
                day.day_type
            )));
        }

        match day.day_type {
            DayType::Training => {
                if day.challenges.len() != CHALLENGES_PER_TRAINING_DAY {
                    return Err(ParseError::shape(format!(
                        "training day {position} must have {CHALLENGES_PER_TRAINING_DAY} challenges, found {}",
                        day.challenges.len()
                    )));
                }
            }
            DayType::Rest => {
                if !day.challenges.is_empty() {
                    return Err(ParseError::shape(format!(
                        "rest day {position} must have no challenges, found {}",
                        day.challenges.len()
                    )));
                }
            }
        }

        for challenge in &day.challenges {
            if challenge.title.trim().is_empty() {
                return Err(ParseError::shape(format!(
                    "day {position}: challenge title must not be empty"
                )));
            }
            if challenge.duration_minutes == 0 {
                return Err(ParseError::shape(format!(
                    "day {position}: challenge duration must be positive"
                )));
            }
            if !(1..=10).contains(&challenge.difficulty) {
                return Err(ParseError::shape(format!(
                    "day {position}: challenge difficulty {} outside 1-10",
                    challenge.difficulty
                )));
            }
        }
    }

    Ok(())
}

/// Normalize raw generated text into a structurally valid week
///
/// Runs the full repair pipeline, then the strict parse, then the shape
/// gate.
///
/// # Errors
///
/// Returns [`ParseError`] if the repaired text is not valid JSON or parses
/// into a week that violates the shape invariants. The error carries the
/// byte offset and a context window around the failure point in the
/// repaired text.
pub fn parse_week(raw: &str) -> Result<WeekResult, ParseError> {
    let text = strip_code_fences(raw);
    let text = extract_json_object(&text);
    let text = strip_diacritics(&text);
    let text = repair_json(&text);

    let week: WeekResult = serde_json::from_str(&text).map_err(|e| {
        let offset = offset_from_line_col(&text, e.line(), e.column());
        ParseError {
            message: format!("invalid week JSON: {e}"),
            offset: Some(offset),
            context: Some(context_window(&text, offset)),
        }
    })?;

    validate_week_shape(&week)?;

    Ok(week)
}
