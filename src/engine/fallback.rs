// ABOUTME: Deterministic fallback week and plan generator, no backend involved
// ABOUTME: Doubles as the reference producer for the week shape invariants
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Fallback Generator
//!
//! Builds complete training weeks without any generation backend. Fully
//! deterministic: the same assessment and week number always produce the
//! same week, byte for byte. Structure mirrors generated weeks exactly (6
//! training days of 3 challenges, day 7 rest), so the fallback also serves
//! as the oracle for what a valid week looks like.
//!
//! Challenge difficulty follows a fixed progression: a week-dependent base
//! of `min(3 + (week - 1), 5)`, day offsets of `[0, 0, 1, 2, 3]` across
//! days 1-5, then a lighter day 6 at `base + 1`, all capped at 10.

use super::assessment::AssessmentRecord;
use super::difficulty::{compute_difficulty, WeekSpec};
use super::plan::{
    Challenge, ChallengeKind, DayType, Plan, TrainingDay, WeekResult, TRAINING_DAYS_PER_WEEK,
};
use crate::errors::AppError;

/// Week-dependent difficulty base, capped at 5
const fn difficulty_base(week_number: u32) -> u8 {
    let base = 3 + week_number.saturating_sub(1);
    if base > 5 {
        5
    } else {
        base as u8
    }
}

/// Difficulty offsets for training days 1-5; day 6 backs off to base + 1
const DAY_DIFFICULTY_OFFSETS: [u8; 5] = [0, 0, 1, 2, 3];

/// Challenge difficulty for one training day within a week
const fn day_difficulty(week_number: u32, day_in_week: usize) -> u8 {
    let base = difficulty_base(week_number);
    let value = if day_in_week <= 5 {
        base + DAY_DIFFICULTY_OFFSETS[day_in_week - 1]
    } else {
        base + 1
    };
    if value > 10 {
        10
    } else {
        value
    }
}

/// Fixed focus-session titles keyed by training day
const FOCUS_TITLES: [&str; 6] = [
    "Opening Focus Block",
    "Steady Focus Block",
    "Extended Focus Block",
    "Deep Focus Block",
    "Peak Focus Block",
    "Light Consolidation Block",
];

struct SupportTemplate {
    kind: ChallengeKind,
    title: &'static str,
    duration_minutes: u32,
    description: &'static str,
    instructions: [&'static str; 3],
    benefits: [&'static str; 2],
    tips: [&'static str; 2],
}

/// Two supporting challenges per training day, fixed by day slot
const SUPPORT_TEMPLATES: [[SupportTemplate; 2]; 6] = [
    [
        SupportTemplate {
            kind: ChallengeKind::Breathing,
            title: "Box Breathing Warm-Up",
            duration_minutes: 5,
            description: "Settle your nervous system before the first focus session.",
            instructions: [
                "Sit upright and close your eyes",
                "Inhale 4 counts, hold 4, exhale 4, hold 4",
                "Repeat the cycle until the timer ends",
            ],
            benefits: ["Lowers pre-session restlessness", "Builds a start-of-work ritual"],
            tips: ["Count silently, not aloud", "Keep shoulders relaxed"],
        },
        SupportTemplate {
            kind: ChallengeKind::Reflection,
            title: "Intention Journal",
            duration_minutes: 5,
            description: "Write down what you want from this week of training.",
            instructions: [
                "Note one concrete goal for the week",
                "List the two distractions most likely to derail you",
                "Write one sentence on how you will handle each",
            ],
            benefits: ["Clarifies purpose", "Makes distractions easier to catch"],
            tips: ["Keep the journal next to your timer", "Short and honest beats long and vague"],
        },
    ],
    [
        SupportTemplate {
            kind: ChallengeKind::Mindfulness,
            title: "Single-Object Attention",
            duration_minutes: 5,
            description: "Hold your attention on one ordinary object without judging drift.",
            instructions: [
                "Pick a small object and place it in front of you",
                "Observe its color, texture, and edges",
                "When your mind wanders, return to the object",
            ],
            benefits: ["Trains the return-to-focus reflex", "Builds tolerance for boredom"],
            tips: ["Drifting is the exercise, not a failure", "Use the same object each time"],
        },
        SupportTemplate {
            kind: ChallengeKind::Stretching,
            title: "Desk Reset Stretch",
            duration_minutes: 5,
            description: "Release neck and shoulder tension between sessions.",
            instructions: [
                "Roll your shoulders backward ten times",
                "Tilt your head gently to each side",
                "Stretch both arms overhead and hold",
            ],
            benefits: ["Reduces physical restlessness", "Marks a clean break between sessions"],
            tips: ["Move slowly", "Stand up if you can"],
        },
    ],
    [
        SupportTemplate {
            kind: ChallengeKind::Breathing,
            title: "Extended Exhale Breathing",
            duration_minutes: 5,
            description: "Use a longer exhale to calm mid-week fatigue.",
            instructions: [
                "Inhale through the nose for 4 counts",
                "Exhale slowly through the mouth for 8 counts",
                "Repeat until the timer ends",
            ],
            benefits: ["Counters afternoon slumps", "Steadies attention before hard work"],
            tips: ["Do not force the breath", "Pair it with your hardest session"],
        },
        SupportTemplate {
            kind: ChallengeKind::Reflection,
            title: "Distraction Log Review",
            duration_minutes: 5,
            description: "Review what pulled you off task so far this week.",
            instructions: [
                "List every interruption you remember from the last two days",
                "Mark which were external and which were internal",
                "Choose one to eliminate tomorrow",
            ],
            benefits: ["Turns vague frustration into specific fixes", "Tracks progress over weeks"],
            tips: ["Be specific about the trigger", "One fix at a time"],
        },
    ],
    [
        SupportTemplate {
            kind: ChallengeKind::Mindfulness,
            title: "Body Scan",
            duration_minutes: 10,
            description: "Move attention slowly through the body to anchor it.",
            instructions: [
                "Lie down or sit comfortably",
                "Move attention from feet to head, one region at a time",
                "Note sensations without changing anything",
            ],
            benefits: ["Deepens sustained attention", "Reveals hidden tension"],
            tips: ["Slower is better", "Use a guided recording if it helps"],
        },
        SupportTemplate {
            kind: ChallengeKind::Breathing,
            title: "Paced Breathing",
            duration_minutes: 5,
            description: "Breathe at a steady six breaths per minute.",
            instructions: [
                "Inhale for 5 counts",
                "Exhale for 5 counts",
                "Keep the rhythm even until the timer ends",
            ],
            benefits: ["Stabilizes heart rate", "Good reset between demanding sessions"],
            tips: ["Use a pacing app if counting distracts you", "Breathe through the nose"],
        },
    ],
    [
        SupportTemplate {
            kind: ChallengeKind::Reflection,
            title: "Progress Review",
            duration_minutes: 10,
            description: "Compare this week's sessions against your day-one intention.",
            instructions: [
                "Reread your intention journal entry",
                "Note what got easier and what still breaks your focus",
                "Write one adjustment for the final training day",
            ],
            benefits: ["Consolidates learning", "Keeps the plan honest"],
            tips: ["Look for patterns, not verdicts", "Celebrate small wins"],
        },
        SupportTemplate {
            kind: ChallengeKind::Stretching,
            title: "Full Shoulder Release",
            duration_minutes: 5,
            description: "Undo a week of desk posture before the peak day ends.",
            instructions: [
                "Clasp hands behind your back and lift gently",
                "Stretch each arm across the chest and hold",
                "Finish with slow neck circles in both directions",
            ],
            benefits: ["Relieves accumulated tension", "Improves end-of-day recovery"],
            tips: ["Hold each stretch for 20 seconds", "Stop at mild tension, never pain"],
        },
    ],
    [
        SupportTemplate {
            kind: ChallengeKind::Mindfulness,
            title: "Mindful Walk",
            duration_minutes: 10,
            description: "Walk without a phone, attending only to movement and surroundings.",
            instructions: [
                "Leave your phone behind",
                "Walk at an easy pace and notice each step",
                "When thoughts pull you away, return to walking",
            ],
            benefits: ["Practices focus away from the desk", "Eases into the rest day"],
            tips: ["Outdoors beats indoors", "Ten unhurried minutes is enough"],
        },
        SupportTemplate {
            kind: ChallengeKind::Reflection,
            title: "Week Recap",
            duration_minutes: 10,
            description: "Close the week by writing down what you learned about your focus.",
            instructions: [
                "Summarize the week in three sentences",
                "Name your best session and why it worked",
                "Set one intention for next week",
            ],
            benefits: ["Locks in the week's gains", "Seeds the next week's plan"],
            tips: ["Write it before the rest day starts", "Keep all recaps in one place"],
        },
    ],
];

impl SupportTemplate {
    fn to_challenge(&self, difficulty: u8) -> Challenge {
        Challenge {
            kind: self.kind,
            title: self.title.to_owned(),
            duration_minutes: self.duration_minutes,
            difficulty,
            description: self.description.to_owned(),
            instructions: self.instructions.iter().map(|s| (*s).to_owned()).collect(),
            benefits: self.benefits.iter().map(|s| (*s).to_owned()).collect(),
            tips: self.tips.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Build the focus-session challenge for one training day
fn focus_session(spec: &WeekSpec, day_in_week: usize, difficulty: u8) -> Challenge {
    let cycles = if day_in_week == 5 {
        spec.peak_day_max_cycles
    } else {
        spec.cycles_before_long_break
    };

    Challenge {
        kind: ChallengeKind::FocusSession,
        title: FOCUS_TITLES[day_in_week - 1].to_owned(),
        duration_minutes: spec.work_minutes,
        difficulty,
        description: format!(
            "Complete {cycles} focus cycles of {} minutes with {}-minute breaks.",
            spec.work_minutes, spec.short_break_minutes
        ),
        instructions: vec![
            "Clear your workspace and silence notifications".to_owned(),
            format!("Start a {}-minute timer and work on one task only", spec.work_minutes),
            format!("Take a {}-minute break when the timer ends", spec.short_break_minutes),
            format!(
                "Repeat for {cycles} cycles, then take a {}-minute long break",
                spec.long_break_minutes
            ),
        ],
        benefits: vec![
            "Builds sustained single-task attention".to_owned(),
            "Creates a repeatable daily work rhythm".to_owned(),
        ],
        tips: vec![
            "Write down intrusive thoughts instead of acting on them".to_owned(),
            "Leave your phone in another room".to_owned(),
        ],
    }
}

/// Build one deterministic fallback week
///
/// Same shape as a generated week: days 1-6 train with exactly 3 challenges,
/// day 7 rests. Focus-session durations come from the week-adjusted tier
/// parameters; supporting challenges come from fixed per-day templates.
#[must_use]
pub fn generate_fallback_week(assessment: &AssessmentRecord, week_number: u32) -> WeekResult {
    let week_number = week_number.max(1);
    let (ability, tier) = compute_difficulty(assessment);
    let spec = tier.for_week(week_number, ability);

    let mut days = Vec::with_capacity(7);

    for day_in_week in 1..=TRAINING_DAYS_PER_WEEK {
        let difficulty = day_difficulty(week_number, day_in_week);
        let templates = &SUPPORT_TEMPLATES[day_in_week - 1];

        days.push(TrainingDay {
            day_number: 0, // set by normalize_numbering below
            day_type: DayType::Training,
            challenges: vec![
                focus_session(&spec, day_in_week, difficulty),
                templates[0].to_challenge(difficulty),
                templates[1].to_challenge(difficulty),
            ],
        });
    }

    days.push(TrainingDay {
        day_number: 0,
        day_type: DayType::Rest,
        challenges: Vec::new(),
    });

    let mut week = WeekResult {
        week_number,
        theme: spec.theme,
        days,
    };
    week.normalize_numbering(week_number);
    week
}

/// Build a complete deterministic fallback plan
///
/// # Errors
///
/// Returns `InvalidPlan` if `duration_weeks` is zero.
pub fn generate_fallback_plan(
    assessment: &AssessmentRecord,
    duration_weeks: u32,
) -> Result<Plan, AppError> {
    let weeks = (1..=duration_weeks)
        .map(|week| generate_fallback_week(assessment, week))
        .collect();
    Plan::assemble(weeks)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::repair::validate_week_shape;

    #[test]
    fn test_fallback_week_passes_shape_gate() {
        let week = generate_fallback_week(&AssessmentRecord::default(), 1);
        validate_week_shape(&week).unwrap();
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let record = AssessmentRecord::default();
        let a = generate_fallback_week(&record, 2);
        let b = generate_fallback_week(&record, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_difficulty_progression_within_week() {
        let week = generate_fallback_week(&AssessmentRecord::default(), 1);
        let difficulties: Vec<u8> = week.days[..6]
            .iter()
            .map(|d| d.challenges[0].difficulty)
            .collect();
        // Rises through day 5, then backs off on day 6
        assert_eq!(difficulties, vec![3, 3, 4, 5, 6, 4]);
    }

    #[test]
    fn test_difficulty_base_caps_at_five() {
        assert_eq!(difficulty_base(1), 3);
        assert_eq!(difficulty_base(3), 5);
        assert_eq!(difficulty_base(8), 5);
    }

    #[test]
    fn test_fallback_plan_counts() {
        let plan = generate_fallback_plan(&AssessmentRecord::default(), 4).unwrap();
        assert_eq!(plan.total_weeks, 4);
        assert_eq!(plan.total_days, 28);
        assert_eq!(plan.training_days, 24);
        assert_eq!(plan.rest_days, 4);
    }

    #[test]
    fn test_zero_weeks_fails() {
        assert!(generate_fallback_plan(&AssessmentRecord::default(), 0).is_err());
    }
}
