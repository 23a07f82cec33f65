// ABOUTME: Ability score computation and difficulty tier selection
// ABOUTME: Pure, deterministic mapping from an assessment to Pomodoro parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Difficulty Model
//!
//! Maps an [`AssessmentRecord`] to a scalar ability score and a discrete
//! parameter bundle. Everything here is a pure function of its inputs: no
//! I/O, no randomness, no clock. Tests rely on exact tier boundaries, so the
//! breakpoints use `<=` comparisons and ties resolve to the lower tier.
//!
//! Ability score is a fixed-weight linear combination:
//!
//! ```text
//! 0.4*focus + 0.2*energy + 0.15*motivation + 0.15*(10-distraction) + 0.10*(10-stress)
//! ```

use serde::{Deserialize, Serialize};

use super::assessment::AssessmentRecord;

/// Weight of the focus level in the ability score
const FOCUS_WEIGHT: f64 = 0.4;
/// Weight of the energy level
const ENERGY_WEIGHT: f64 = 0.2;
/// Weight of the motivation level
const MOTIVATION_WEIGHT: f64 = 0.15;
/// Weight of the inverted distraction level
const DISTRACTION_WEIGHT: f64 = 0.15;
/// Weight of the inverted stress level
const STRESS_WEIGHT: f64 = 0.10;

/// Tier breakpoints; a score less than or equal to breakpoint `i` selects
/// tier `i + 1`. Scores above the last breakpoint select tier 6.
const TIER_BREAKPOINTS: [f64; 5] = [3.0, 4.5, 6.0, 7.5, 8.5];

/// Weekly work-minute increment for low-ability users
const LOW_ABILITY_INCREMENT: u32 = 3;
/// Weekly work-minute increment for higher-ability users
const HIGH_ABILITY_INCREMENT: u32 = 5;
/// Ability score at or below which the gentler weekly increment applies
const INCREMENT_ABILITY_CUTOFF: f64 = 5.0;

/// Fixed weekly theme labels; weeks past the table reuse the last theme
const WEEK_THEMES: [&str; 8] = [
    "Getting Started",
    "Building Rhythm",
    "Deep Focus",
    "Sustained Attention",
    "Peak Performance",
    "Consistency",
    "Resilience",
    "Mastery",
];

/// Parameter bundle for one difficulty tier
///
/// Monotonic across tiers: a higher tier never carries lower work minutes or
/// cycle counts than a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierParams {
    /// Tier index, 1-6
    pub tier: u8,
    /// Human-readable tier label for prompts and diagnostics
    pub label: &'static str,
    /// Base focus-session length in minutes
    pub work_minutes: u32,
    /// Short break between cycles in minutes
    pub short_break_minutes: u32,
    /// Long break after a full cycle group in minutes
    pub long_break_minutes: u32,
    /// Cycles before a long break
    pub cycles_before_long_break: u32,
    /// Maximum cycles on the peak day
    pub peak_day_max_cycles: u32,
}

/// The six tiers, ordered; index 0 is tier 1
const TIERS: [TierParams; 6] = [
    TierParams {
        tier: 1,
        label: "Foundation",
        work_minutes: 10,
        short_break_minutes: 5,
        long_break_minutes: 15,
        cycles_before_long_break: 2,
        peak_day_max_cycles: 3,
    },
    TierParams {
        tier: 2,
        label: "Building",
        work_minutes: 15,
        short_break_minutes: 5,
        long_break_minutes: 15,
        cycles_before_long_break: 3,
        peak_day_max_cycles: 3,
    },
    TierParams {
        tier: 3,
        label: "Developing",
        work_minutes: 20,
        short_break_minutes: 5,
        long_break_minutes: 15,
        cycles_before_long_break: 3,
        peak_day_max_cycles: 4,
    },
    TierParams {
        tier: 4,
        label: "Established",
        work_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 20,
        cycles_before_long_break: 4,
        peak_day_max_cycles: 4,
    },
    TierParams {
        tier: 5,
        label: "Advanced",
        work_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 20,
        cycles_before_long_break: 4,
        peak_day_max_cycles: 5,
    },
    TierParams {
        tier: 6,
        label: "Elite",
        work_minutes: 30,
        short_break_minutes: 5,
        long_break_minutes: 20,
        cycles_before_long_break: 4,
        peak_day_max_cycles: 5,
    },
];

/// Tier parameters adjusted for one week's position in the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSpec {
    /// Week number, 1-indexed
    pub week_number: u32,
    /// Theme label for the week
    pub theme: String,
    /// Week-adjusted focus-session length in minutes
    pub work_minutes: u32,
    /// Short break in minutes (unadjusted)
    pub short_break_minutes: u32,
    /// Long break in minutes (unadjusted)
    pub long_break_minutes: u32,
    /// Cycles before a long break
    pub cycles_before_long_break: u32,
    /// Maximum cycles on the peak day
    pub peak_day_max_cycles: u32,
}

/// Compute the ability score and tier parameters for an assessment
///
/// Total and deterministic: out-of-range inputs clamp during normalization,
/// missing optional levels take their defaults, and identical assessments
/// always produce identical output.
#[must_use]
pub fn compute_difficulty(assessment: &AssessmentRecord) -> (f64, TierParams) {
    let levels = assessment.normalized_levels();

    let score = levels
        .focus
        .mul_add(FOCUS_WEIGHT, levels.energy * ENERGY_WEIGHT)
        + levels.motivation * MOTIVATION_WEIGHT
        + (10.0 - levels.distraction) * DISTRACTION_WEIGHT
        + (10.0 - levels.stress) * STRESS_WEIGHT;

    let score = score.clamp(1.0, 10.0);

    (score, tier_for_score(score))
}

/// Select the tier for an ability score
///
/// Ties at exact breakpoint values resolve to the lower tier.
#[must_use]
pub fn tier_for_score(score: f64) -> TierParams {
    for (index, breakpoint) in TIER_BREAKPOINTS.iter().enumerate() {
        if score <= *breakpoint {
            return TIERS[index];
        }
    }
    TIERS[TIERS.len() - 1]
}

/// Weekly work-minute increment for an ability score
#[must_use]
pub fn weekly_increment(ability_score: f64) -> u32 {
    if ability_score <= INCREMENT_ABILITY_CUTOFF {
        LOW_ABILITY_INCREMENT
    } else {
        HIGH_ABILITY_INCREMENT
    }
}

/// Theme label for a week number
#[must_use]
pub fn week_theme(week_number: u32) -> &'static str {
    let index = (week_number.max(1) as usize - 1).min(WEEK_THEMES.len() - 1);
    WEEK_THEMES[index]
}

impl TierParams {
    /// Build the parameter set for one week's position in the plan
    ///
    /// Work minutes grow by the ability-dependent increment each week; break
    /// structure stays fixed within a plan.
    #[must_use]
    pub fn for_week(&self, week_number: u32, ability_score: f64) -> WeekSpec {
        let week = week_number.max(1);
        let adjusted = self.work_minutes + (week - 1) * weekly_increment(ability_score);

        WeekSpec {
            week_number: week,
            theme: week_theme(week).to_owned(),
            work_minutes: adjusted,
            short_break_minutes: self.short_break_minutes,
            long_break_minutes: self.long_break_minutes,
            cycles_before_long_break: self.cycles_before_long_break,
            peak_day_max_cycles: self.peak_day_max_cycles,
        }
    }
}
