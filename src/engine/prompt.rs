// ABOUTME: Deterministic prompt construction for week generation and analysis
// ABOUTME: Intentionally verbose - redundancy keeps the malformed-output rate down
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Prompt Builder
//!
//! Pure string construction: assessment scores, computed difficulty
//! parameters, a day-by-day progression template, two fully worked example
//! days, and an explicit rule list. The redundancy is deliberate - the
//! worked examples and repeated rules measurably reduce malformed backend
//! output, so this module stays verbose on purpose. No network, no
//! randomness.

use std::fmt::Write as _;

use super::assessment::AssessmentRecord;
use super::difficulty::{TierParams, WeekSpec};

/// System prompt sent with every generation request
pub const SYSTEM_PROMPT: &str = include_str!("prompts/plan_system.md");

/// Worked example of an easy training day, embedded verbatim in the prompt
const EXAMPLE_EASY_DAY: &str = r#"{
  "dayNumber": 1,
  "type": "training",
  "challenges": [
    {
      "type": "focus_session",
      "title": "Opening Focus Block",
      "duration": 15,
      "difficulty": 3,
      "description": "Complete 2 focus cycles of 15 minutes with 5-minute breaks.",
      "instructions": [
        "Clear your workspace and silence notifications",
        "Start a 15-minute timer and work on one task only",
        "Take a 5-minute break when the timer ends"
      ],
      "benefits": ["Builds sustained single-task attention"],
      "tips": ["Leave your phone in another room"]
    },
    {
      "type": "breathing",
      "title": "Box Breathing Warm-Up",
      "duration": 5,
      "difficulty": 3,
      "description": "Settle your nervous system before the first focus session.",
      "instructions": [
        "Sit upright and close your eyes",
        "Inhale 4 counts, hold 4, exhale 4, hold 4",
        "Repeat the cycle until the timer ends"
      ],
      "benefits": ["Lowers pre-session restlessness"],
      "tips": ["Keep shoulders relaxed"]
    },
    {
      "type": "reflection",
      "title": "Intention Journal",
      "duration": 5,
      "difficulty": 3,
      "description": "Write down what you want from this week of training.",
      "instructions": [
        "Note one concrete goal for the week",
        "List the two distractions most likely to derail you",
        "Write one sentence on how you will handle each"
      ],
      "benefits": ["Clarifies purpose"],
      "tips": ["Short and honest beats long and vague"]
    }
  ]
}"#;

/// Worked example of a peak training day
const EXAMPLE_PEAK_DAY: &str = r#"{
  "dayNumber": 5,
  "type": "training",
  "challenges": [
    {
      "type": "focus_session",
      "title": "Peak Focus Block",
      "duration": 20,
      "difficulty": 6,
      "description": "Complete 4 focus cycles of 20 minutes with 5-minute breaks.",
      "instructions": [
        "Pick your hardest task of the week",
        "Start a 20-minute timer and work on it without switching",
        "Take a 5-minute break when the timer ends",
        "Repeat for 4 cycles, then take a 15-minute long break"
      ],
      "benefits": ["Pushes your sustained-attention ceiling"],
      "tips": ["Schedule this for your best hour of the day"]
    },
    {
      "type": "mindfulness",
      "title": "Body Scan",
      "duration": 10,
      "difficulty": 6,
      "description": "Move attention slowly through the body to anchor it.",
      "instructions": [
        "Lie down or sit comfortably",
        "Move attention from feet to head, one region at a time",
        "Note sensations without changing anything"
      ],
      "benefits": ["Deepens sustained attention"],
      "tips": ["Slower is better"]
    },
    {
      "type": "reflection",
      "title": "Progress Review",
      "duration": 10,
      "difficulty": 6,
      "description": "Compare this week's sessions against your day-one intention.",
      "instructions": [
        "Reread your intention journal entry",
        "Note what got easier and what still breaks your focus",
        "Write one adjustment for the final training day"
      ],
      "benefits": ["Consolidates learning"],
      "tips": ["Look for patterns, not verdicts"]
    }
  ]
}"#;

/// Build the user prompt for one week's generation call
///
/// Deterministic: identical inputs always produce the identical string.
#[must_use]
pub fn build_week_prompt(
    assessment: &AssessmentRecord,
    ability_score: f64,
    tier: &TierParams,
    spec: &WeekSpec,
) -> String {
    let levels = assessment.normalized_levels();
    let mut prompt = String::with_capacity(4096);

    // Writing to a String cannot fail
    let _ = write!(
        prompt,
        "Generate week {week} of a focus-training plan as one JSON object.\n\n\
         ## User assessment\n\
         - focus level: {focus:.1}/10\n\
         - distraction level: {distraction:.1}/10\n\
         - motivation level: {motivation:.1}/10\n\
         - energy level: {energy:.1}/10\n\
         - stress level: {stress:.1}/10\n\
         - primary goal: {goal}\n\
         - experience: {experience}\n\
         - available minutes per day: {available}\n\
         - computed ability score: {ability:.2}/10\n\n\
         ## Difficulty parameters (tier {tier_index}: {label})\n\
         - base focus session length: {base_work} minutes\n\
         - THIS WEEK'S focus session length: {work} minutes (use this value)\n\
         - short break: {short} minutes\n\
         - long break: {long} minutes\n\
         - cycles before a long break: {cycles}\n\
         - maximum cycles on the peak day (day 5): {peak}\n\n\
         ## Week shape\n\
         - weekNumber: {week}\n\
         - theme: \"{theme}\"\n\
         - 7 days total: days 1-6 are training days, day 7 is a rest day\n\
         - every training day has exactly 3 challenges, the rest day has none\n\
         - day 1-2: ease in at the week's base difficulty\n\
         - day 3-4: raise difficulty by one step each day\n\
         - day 5: peak day, hardest session of the week, up to {peak} cycles\n\
         - day 6: lighter consolidation day, difficulty drops below day 5\n\
         - day 7: rest day, type \"rest\", \"challenges\": []\n",
        week = spec.week_number,
        focus = levels.focus,
        distraction = levels.distraction,
        motivation = levels.motivation,
        energy = levels.energy,
        stress = levels.stress,
        goal = assessment.primary_goal,
        experience = assessment.experience_level,
        available = assessment.available_minutes_per_day,
        ability = ability_score,
        tier_index = tier.tier,
        label = tier.label,
        base_work = tier.work_minutes,
        work = spec.work_minutes,
        short = spec.short_break_minutes,
        long = spec.long_break_minutes,
        cycles = spec.cycles_before_long_break,
        peak = spec.peak_day_max_cycles,
        theme = spec.theme,
    );

    if !assessment.distraction_tags.is_empty() {
        let _ = write!(
            prompt,
            "\nThe user struggles most with: {}. Address these in tips where natural.\n",
            assessment.distraction_tags.join(", ")
        );
    }

    let _ = write!(
        prompt,
        "\n## Example of an easy training day (day 1)\n{EXAMPLE_EASY_DAY}\n\n\
         ## Example of a peak training day (day 5)\n{EXAMPLE_PEAK_DAY}\n\n\
         ## Rules (follow every one)\n\
         1. Output ONE raw JSON object: {{\"weekNumber\": {week}, \"theme\": \"{theme}\", \"days\": [...]}}.\n\
         2. No markdown, no code fences, no text before or after the JSON.\n\
         3. Exactly 7 entries in \"days\"; exactly 3 challenges on each training day.\n\
         4. Every training day includes exactly one focus_session challenge using\n\
            the {work}-minute session length given above.\n\
         5. Challenge types are only: focus_session, breathing, mindfulness,\n\
            reflection, stretching.\n\
         6. difficulty is an integer 1-10; it must not decrease from day 1 to\n\
            day 5 and must not increase on day 6.\n\
         7. duration is a positive integer number of minutes.\n\
         8. instructions has 3-4 short imperative steps per challenge.\n\
         9. Plain ASCII only: no accented letters, no smart quotes, no em\n\
            dashes, no ellipsis characters.\n\
         10. No trailing commas. Every object key is double-quoted camelCase.\n",
        week = spec.week_number,
        theme = spec.theme,
        work = spec.work_minutes,
    );

    prompt
}

/// Build the user prompt for the single-call advisory analysis
#[must_use]
pub fn build_analysis_prompt(
    assessment: &AssessmentRecord,
    ability_score: f64,
    tier: &TierParams,
) -> String {
    let levels = assessment.normalized_levels();
    let mut prompt = String::with_capacity(1024);

    let _ = write!(
        prompt,
        "Analyze this focus-training self-assessment and respond with one raw\n\
         JSON object, no markdown, shaped exactly as:\n\
         {{\"analysis\": \"...\", \"recommendations\": [\"...\", \"...\", \"...\"]}}\n\n\
         Assessment:\n\
         - focus level: {focus:.1}/10\n\
         - distraction level: {distraction:.1}/10\n\
         - motivation level: {motivation:.1}/10\n\
         - energy level: {energy:.1}/10\n\
         - stress level: {stress:.1}/10\n\
         - primary goal: {goal}\n\
         - experience: {experience}\n\
         - computed ability score: {ability:.2}/10 (tier {tier_index}: {label})\n\n\
         Rules: \"analysis\" is 2-4 sentences addressed to the user in second\n\
         person. \"recommendations\" is 3-5 short actionable items. Plain ASCII\n\
         only. No trailing commas.",
        focus = levels.focus,
        distraction = levels.distraction,
        motivation = levels.motivation,
        energy = levels.energy,
        stress = levels.stress,
        goal = assessment.primary_goal,
        experience = assessment.experience_level,
        ability = ability_score,
        tier_index = tier.tier,
        label = tier.label,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::difficulty::compute_difficulty;

    #[test]
    fn test_week_prompt_is_deterministic() {
        let record = AssessmentRecord::default();
        let (ability, tier) = compute_difficulty(&record);
        let spec = tier.for_week(2, ability);
        let a = build_week_prompt(&record, ability, &tier, &spec);
        let b = build_week_prompt(&record, ability, &tier, &spec);
        assert_eq!(a, b);
    }

    #[test]
    fn test_week_prompt_embeds_adjusted_minutes() {
        let record = AssessmentRecord::default();
        let (ability, tier) = compute_difficulty(&record);
        let spec = tier.for_week(3, ability);
        let prompt = build_week_prompt(&record, ability, &tier, &spec);
        assert!(prompt.contains(&format!(
            "THIS WEEK'S focus session length: {} minutes",
            spec.work_minutes
        )));
        assert!(prompt.contains("\"weekNumber\": 3"));
    }

    #[test]
    fn test_week_prompt_contains_worked_examples_and_rules() {
        let record = AssessmentRecord::default();
        let (ability, tier) = compute_difficulty(&record);
        let spec = tier.for_week(1, ability);
        let prompt = build_week_prompt(&record, ability, &tier, &spec);
        assert!(prompt.contains("Opening Focus Block"));
        assert!(prompt.contains("Peak Focus Block"));
        assert!(prompt.contains("No trailing commas"));
    }

    #[test]
    fn test_system_prompt_is_embedded() {
        assert!(SYSTEM_PROMPT.contains("RAW JSON only"));
    }

    #[test]
    fn test_analysis_prompt_mentions_tier_label() {
        let record = AssessmentRecord::default();
        let (ability, tier) = compute_difficulty(&record);
        let prompt = build_analysis_prompt(&record, ability, &tier);
        assert!(prompt.contains(tier.label));
    }
}
