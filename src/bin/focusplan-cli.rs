// ABOUTME: Focusplan CLI - generate, analyze, and fallback-build training plans
// ABOUTME: Exercises configuration, logging, and the engine's public API end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Usage:
//! ```bash
//! # Deterministic plan, no backend required
//! focusplan-cli fallback --assessment assessment.json --weeks 4
//!
//! # Full generation pipeline (requires a configured provider)
//! focusplan-cli generate --assessment assessment.json --weeks 4
//!
//! # Advisory analysis of an assessment
//! focusplan-cli analyze --assessment assessment.json
//! ```

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use focusplan::engine::{generate_fallback_plan, AssessmentRecord, PlanEngine};

#[derive(Parser)]
#[command(
    name = "focusplan-cli",
    about = "Focus training plan generation CLI",
    long_about = "Generates Pomodoro-style focus training plans from a self-assessment, \
                  via an AI backend or a deterministic fallback."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a deterministic plan without any generation backend
    Fallback {
        /// Path to the assessment JSON file
        #[arg(long)]
        assessment: PathBuf,
        /// Plan length in weeks
        #[arg(long, default_value_t = 4)]
        weeks: u32,
    },
    /// Run the full generation pipeline against the configured provider
    Generate {
        /// Path to the assessment JSON file
        #[arg(long)]
        assessment: PathBuf,
        /// Plan length in weeks
        #[arg(long, default_value_t = 4)]
        weeks: u32,
    },
    /// Produce an advisory analysis of an assessment
    Analyze {
        /// Path to the assessment JSON file
        #[arg(long)]
        assessment: PathBuf,
    },
}

fn load_assessment(path: &Path) -> Result<AssessmentRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading assessment file {}", path.display()))?;
    let record: AssessmentRecord =
        serde_json::from_str(&raw).context("parsing assessment JSON")?;
    Ok(record)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var(focusplan::logging::LOG_LEVEL_ENV_VAR, "debug");
    }
    focusplan::logging::init_from_env()?;

    match cli.command {
        Command::Fallback { assessment, weeks } => {
            let record = load_assessment(&assessment)?;
            record.validate()?;
            let plan = generate_fallback_plan(&record, weeks)?;
            info!(plan_id = %plan.id, weeks, "fallback plan built");
            print_json(&plan)?;
        }
        Command::Generate { assessment, weeks } => {
            let record = load_assessment(&assessment)?;
            let engine = PlanEngine::from_env()?;
            let plan = engine.generate_training_plan(&record, weeks).await?;
            info!(plan_id = %plan.id, weeks, "plan generated");
            print_json(&plan)?;
        }
        Command::Analyze { assessment } => {
            let record = load_assessment(&assessment)?;
            let engine = PlanEngine::from_env()?;
            let analysis = engine.analyze_assessment(&record).await?;
            print_json(&analysis)?;
        }
    }

    Ok(())
}
