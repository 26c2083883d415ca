/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use rrsim::config::SimulationConfig;
use rrsim::report::{self, Locale};
use rrsim::simulation::{Outcome, Simulation};

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One line per transition.
    Text,
    /// YAML sequence of log entries.
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Lang {
    En,
    Zh,
}

impl From<Lang> for Locale {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Locale::En,
            Lang::Zh => Locale::Zh,
        }
    }
}

/// Round-robin process scheduler simulation.
///
/// Example:
///   rrsim -c workload.yaml -q 2 --format text --locale zh
#[derive(Debug, Parser)]
#[command(
    name = "rrsim",
    about = "Single-core round-robin scheduler simulation over a shared inventory",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML workload file.  The built-in workload is used when absent.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Override the time quantum (ticks per burst).
    #[arg(short = 'q', long = "quantum")]
    quantum: Option<u32>,

    /// Override the maximum number of scheduling steps.
    #[arg(short = 'm', long = "max-steps")]
    max_steps: Option<u64>,

    /// Output format for the transition log.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Language of state and cause labels in text output.
    #[arg(short = 'l', long = "locale", value_enum, default_value_t = Lang::En)]
    locale: Lang,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Events go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        config    = ?cli.config,
        quantum   = ?cli.quantum,
        max_steps = ?cli.max_steps,
        format    = ?cli.format,
        locale    = ?cli.locale,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // ── Load workload ─────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => {
            warn!("No workload file provided, using the built-in workload");
            SimulationConfig::default_config()
        }
    };
    if let Some(q) = cli.quantum {
        config.quantum = q;
    }
    if let Some(m) = cli.max_steps {
        config.max_steps = m;
    }
    config.validate()?;

    if config.total_supply() < config.total_demand() {
        warn!(
            supply = config.total_supply(),
            demand = config.total_demand(),
            "inventory supply cannot cover total demand, the run will stall"
        );
    }

    // ── Simulate ──────────────────────────────────────────────────────────────
    let mut sim = Simulation::from_config(&config)?;
    let outcome = sim.run();
    let service = sim.into_service();

    // ── Report ────────────────────────────────────────────────────────────────
    let locale = Locale::from(cli.locale);
    match cli.format {
        Format::Text => {
            for line in report::render_log(&service, locale) {
                println!("{line}");
            }
            println!();
            for line in report::summary(&service, locale) {
                println!("{line}");
            }
        }
        Format::Yaml => print!("{}", report::log_to_yaml(&service)?),
    }

    match outcome {
        Outcome::Completed { steps } => {
            info!(steps, time = service.now(), "all processes finished")
        }
        Outcome::Stalled { steps } => warn!(steps, "simulation stalled"),
        Outcome::StepLimit { steps } => warn!(steps, "simulation stopped at the step limit"),
    }

    Ok(())
}
