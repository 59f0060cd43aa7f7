/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Robot cleaning simulation CLI.
//!
//! Commands:
//! - run: mean cleaning time for one configuration
//! - compare: the same configuration with every movement policy
//! - sweep: the same configuration with several robot counts
//! - trace: one trial, recording every round as JSON lines

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use robot_cleaning::{
    compare_policies, run_experiment, sweep_robot_counts, ExperimentConfig, ExperimentReport,
    MovementPolicy, Rng, TraceRecorder, Trial, TrialConfig,
};

#[derive(Parser)]
#[command(name = "robot-cleaning-sim")]
#[command(version)]
#[command(about = "Simulate robots cleaning a rectangular room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct RoomArgs {
    /// Room width in tiles
    #[arg(long, default_value = "10")]
    width: usize,

    /// Room height in tiles
    #[arg(long, default_value = "10")]
    height: usize,

    /// Number of robots
    #[arg(long, default_value = "1")]
    robots: usize,

    /// Robot speed, in tiles per time-step
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Movement policy: direct or random-turn
    #[arg(long, default_value = "direct")]
    policy: MovementPolicy,

    /// Fraction of the room that must be clean, between 0 and 1
    #[arg(long, default_value = "0.75")]
    coverage: f64,

    /// Random seed
    #[arg(long, default_value = "9000")]
    seed: u64,
}

impl RoomArgs {
    fn trial_config(&self) -> TrialConfig {
        TrialConfig {
            width: self.width,
            height: self.height,
            num_robots: self.robots,
            speed: self.speed,
            policy: self.policy,
            min_coverage: self.coverage,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct ExperimentArgs {
    #[command(flatten)]
    room: RoomArgs,

    /// Number of trials
    #[arg(long, default_value = "30")]
    trials: usize,

    /// Run trials in parallel
    #[arg(long)]
    parallel: bool,

    /// Print full reports as JSON
    #[arg(long)]
    json: bool,
}

impl ExperimentArgs {
    fn experiment_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            trials: self.trials,
            trial: self.room.trial_config(),
            seed: self.room.seed,
            parallel: self.parallel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mean cleaning time for one configuration
    Run {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },

    /// Mean cleaning time for every movement policy
    Compare {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },

    /// Mean cleaning time for several robot counts
    Sweep {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Robot counts to test (comma-separated). Overrides --robots.
        #[arg(long = "counts", default_value = "1,2,3,4,5,6,7,8,9,10", value_delimiter = ',')]
        counts: Vec<usize>,
    },

    /// Run a single trial and record every round
    Trace {
        #[command(flatten)]
        room: RoomArgs,

        /// Output file for the JSON lines trace. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn print_reports(reports: &[ExperimentReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }
    for report in reports {
        let trial = &report.config.trial;
        println!(
            "{} robot(s), {}, {}x{} room, {:.0}% coverage: {:.1} time-steps (std dev {:.1}, min {}, max {}, {} trials)",
            trial.num_robots,
            trial.policy,
            trial.width,
            trial.height,
            trial.min_coverage * 100.0,
            report.mean,
            report.std_dev,
            report.min,
            report.max,
            report.config.trials,
        );
    }
    Ok(())
}

fn trace(room: &RoomArgs, output: Option<PathBuf>) -> Result<()> {
    let config = room.trial_config();
    let mut rng = Rng::seed_from_u64(room.seed);
    let mut recorder = TraceRecorder::new();

    // keep the trial around so the final room can be printed.
    let mut trial = Trial::new(&config, &mut rng)?;
    let steps = trial.run(&mut rng, &mut recorder);
    info!(steps, "trace complete");

    let lines = recorder.to_json_lines()?;
    match output {
        Some(path) => {
            std::fs::write(&path, lines)
                .with_context(|| format!("failed to write trace to {}", path.display()))?;
            println!("{}", trial.room());
            println!("{} time-steps, trace written to {}", steps, path.display());
        }
        None => print!("{}", lines),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Run { experiment } => {
            let report = run_experiment(&experiment.experiment_config())?;
            print_reports(&[report], experiment.json)?;
        }
        Commands::Compare { experiment } => {
            let reports = compare_policies(&experiment.experiment_config())?;
            print_reports(&reports, experiment.json)?;
        }
        Commands::Sweep { experiment, counts } => {
            let reports = sweep_robot_counts(&experiment.experiment_config(), &counts)?;
            print_reports(&reports, experiment.json)?;
        }
        Commands::Trace { room, output } => trace(&room, output)?,
    }
    Ok(())
}
