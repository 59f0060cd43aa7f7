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

//! Monte Carlo experiments: many independent trials of the same configuration, summarized by the
//! mean number of time-steps.
//!
//! Trial `i` of an experiment always runs on a generator seeded with `seed + i`. Trials share no
//! state, so they can run on a thread pool and still produce exactly the same report as a
//! sequential run.

use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::robot::MovementPolicy;
use crate::trial::{run_trial, TrialConfig};
use crate::{Rng, SimulationError};

/// Parameters of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of independent trials.
    pub trials: usize,

    /// Configuration shared by every trial.
    pub trial: TrialConfig,

    /// Base seed. Trial `i` uses `seed + i`.
    pub seed: u64,

    /// Run trials on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials: 30,
            trial: TrialConfig::default(),
            seed: 9000,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Check every parameter, including the trial configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::invalid("trials", "must be greater than 0"));
        }
        self.trial.validate()
    }

    /// Seed used by trial number `trial`.
    pub fn trial_seed(&self, trial: usize) -> u64 {
        self.seed.wrapping_add(trial as u64)
    }

    fn with_policy(&self, policy: MovementPolicy) -> Self {
        Self {
            trial: TrialConfig {
                policy,
                ..self.trial
            },
            ..*self
        }
    }

    fn with_num_robots(&self, num_robots: usize) -> Self {
        Self {
            trial: TrialConfig {
                num_robots,
                ..self.trial
            },
            ..*self
        }
    }
}

/// Outcome of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Configuration the experiment ran with.
    pub config: ExperimentConfig,

    /// Time-steps taken by each trial, in trial order.
    pub steps: Vec<u64>,

    /// Mean time-steps over all trials.
    pub mean: f64,

    /// Population standard deviation of the time-steps.
    pub std_dev: f64,

    /// Fewest time-steps of any trial.
    pub min: u64,

    /// Most time-steps of any trial.
    pub max: u64,
}

impl ExperimentReport {
    fn from_steps(config: ExperimentConfig, steps: Vec<u64>) -> Self {
        let n = steps.len().max(1) as f64;
        let mean = steps.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = steps
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Self {
            config,
            min: steps.iter().copied().min().unwrap_or(0),
            max: steps.iter().copied().max().unwrap_or(0),
            steps,
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

fn run_seeded_trial(config: &ExperimentConfig, trial: usize) -> Result<u64, SimulationError> {
    let seed = config.trial_seed(trial);
    let mut rng = Rng::seed_from_u64(seed);
    let steps = run_trial(&config.trial, &mut rng)?;
    debug!(trial, seed, steps, "trial complete");
    Ok(steps)
}

/// Run every trial of an experiment and summarize the results.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport, SimulationError> {
    config.validate()?;

    let steps = if config.parallel {
        (0..config.trials)
            .into_par_iter()
            .map(|trial| run_seeded_trial(config, trial))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        (0..config.trials)
            .map(|trial| run_seeded_trial(config, trial))
            .collect::<Result<Vec<_>, _>>()?
    };

    let report = ExperimentReport::from_steps(*config, steps);
    info!(
        trials = config.trials,
        policy = %config.trial.policy,
        num_robots = config.trial.num_robots,
        mean = report.mean,
        "experiment complete"
    );
    Ok(report)
}

/// Mean number of time-steps needed to clean `min_coverage` of the room, over all trials.
pub fn mean_steps(config: &ExperimentConfig) -> Result<f64, SimulationError> {
    Ok(run_experiment(config)?.mean)
}

/// Run the same experiment once per movement policy, in [`MovementPolicy::ALL`] order.
pub fn compare_policies(
    config: &ExperimentConfig,
) -> Result<Vec<ExperimentReport>, SimulationError> {
    config.validate()?;
    MovementPolicy::ALL
        .iter()
        .map(|&policy| run_experiment(&config.with_policy(policy)))
        .collect()
}

/// Run the same experiment once per robot count. Every count is validated before the first
/// experiment starts.
pub fn sweep_robot_counts(
    config: &ExperimentConfig,
    robot_counts: &[usize],
) -> Result<Vec<ExperimentReport>, SimulationError> {
    if robot_counts.is_empty() {
        return Err(SimulationError::invalid(
            "robot_counts",
            "at least one robot count is required",
        ));
    }
    let configs = robot_counts
        .iter()
        .map(|&num_robots| config.with_num_robots(num_robots))
        .collect::<Vec<_>>();
    for config in &configs {
        config.validate()?;
    }
    configs.iter().map(run_experiment).collect()
}
