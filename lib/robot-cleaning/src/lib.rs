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

#![warn(missing_docs)]

//! Robot cleaning simulation.
//!
//! Robots move through a rectangular room in continuous space and clean the tile under them. A
//! trial runs until some fraction of the room is clean, and an experiment averages the number of
//! time-steps over many independent trials.
//!
//! All randomness comes from an explicitly passed [`Rng`], so the same seed always reproduces the
//! same trajectories and step counts.

pub mod experiment;
pub mod observer;
pub mod position;
pub mod robot;
pub mod room;
pub mod trial;

pub use experiment::{
    compare_policies, mean_steps, run_experiment, sweep_robot_counts, ExperimentConfig,
    ExperimentReport,
};
pub use observer::{NoopObserver, RobotSnapshot, RoundSnapshot, TraceRecorder, TrialObserver};
pub use position::Position;
pub use robot::{MovementPolicy, Robot};
pub use room::RectangularRoom;
pub use trial::{run_trial, run_trial_observed, Trial, TrialConfig};

/// Random number generator used throughout the simulation.
pub type Rng = rand_pcg::Pcg64;

/// Simulation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A parameter is outside of its valid range. Raised before any simulation work starts.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,

        /// Why the value was rejected.
        reason: String,
    },
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
