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

//! A single trial: one room, a fixed set of robots, stepped in lock-step until enough of the room
//! is clean.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::observer::{NoopObserver, TrialObserver};
use crate::robot::{MovementPolicy, Robot};
use crate::room::RectangularRoom;
use crate::{Rng, SimulationError};

/// Parameters of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Room width in tiles.
    pub width: usize,

    /// Room height in tiles.
    pub height: usize,

    /// Number of robots in the room.
    pub num_robots: usize,

    /// Speed of every robot.
    pub speed: f64,

    /// Movement policy of every robot.
    pub policy: MovementPolicy,

    /// The trial ends once at least this fraction of the room is clean.
    pub min_coverage: f64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            num_robots: 1,
            speed: 1.0,
            policy: MovementPolicy::Direct,
            min_coverage: 0.75,
        }
    }
}

impl TrialConfig {
    /// Check every parameter. Fails on the first invalid one.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width == 0 {
            return Err(SimulationError::invalid("width", "must be greater than 0"));
        }
        if self.height == 0 {
            return Err(SimulationError::invalid("height", "must be greater than 0"));
        }
        if self.num_robots == 0 {
            return Err(SimulationError::invalid(
                "num_robots",
                "must be greater than 0",
            ));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SimulationError::invalid(
                "speed",
                format!("must be a positive finite number, got {}", self.speed),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(SimulationError::invalid(
                "min_coverage",
                format!("must be between 0 and 1, got {}", self.min_coverage),
            ));
        }
        Ok(())
    }
}

/// State of one trial in progress.
#[derive(Debug, Clone)]
pub struct Trial {
    room: RectangularRoom,
    robots: Vec<Robot>,
    min_coverage: f64,
    steps: u64,
}

impl Trial {
    /// Build a fresh room and place the robots in it.
    pub fn new(config: &TrialConfig, rng: &mut Rng) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut room = RectangularRoom::new(config.width, config.height)?;
        let robots = (0..config.num_robots)
            .map(|_| Robot::new(&mut room, config.speed, config.policy, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            room,
            robots,
            min_coverage: config.min_coverage,
            steps: 0,
        })
    }

    /// The room being cleaned.
    pub fn room(&self) -> &RectangularRoom {
        &self.room
    }

    /// The robots, in the order they move.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Number of completed rounds.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// True once at least one round has run and the coverage target is met.
    pub fn is_complete(&self) -> bool {
        self.steps > 0 && self.room.coverage() >= self.min_coverage
    }

    /// Move every robot once. One round is one time-step, however many robots there are.
    pub fn round(&mut self, rng: &mut Rng) {
        for robot in &mut self.robots {
            robot.step(&mut self.room, rng);
        }
        self.steps += 1;
    }

    /// Run rounds until the trial is complete and return the number of time-steps taken.
    ///
    /// There is no step limit. A coverage target that the robots can never reach loops forever.
    pub fn run(&mut self, rng: &mut Rng, observer: &mut impl TrialObserver) -> u64 {
        while !self.is_complete() {
            self.round(rng);
            trace!(
                round = self.steps,
                coverage = self.room.coverage(),
                "round complete"
            );
            observer.observe(self.steps, &self.room, &self.robots);
        }
        self.steps
    }
}

/// Run one trial and return the number of time-steps needed to reach the coverage target.
pub fn run_trial(config: &TrialConfig, rng: &mut Rng) -> Result<u64, SimulationError> {
    run_trial_observed(config, rng, &mut NoopObserver)
}

/// Same as [`run_trial`], handing the room and robots to `observer` after every round.
pub fn run_trial_observed(
    config: &TrialConfig,
    rng: &mut Rng,
    observer: &mut impl TrialObserver,
) -> Result<u64, SimulationError> {
    let mut trial = Trial::new(config, rng)?;
    Ok(trial.run(rng, observer))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{RngCore, SeedableRng};

    use super::*;
    use crate::Rng;
    use crate::observer::TraceRecorder;

    fn config(width: usize, height: usize, policy: MovementPolicy, min_coverage: f64) -> TrialConfig {
        TrialConfig {
            width,
            height,
            num_robots: 1,
            speed: 1.0,
            policy,
            min_coverage,
        }
    }

    #[test]
    fn test_single_tile_room_takes_one_step() {
        for policy in MovementPolicy::ALL {
            let mut rng = Rng::seed_from_u64(42);
            let steps = run_trial(&config(1, 1, policy, 1.0), &mut rng).expect("trial");
            assert_eq!(steps, 1, "policy: {}", policy);
        }
    }

    #[test]
    fn test_zero_coverage_target_still_runs_one_round() {
        let mut rng = Rng::seed_from_u64(42);
        let steps =
            run_trial(&config(5, 5, MovementPolicy::Direct, 0.0), &mut rng).expect("trial");
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_same_seed_same_trial() {
        let config = TrialConfig {
            num_robots: 3,
            ..config(8, 6, MovementPolicy::RandomTurn, 0.9)
        };
        let mut rng1 = Rng::seed_from_u64(1234);
        let mut rng2 = Rng::seed_from_u64(1234);
        let mut trial1 = Trial::new(&config, &mut rng1).expect("trial");
        let mut trial2 = Trial::new(&config, &mut rng2).expect("trial");

        let steps1 = trial1.run(&mut rng1, &mut NoopObserver);
        let steps2 = trial2.run(&mut rng2, &mut NoopObserver);

        assert_eq!(steps1, steps2);
        assert_eq!(trial1.room(), trial2.room());
        assert_eq!(trial1.robots(), trial2.robots());
    }

    #[test]
    fn test_trial_stops_once_target_reached() {
        let mut rng = Rng::seed_from_u64(42);
        let mut trial = Trial::new(&config(6, 4, MovementPolicy::Direct, 0.5), &mut rng)
            .expect("trial");
        let steps = trial.run(&mut rng, &mut NoopObserver);
        assert!(steps > 0);
        assert_eq!(trial.steps(), steps);
        assert!(trial.room().coverage() >= 0.5);
        assert!(trial.is_complete());
    }

    #[test]
    fn test_observer_sees_every_round() {
        let mut rng = Rng::seed_from_u64(42);
        let config = TrialConfig {
            num_robots: 2,
            ..config(5, 5, MovementPolicy::Direct, 1.0)
        };
        let mut recorder = TraceRecorder::new();
        let steps = run_trial_observed(&config, &mut rng, &mut recorder).expect("trial");

        let rounds = recorder.rounds();
        assert_eq!(rounds.len() as u64, steps);
        for (i, round) in rounds.iter().enumerate() {
            assert_eq!(round.round, i as u64 + 1);
            assert_eq!(round.robots.len(), 2);
        }
        for pair in rounds.windows(2) {
            assert!(pair[0].coverage <= pair[1].coverage);
        }
        assert_eq!(rounds.last().map(|r| r.cleaned_tiles), Some(25));
    }

    #[test]
    fn test_observer_does_not_change_outcome() {
        let config = config(7, 7, MovementPolicy::RandomTurn, 0.8);
        let mut rng1 = Rng::seed_from_u64(99);
        let mut rng2 = Rng::seed_from_u64(99);
        let plain = run_trial(&config, &mut rng1).expect("trial");
        let observed =
            run_trial_observed(&config, &mut rng2, &mut TraceRecorder::new()).expect("trial");
        assert_eq!(plain, observed);
    }

    #[test]
    fn test_invalid_config_fails_before_using_rng() {
        let invalid = [
            TrialConfig {
                width: 0,
                ..TrialConfig::default()
            },
            TrialConfig {
                height: 0,
                ..TrialConfig::default()
            },
            TrialConfig {
                num_robots: 0,
                ..TrialConfig::default()
            },
            TrialConfig {
                speed: 0.0,
                ..TrialConfig::default()
            },
            TrialConfig {
                min_coverage: 1.5,
                ..TrialConfig::default()
            },
            TrialConfig {
                min_coverage: f64::NAN,
                ..TrialConfig::default()
            },
        ];
        for config in invalid {
            let mut rng = Rng::seed_from_u64(42);
            let mut untouched = rng.clone();
            let result = run_trial(&config, &mut rng);
            assert!(
                matches!(result, Err(SimulationError::InvalidParameter { .. })),
                "config: {:?}",
                config
            );
            assert_eq!(rng.next_u64(), untouched.next_u64());
        }
    }

    proptest! {
        #[test]
        fn test_trial_reaches_target(
            width in 1..6usize,
            height in 1..6usize,
            num_robots in 1..4usize,
            policy in prop_oneof![Just(MovementPolicy::Direct), Just(MovementPolicy::RandomTurn)],
            min_coverage in 0.0..=1.0f64,
            seed in any::<u64>(),
        ) {
            let config = TrialConfig {
                width,
                height,
                num_robots,
                speed: 1.0,
                policy,
                min_coverage,
            };
            let mut rng = Rng::seed_from_u64(seed);
            let mut trial = Trial::new(&config, &mut rng).expect("trial");
            let steps = trial.run(&mut rng, &mut NoopObserver);
            prop_assert!(steps >= 1);
            prop_assert!(trial.room().coverage() >= min_coverage);
            prop_assert!(trial.room().cleaned_tiles() <= trial.room().total_tiles());
        }
    }
}
