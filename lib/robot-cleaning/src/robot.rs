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

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::room::RectangularRoom;
use crate::{Rng, SimulationError};

/// How a robot chooses where to go on each time-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementPolicy {
    /// Keep moving in the current heading. When the next position would hit a wall, stay put for
    /// this step and pick a new random heading instead.
    Direct,

    /// Pick a new random heading, different from the current one, at every step and then try to
    /// move along it.
    RandomTurn,
}

impl MovementPolicy {
    /// Every policy, in a stable order.
    pub const ALL: [MovementPolicy; 2] = [MovementPolicy::Direct, MovementPolicy::RandomTurn];
}

impl std::fmt::Display for MovementPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementPolicy::Direct => write!(f, "direct"),
            MovementPolicy::RandomTurn => write!(f, "random-turn"),
        }
    }
}

impl std::str::FromStr for MovementPolicy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" | "standard" => Ok(MovementPolicy::Direct),
            "random-turn" | "random_turn" | "random-walk" | "random_walk" => {
                Ok(MovementPolicy::RandomTurn)
            }
            other => Err(SimulationError::invalid(
                "policy",
                format!("unknown movement policy: {}", other),
            )),
        }
    }
}

/// A robot cleaning a room.
///
/// At all times the robot has a position and a heading in the room, and a fixed speed. The robot
/// does not own the room: every operation that needs it borrows it, which lets many robots share
/// one room within a trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    position: Position,
    heading: f64,
    speed: f64,
    policy: MovementPolicy,
}

/// Headings are whole degrees in `[0, 360)`.
fn random_heading(rng: &mut Rng) -> f64 {
    f64::from(rng.gen_range(0..360u16))
}

fn random_heading_other_than(current: f64, rng: &mut Rng) -> f64 {
    loop {
        let heading = random_heading(rng);
        if heading != current {
            return heading;
        }
    }
}

impl Robot {
    /// Place a robot at a random tile of `room` with a random heading. The robot cleans the tile it
    /// starts on.
    pub fn new(
        room: &mut RectangularRoom,
        speed: f64,
        policy: MovementPolicy,
        rng: &mut Rng,
    ) -> Result<Self, SimulationError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SimulationError::invalid(
                "speed",
                format!("must be a positive finite number, got {}", speed),
            ));
        }
        let position = room.random_position(rng);
        let heading = random_heading(rng);
        room.clean_tile_at(&position);
        Ok(Self {
            position,
            heading,
            speed,
            policy,
        })
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current heading in degrees, `0 <= heading < 360`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Distance covered in one time-step.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Movement policy.
    pub fn policy(&self) -> MovementPolicy {
        self.policy
    }

    /// Simulate the passage of a single time-step: move according to the movement policy and clean
    /// the tile the robot lands on.
    pub fn step(&mut self, room: &mut RectangularRoom, rng: &mut Rng) {
        match self.policy {
            MovementPolicy::Direct => self.step_direct(room, rng),
            MovementPolicy::RandomTurn => self.step_random_turn(room, rng),
        }
    }

    // a wall hit costs the whole step: turn in place, try moving again next step.
    fn step_direct(&mut self, room: &mut RectangularRoom, rng: &mut Rng) {
        let candidate = self.position.advance(self.heading, self.speed);
        if room.contains(&candidate) {
            self.position = candidate;
            room.clean_tile_at(&candidate);
        } else {
            self.heading = random_heading_other_than(self.heading, rng);
        }
    }

    fn step_random_turn(&mut self, room: &mut RectangularRoom, rng: &mut Rng) {
        self.heading = random_heading_other_than(self.heading, rng);
        let candidate = self.position.advance(self.heading, self.speed);
        if room.contains(&candidate) {
            self.position = candidate;
            room.clean_tile_at(&candidate);
        }
    }
}
