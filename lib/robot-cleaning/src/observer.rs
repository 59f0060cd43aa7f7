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

//! Read-only views of a running trial, e.g. for a visualization front end.

use serde::{Deserialize, Serialize};

use crate::robot::Robot;
use crate::room::RectangularRoom;

/// Receives the room and the robots after every round of a trial.
///
/// Observers only get shared references, so they cannot change the outcome of a trial.
pub trait TrialObserver {
    /// Called once after round `round` (starting at 1) has finished.
    fn observe(&mut self, round: u64, room: &RectangularRoom, robots: &[Robot]);
}

/// Observer that ignores every round.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrialObserver for NoopObserver {
    fn observe(&mut self, _round: u64, _room: &RectangularRoom, _robots: &[Robot]) {}
}

/// Position and heading of one robot at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    /// X coordinate.
    pub x: f64,

    /// Y coordinate.
    pub y: f64,

    /// Heading in degrees.
    pub heading: f64,
}

impl From<&Robot> for RobotSnapshot {
    fn from(robot: &Robot) -> Self {
        let position = robot.position();
        Self {
            x: position.x(),
            y: position.y(),
            heading: robot.heading(),
        }
    }
}

/// State of a trial at the end of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Round number, starting at 1.
    pub round: u64,

    /// Fraction of the room that is clean.
    pub coverage: f64,

    /// Number of clean tiles.
    pub cleaned_tiles: usize,

    /// Robots, in the order they moved.
    pub robots: Vec<RobotSnapshot>,
}

/// Observer that records a [`RoundSnapshot`] for every round.
#[derive(Debug, Default, Clone)]
pub struct TraceRecorder {
    rounds: Vec<RoundSnapshot>,
}

impl TraceRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded rounds, oldest first.
    pub fn rounds(&self) -> &[RoundSnapshot] {
        &self.rounds
    }

    /// Render the recorded rounds as JSON, one round per line.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for round in &self.rounds {
            out.push_str(&serde_json::to_string(round)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl TrialObserver for TraceRecorder {
    fn observe(&mut self, round: u64, room: &RectangularRoom, robots: &[Robot]) {
        self.rounds.push(RoundSnapshot {
            round,
            coverage: room.coverage(),
            cleaned_tiles: room.cleaned_tiles(),
            robots: robots.iter().map(RobotSnapshot::from).collect(),
        });
    }
}
