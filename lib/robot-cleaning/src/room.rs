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
use crate::{Rng, SimulationError};

/// State of a single tile in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileState {
    /// Not yet visited by any robot.
    Dirty,

    /// Visited at least once. Tiles never become dirty again during a trial.
    Clean,
}

/// A rectangular room containing `width * height` tiles, each either clean or dirty.
///
/// Tile `(m, n)` covers the positions with `m <= x < m + 1` and `n <= y < n + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectangularRoom {
    width: usize,
    height: usize,
    tiles: Vec<TileState>,
    cleaned: usize,
}

// print tiles with the highest row first, so that the output matches the y axis pointing up.
impl std::fmt::Display for RectangularRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for n in (0..self.height).rev() {
            for m in 0..self.width {
                s.push(if self.is_tile_cleaned(m, n) { '#' } else { '.' });
            }
            if n > 0 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

impl RectangularRoom {
    /// Create a new room with every tile dirty.
    pub fn new(width: usize, height: usize) -> Result<Self, SimulationError> {
        if width == 0 {
            return Err(SimulationError::invalid("width", "must be greater than 0"));
        }
        if height == 0 {
            return Err(SimulationError::invalid("height", "must be greater than 0"));
        }
        Ok(Self {
            width,
            height,
            tiles: vec![TileState::Dirty; width * height],
            cleaned: 0,
        })
    }

    /// Width of the room.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the room.
    pub fn height(&self) -> usize {
        self.height
    }

    fn tile_index(&self, pos: &Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let m = pos.x().floor() as usize;
        let n = pos.y().floor() as usize;
        Some(n * self.width + m)
    }

    /// Mark the tile under `pos` as cleaned. Returns true if the tile was dirty before.
    ///
    /// Callers are expected to check [`RectangularRoom::contains`] first. A position outside the
    /// room is ignored and returns false.
    pub fn clean_tile_at(&mut self, pos: &Position) -> bool {
        debug_assert!(self.contains(pos), "cleaning outside the room: {}", pos);
        let Some(index) = self.tile_index(pos) else {
            return false;
        };
        match self.tiles.get_mut(index) {
            Some(tile) if *tile == TileState::Dirty => {
                *tile = TileState::Clean;
                self.cleaned += 1;
                true
            }
            _ => false,
        }
    }

    /// Return the state of tile `(m, n)`, or None if it is not in the room.
    pub fn tile(&self, m: usize, n: usize) -> Option<TileState> {
        if m >= self.width || n >= self.height {
            return None;
        }
        self.tiles.get(n * self.width + m).copied()
    }

    /// Return true if tile `(m, n)` has been cleaned. Tiles outside the room are never clean.
    pub fn is_tile_cleaned(&self, m: usize, n: usize) -> bool {
        self.tile(m, n) == Some(TileState::Clean)
    }

    /// Total number of tiles in the room.
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Number of clean tiles in the room.
    pub fn cleaned_tiles(&self) -> usize {
        self.cleaned
    }

    /// Fraction of tiles that are clean, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        self.cleaned as f64 / self.total_tiles() as f64
    }

    /// Return true if `pos` is inside the room.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.x() >= 0.0
            && pos.y() >= 0.0
            && pos.x() < self.width as f64
            && pos.y() < self.height as f64
    }

    /// Return a random position with whole-number coordinates inside the room.
    pub fn random_position(&self, rng: &mut Rng) -> Position {
        Position::new(
            rng.gen_range(0..self.width) as f64,
            rng.gen_range(0..self.height) as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    use crate::Rng;

    #[test]
    fn test_room_starts_dirty() {
        let room = RectangularRoom::new(4, 3).expect("room");
        assert_eq!(room.total_tiles(), 12);
        assert_eq!(room.cleaned_tiles(), 0);
        assert_abs_diff_eq!(room.coverage(), 0.0);
        for n in 0..3 {
            for m in 0..4 {
                assert!(!room.is_tile_cleaned(m, n), "m: {}, n: {}", m, n);
            }
        }
    }

    #[test]
    fn test_zero_sized_room_is_invalid() {
        assert!(matches!(
            RectangularRoom::new(0, 3),
            Err(SimulationError::InvalidParameter { name: "width", .. })
        ));
        assert!(matches!(
            RectangularRoom::new(3, 0),
            Err(SimulationError::InvalidParameter { name: "height", .. })
        ));
    }

    #[test]
    fn test_clean_tile_uses_floor_of_position() {
        let mut room = RectangularRoom::new(5, 5).expect("room");
        assert!(room.clean_tile_at(&Position::new(2.7, 1.2)));
        assert!(room.is_tile_cleaned(2, 1));
        assert!(!room.is_tile_cleaned(1, 2));
        assert_eq!(room.cleaned_tiles(), 1);
    }

    #[test]
    fn test_cleaning_twice_counts_once() {
        let mut room = RectangularRoom::new(2, 2).expect("room");
        assert!(room.clean_tile_at(&Position::new(0.1, 0.1)));
        assert!(!room.clean_tile_at(&Position::new(0.9, 0.9)));
        assert_eq!(room.cleaned_tiles(), 1);
        assert_abs_diff_eq!(room.coverage(), 0.25);
    }

    #[test]
    fn test_contains_edges() {
        let room = RectangularRoom::new(3, 2).expect("room");
        assert!(room.contains(&Position::new(0.0, 0.0)));
        assert!(room.contains(&Position::new(2.999, 1.999)));
        assert!(!room.contains(&Position::new(3.0, 1.0)));
        assert!(!room.contains(&Position::new(1.0, 2.0)));
        assert!(!room.contains(&Position::new(-0.001, 1.0)));
        assert!(!room.contains(&Position::new(1.0, -0.001)));
    }

    #[test]
    fn test_tile_outside_room_is_none() {
        let room = RectangularRoom::new(3, 2).expect("room");
        assert_eq!(room.tile(3, 0), None);
        assert_eq!(room.tile(0, 2), None);
        assert_eq!(room.tile(2, 1), Some(TileState::Dirty));
        assert!(!room.is_tile_cleaned(10, 10));
    }

    #[test]
    fn test_full_coverage() {
        let mut room = RectangularRoom::new(2, 3).expect("room");
        for n in 0..3 {
            for m in 0..2 {
                room.clean_tile_at(&Position::new(m as f64 + 0.5, n as f64 + 0.5));
            }
        }
        assert_eq!(room.cleaned_tiles(), room.total_tiles());
        assert_abs_diff_eq!(room.coverage(), 1.0);
    }

    #[test]
    fn test_display() {
        let mut room = RectangularRoom::new(3, 2).expect("room");
        room.clean_tile_at(&Position::new(0.5, 0.5));
        room.clean_tile_at(&Position::new(2.5, 1.5));
        assert_eq!(room.to_string(), "..#\n#..");
    }

    proptest! {
        #[test]
        fn test_random_position_is_inside_room(
            width in 1..50usize,
            height in 1..50usize,
            seed in any::<u64>(),
        ) {
            let room = RectangularRoom::new(width, height).expect("room");
            let mut rng = Rng::seed_from_u64(seed);
            for _ in 0..20 {
                let pos = room.random_position(&mut rng);
                prop_assert!(room.contains(&pos));
                prop_assert_eq!(pos.x().fract(), 0.0);
                prop_assert_eq!(pos.y().fract(), 0.0);
            }
        }

        #[test]
        fn test_cleaned_never_exceeds_total(
            width in 1..20usize,
            height in 1..20usize,
            points in prop::collection::vec((0.0..20.0f64, 0.0..20.0f64), 0..100),
        ) {
            let mut room = RectangularRoom::new(width, height).expect("room");
            for (x, y) in points {
                let pos = Position::new(x, y);
                if room.contains(&pos) {
                    room.clean_tile_at(&pos);
                }
                prop_assert!(room.cleaned_tiles() <= room.total_tiles());
                prop_assert!((0.0..=1.0).contains(&room.coverage()));
            }
        }
    }
}
