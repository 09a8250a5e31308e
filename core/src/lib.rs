#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use scores::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod generator;
mod scores;
mod session;
mod timer;
mod types;

/// Where the mines are, decided once per game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn empty(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Self {
        let mut layout = Self::empty(size);
        for &coords in mine_coords {
            if layout.in_bounds(coords) {
                layout.set_mine(coords);
            }
        }
        layout
    }

    pub fn size(&self) -> Coord2 {
        self.mine_mask.shape2()
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        self.mine_mask.in_grid(coords)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.in_bounds(coords) && self[coords]
    }

    pub fn mine_coords(&self) -> Vec<Coord2> {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub(crate) fn set_mine(&mut self, coords: Coord2) {
        let slot = &mut self.mine_mask[coords.to_nd_index()];
        if !*slot {
            *slot = true;
            self.mine_count += 1;
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The call was ignored: out of range, flagged, already revealed, or game over.
    NoChange,
    Continue,
    Lost,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Continue => true,
            Lost => true,
            Won => true,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

/// Signals for the collaborators around the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// First reveal of the game, the clock should start.
    StartTiming,
    /// Game ended, the clock should stop.
    StopTiming,
    /// A ranked game was won, the current elapsed time should be recorded.
    RecordScore(Difficulty),
}

/// Everything a single reveal changed, in the order it changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealResult {
    pub outcome: RevealOutcome,
    pub changed: Vec<Coord2>,
    pub events: Vec<EngineEvent>,
}

impl RevealResult {
    pub(crate) fn no_change() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            changed: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }
}
