use alloc::vec::Vec;

use super::*;

/// Places mines at predetermined coordinates, used for replays and scenario tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedMinePlacer {
    mines: Vec<Coord2>,
}

impl FixedMinePlacer {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinePlacer for FixedMinePlacer {
    fn place(self, config: &GameConfig, safe: Coord2) -> MineLayout {
        let mut layout = MineLayout::empty(config.size());
        for coords in self.mines {
            if coords == safe {
                log::warn!("Dropping fixed mine at {:?}, it is the first opened cell", coords);
                continue;
            }
            if !layout.in_bounds(coords) {
                log::warn!("Dropping fixed mine at {:?}, outside the board", coords);
                continue;
            }
            layout.set_mine(coords);
        }
        if layout.mine_count() != config.mines {
            log::warn!(
                "Fixed layout has {} mines, config asked for {}",
                layout.mine_count(),
                config.mines
            );
        }
        layout
    }
}
