use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Purely random placement that only guarantees the first opened cell is safe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(self, config: &GameConfig, safe: Coord2) -> MineLayout {
        let size = config.size();
        let mut layout = MineLayout::empty(size);
        let total_cells = usize::from(config.total_cells());
        if total_cells == 0 {
            return layout;
        }

        // every cell but the safe one is a candidate
        let free_cells = total_cells - 1;
        let mut mines = usize::from(config.mines);
        if mines > free_cells {
            log::warn!(
                "Cannot fit {} mines next to a safe start, placing {} instead",
                mines,
                free_cells
            );
            mines = free_cells;
        }

        let safe_index = usize::from(safe.0) * usize::from(size.1) + usize::from(safe.1);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for candidate in index::sample(&mut rng, free_cells, mines) {
            // candidates skip over the safe index
            let cell_index = if candidate >= safe_index {
                candidate + 1
            } else {
                candidate
            };
            let row = cell_index / usize::from(size.1);
            let col = cell_index % usize::from(size.1);
            layout.set_mine((row as Coord, col as Coord));
        }

        log::debug!(
            "Placed {} mines with seed {}, safe start at {:?}",
            layout.mine_count(),
            self.seed,
            safe
        );
        layout
    }
}
