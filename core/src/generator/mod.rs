use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy used to lay out the mines once the first cell to open is known.
///
/// Consumed on use: a game places its mines exactly once.
pub trait MinePlacer {
    fn place(self, config: &GameConfig, safe: Coord2) -> MineLayout;
}
