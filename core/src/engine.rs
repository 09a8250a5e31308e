use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress, on the first reveal
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// A first reveal that clears the whole board passes through InProgress within the same call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from creation to win or loss.
///
/// Mines are placed lazily by the first [`reveal`](Self::reveal), which is therefore always
/// safe. Calls that break a precondition (out of range, game over, revealing a flagged cell,
/// flagging a revealed one) are ignored rather than reported.
#[derive(Clone, Debug)]
pub struct BoardEngine<P: MinePlacer = RandomMinePlacer> {
    config: GameConfig,
    difficulty: Difficulty,
    grid: Array2<Cell>,
    placer: Option<P>,
    mine_count: CellCount,
    revealed_count: CellCount,
    flag_count: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl BoardEngine<RandomMinePlacer> {
    pub fn new(difficulty: Difficulty, config: GameConfig, seed: u64) -> Self {
        Self::with_placer(difficulty, config, RandomMinePlacer::new(seed))
    }
}

impl<P: MinePlacer> BoardEngine<P> {
    pub fn with_placer(difficulty: Difficulty, config: GameConfig, placer: P) -> Self {
        Self {
            config,
            difficulty,
            grid: Array2::default(config.size().to_nd_index()),
            placer: Some(placer),
            mine_count: config.mines,
            revealed_count: 0,
            flag_count: 0,
            state: GameState::NotStarted,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    /// Mines on the board, exact once placed.
    pub fn total_mines(&self) -> CellCount {
        self.mine_count
    }

    /// Number of revealed cells.
    ///
    /// After a loss this includes the mines uncovered for display, so it can match the safe
    /// cell count on a lost board. Only [`state`](Self::state) tells a win apart.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Counter shown to the player, negative when there are more flags than mines.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flag_count)
    }

    pub fn mines_placed(&self) -> bool {
        self.placer.is_none()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.in_bounds(coords).then(|| self.grid[coords.to_nd_index()])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.grid
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        coords.0 < self.config.rows && coords.1 < self.config.cols
    }

    /// Flags or unflags a hidden cell and returns whether it is flagged afterwards.
    ///
    /// Flagging never places mines nor starts the game, only [`reveal`](Self::reveal) does.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cell(coords) else {
            return false;
        };
        if self.state.is_final() || cell.is_revealed() {
            return cell.is_flagged();
        }

        let flagged = !cell.is_flagged();
        self.grid[coords.to_nd_index()].set_flagged(flagged);
        if flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        log::trace!("Flag at {:?} set to {}", coords, flagged);
        flagged
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealResult {
        let Some(cell) = self.cell(coords) else {
            return RevealResult::no_change();
        };
        if self.state.is_final() || cell.is_flagged() || cell.is_revealed() {
            return RevealResult::no_change();
        }

        let mut events = Vec::new();
        if let Some(placer) = self.placer.take() {
            self.place_mines(placer, coords);
            self.state = GameState::InProgress;
            events.push(EngineEvent::StartTiming);
            log::debug!("Game started at {:?}", coords);
        }

        if self.grid[coords.to_nd_index()].is_mine() {
            self.triggered_mine = Some(coords);
            let changed = self.reveal_all_mines();
            self.state = GameState::Lost;
            events.push(EngineEvent::StopTiming);
            log::debug!("Mine hit at {:?}", coords);
            return RevealResult {
                outcome: RevealOutcome::Lost,
                changed,
                events,
            };
        }

        let mut changed = self.flood_reveal(coords);

        if self.revealed_count == self.safe_cell_count() {
            self.state = GameState::Won;
            events.push(EngineEvent::StopTiming);
            changed.extend(self.flag_all_mines());
            if self.difficulty.is_ranked() {
                events.push(EngineEvent::RecordScore(self.difficulty));
            }
            log::debug!("Game won, {} cells revealed", self.revealed_count);
            RevealResult {
                outcome: RevealOutcome::Won,
                changed,
                events,
            }
        } else {
            RevealResult {
                outcome: RevealOutcome::Continue,
                changed,
                events,
            }
        }
    }

    fn safe_cell_count(&self) -> CellCount {
        self.config.total_cells() - self.mine_count
    }

    fn place_mines(&mut self, placer: P, safe: Coord2) {
        let layout = placer.place(&self.config, safe);
        debug_assert_eq!(layout.size(), self.size());
        debug_assert!(!layout.contains_mine(safe));

        for coords in layout.mine_coords() {
            self.grid[coords.to_nd_index()].arm();
        }
        for ((row, col), cell) in self.grid.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            if !cell.is_mine() {
                cell.set_adjacent_mines(layout.adjacent_mine_count(coords));
            }
        }
        self.mine_count = layout.mine_count();
    }

    /// Reveals `start` and cascades through zero-adjacency cells using an explicit stack.
    ///
    /// Cells are marked revealed before they are pushed, so no cell is visited twice.
    fn flood_reveal(&mut self, start: Coord2) -> Vec<Coord2> {
        self.grid[start.to_nd_index()].reveal();
        self.revealed_count += 1;
        let mut changed = vec![start];
        let mut to_visit = Vec::new();
        if self.grid[start.to_nd_index()].adjacent_mines() == 0 {
            to_visit.push(start);
        }

        while let Some(visit_coords) = to_visit.pop() {
            for pos in self.grid.iter_neighbors(visit_coords) {
                let neighbor = &mut self.grid[pos.to_nd_index()];
                // skip flagged or already revealed cells
                if !neighbor.is_hidden() || neighbor.is_mine() {
                    continue;
                }
                neighbor.reveal();
                self.revealed_count += 1;
                changed.push(pos);
                log::trace!(
                    "Flood revealed cell at {:?}, adjacent mines: {}",
                    pos,
                    neighbor.adjacent_mines()
                );
                if neighbor.adjacent_mines() == 0 {
                    to_visit.push(pos);
                }
            }
        }

        changed
    }

    fn reveal_all_mines(&mut self) -> Vec<Coord2> {
        let mut changed = Vec::new();
        for ((row, col), cell) in self.grid.indexed_iter_mut() {
            if cell.is_mine() && !cell.is_revealed() {
                if cell.is_flagged() {
                    self.flag_count -= 1;
                }
                cell.reveal();
                self.revealed_count += 1;
                changed.push((row as Coord, col as Coord));
            }
        }
        changed
    }

    fn flag_all_mines(&mut self) -> Vec<Coord2> {
        let mut changed = Vec::new();
        for ((row, col), cell) in self.grid.indexed_iter_mut() {
            if cell.is_mine() && !cell.is_flagged() {
                cell.set_flagged(true);
                self.flag_count += 1;
                changed.push((row as Coord, col as Coord));
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig, mines: &[Coord2]) -> BoardEngine<FixedMinePlacer> {
        BoardEngine::with_placer(Difficulty::Custom, config, FixedMinePlacer::new(mines))
    }

    fn revealed_cells<P: MinePlacer>(engine: &BoardEngine<P>) -> usize {
        engine.cells().filter(|(_, cell)| cell.is_revealed()).count()
    }

    fn flagged_cells<P: MinePlacer>(engine: &BoardEngine<P>) -> usize {
        engine.cells().filter(|(_, cell)| cell.is_flagged()).count()
    }

    #[test]
    fn new_game_is_blank() {
        let engine = BoardEngine::new(Difficulty::Easy, GameConfig::EASY, 1);

        assert_eq!(engine.state(), GameState::NotStarted);
        assert!(!engine.mines_placed());
        assert_eq!(engine.revealed_count(), 0);
        assert_eq!(engine.flag_count(), 0);
        assert!(engine.cells().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(engine.cells().count(), 81);
    }

    #[test]
    fn corner_reveal_cascades_to_win() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(2, 2)]);

        let result = engine.reveal((0, 0));

        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(engine.state(), GameState::Won);
        assert_eq!(engine.revealed_count(), 8);
        assert_eq!(result.changed.len(), 9);
        assert!(result.changed.contains(&(2, 2)));
        for coords in [(1, 1), (1, 2), (2, 1)] {
            assert_eq!(engine.cell(coords).unwrap().adjacent_mines(), 1);
            assert!(engine.cell(coords).unwrap().is_revealed());
        }
        assert_eq!(engine.cell((0, 0)).unwrap().adjacent_mines(), 0);
        let mine = engine.cell((2, 2)).unwrap();
        assert!(mine.is_flagged() && !mine.is_revealed());
        assert_eq!(
            result.events,
            [EngineEvent::StartTiming, EngineEvent::StopTiming]
        );
    }

    #[test]
    fn hitting_a_mine_reveals_every_mine() {
        let config = GameConfig::new_unchecked(5, 5, 3);
        let mut engine = engine(config, &[(0, 4), (4, 0), (4, 4)]);
        assert_eq!(engine.reveal((0, 3)).outcome, RevealOutcome::Continue);
        engine.toggle_flag((4, 0));

        let result = engine.reveal((0, 4));

        assert_eq!(result.outcome, RevealOutcome::Lost);
        assert_eq!(engine.state(), GameState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 4)));
        for coords in [(0, 4), (4, 0), (4, 4)] {
            assert!(result.changed.contains(&coords));
            let cell = engine.cell(coords).unwrap();
            assert!(cell.is_revealed() && !cell.is_flagged());
        }
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(result.events, [EngineEvent::StopTiming]);
    }

    #[test]
    fn first_reveal_is_never_a_mine() {
        let config = GameConfig::custom(5, 5, 22).unwrap();
        for seed in 0..25 {
            let mut engine = BoardEngine::new(Difficulty::Custom, config, seed);
            let result = engine.reveal((2, 3));

            assert_ne!(result.outcome, RevealOutcome::Lost);
            assert!(engine.mines_placed());
            assert_eq!(engine.cells().filter(|(_, cell)| cell.is_mine()).count(), 22);
            assert!(!engine.cell((2, 3)).unwrap().is_mine());
        }
    }

    #[test]
    fn adjacency_matches_neighbor_mines() {
        let mut engine = BoardEngine::new(Difficulty::Hard, GameConfig::HARD, 99);
        engine.reveal((8, 15));

        for (coords, cell) in engine.cells() {
            if cell.is_mine() {
                continue;
            }
            let expected = NeighborIter::new(coords, engine.size())
                .filter(|&pos| engine.cell(pos).unwrap().is_mine())
                .count();
            assert_eq!(usize::from(cell.adjacent_mines()), expected, "at {:?}", coords);
        }
    }

    #[test]
    fn flood_stops_at_numbers_and_flags() {
        // mines fence off the right column, flag cuts the left region
        let config = GameConfig::new_unchecked(5, 5, 5);
        let mines = [(0, 3), (1, 3), (2, 3), (3, 3), (4, 3)];
        let mut engine = engine(config, &mines);
        engine.toggle_flag((4, 0));

        let result = engine.reveal((0, 0));

        assert_eq!(result.outcome, RevealOutcome::Continue);
        assert!(!engine.cell((4, 0)).unwrap().is_revealed());
        assert!(engine.cell((3, 2)).unwrap().is_revealed());
        assert!(!engine.cell((0, 4)).unwrap().is_revealed());
        assert_eq!(usize::from(engine.revealed_count()), revealed_cells(&engine));
        assert_eq!(result.changed.len(), 14);
    }

    #[test]
    fn numbered_cell_does_not_cascade() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(2, 2)]);

        let result = engine.reveal((1, 1));

        assert_eq!(result.outcome, RevealOutcome::Continue);
        assert_eq!(result.changed, [(1, 1)]);
        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.revealed_count(), 1);
    }

    #[test]
    fn repeated_reveal_is_a_no_op() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(2, 2)]);
        engine.reveal((1, 1));

        let result = engine.reveal((1, 1));

        assert_eq!(result, RevealResult::no_change());
        assert_eq!(engine.revealed_count(), 1);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut engine = BoardEngine::new(Difficulty::Easy, GameConfig::EASY, 3);

        assert_eq!(engine.reveal((9, 0)).outcome, RevealOutcome::NoChange);
        assert!(!engine.toggle_flag((0, 9)));
        assert_eq!(engine.state(), GameState::NotStarted);
        assert!(engine.cell((9, 9)).is_none());
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(2, 2)]);

        assert!(engine.toggle_flag((0, 0)));
        assert_eq!(engine.reveal((0, 0)).outcome, RevealOutcome::NoChange);
        assert_eq!(engine.state(), GameState::NotStarted);
        assert!(!engine.mines_placed());
    }

    #[test]
    fn flag_toggles_and_counts() {
        let mut engine = BoardEngine::new(Difficulty::Easy, GameConfig::EASY, 5);

        assert!(engine.toggle_flag((3, 3)));
        assert!(engine.toggle_flag((4, 4)));
        assert_eq!(engine.flag_count(), 2);
        assert_eq!(engine.mines_left(), 8);
        assert!(!engine.toggle_flag((3, 3)));
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(usize::from(engine.flag_count()), flagged_cells(&engine));
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(2, 2)]);
        engine.reveal((1, 1));

        assert!(!engine.toggle_flag((1, 1)));
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn finished_game_ignores_moves() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(0, 0)]);
        engine.reveal((1, 1));
        assert_eq!(engine.reveal((0, 0)).outcome, RevealOutcome::Lost);

        assert_eq!(engine.reveal((2, 2)).outcome, RevealOutcome::NoChange);
        assert!(!engine.toggle_flag((2, 2)));
        assert_eq!(engine.state(), GameState::Lost);
    }

    #[test]
    fn lost_board_counts_uncovered_mines() {
        let config = GameConfig::new_unchecked(3, 3, 1);
        let mut engine = engine(config, &[(1, 1)]);
        for coords in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
            assert_eq!(engine.reveal(coords).outcome, RevealOutcome::Continue);
        }

        assert_eq!(engine.reveal((1, 1)).outcome, RevealOutcome::Lost);
        assert_eq!(engine.state(), GameState::Lost);
        assert_eq!(engine.revealed_count(), config.safe_cells());
        assert_eq!(usize::from(engine.revealed_count()), revealed_cells(&engine));
    }

    #[test]
    fn ranked_win_requests_score() {
        let mut engine = BoardEngine::with_placer(
            Difficulty::Easy,
            GameConfig::new_unchecked(2, 1, 1),
            FixedMinePlacer::new([(0, 0)]),
        );

        let result = engine.reveal((1, 0));

        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(
            result.events,
            [
                EngineEvent::StartTiming,
                EngineEvent::StopTiming,
                EngineEvent::RecordScore(Difficulty::Easy)
            ]
        );
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.mines_left(), 0);
    }

    #[test]
    fn win_needs_every_safe_cell() {
        let config = GameConfig::new_unchecked(1, 5, 1);
        let mut engine = engine(config, &[(0, 2)]);

        assert_eq!(engine.reveal((0, 0)).outcome, RevealOutcome::Continue);
        assert_eq!(engine.revealed_count(), 2);
        assert_eq!(engine.reveal((0, 3)).outcome, RevealOutcome::Continue);
        assert_eq!(engine.reveal((0, 4)).outcome, RevealOutcome::Won);
        assert_eq!(engine.revealed_count(), config.safe_cells());
    }
}
