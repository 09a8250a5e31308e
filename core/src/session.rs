use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Instant;

use crate::*;

/// Everything a front-end needs besides drawing: the current game, its clock, the difficulty
/// settings and the persisted best times.
#[derive(Debug)]
pub struct GameSession<S: KeyValueStore> {
    settings: DifficultySettings,
    difficulty: Difficulty,
    engine: BoardEngine,
    timer: GameTimer,
    scores: ScoreBoard,
    store: S,
    rng: SmallRng,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Starts an easy game, loading previous scores from `store`.
    pub fn new(store: S, seed: u64) -> Self {
        let scores = ScoreBoard::load(&store).unwrap_or_else(|err| {
            log::warn!("Discarding stored scores: {}", err);
            ScoreBoard::new()
        });
        let settings = DifficultySettings::new();
        let difficulty = Difficulty::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let engine = BoardEngine::new(difficulty, settings.config_for(difficulty), rng.random());

        Self {
            settings,
            difficulty,
            engine,
            timer: GameTimer::new(),
            scores,
            store,
            rng,
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> &DifficultySettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scores(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        self.scores.list(difficulty)
    }

    pub fn best_time(&self, difficulty: Difficulty) -> Option<u32> {
        self.scores.best(difficulty).map(|entry| entry.time)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn mines_left(&self) -> i32 {
        self.engine.mines_left()
    }

    /// Throws away the current board and clock.
    pub fn new_game(&mut self) {
        let config = self.settings.config_for(self.difficulty);
        self.engine = BoardEngine::new(self.difficulty, config, self.rng.random());
        self.timer.reset();
        log::debug!("New {} game {:?}", self.difficulty, config);
    }

    /// Switches difficulty, restarting only when it actually changes.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.new_game();
        true
    }

    /// Validates and stores a custom config, then starts a custom game with it.
    ///
    /// On rejection the current game and the previous custom slot are left untouched.
    pub fn apply_custom(
        &mut self,
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    ) -> Result<GameConfig> {
        let config = self.settings.set_custom(rows, cols, mines)?;
        self.difficulty = Difficulty::Custom;
        self.new_game();
        Ok(config)
    }

    /// Reveals a cell and reacts to the engine's signals.
    ///
    /// `now` anchors and settles the clock, so a front-end that only calls
    /// [`poll`](Self::poll) still records the full play time. `today` dates a recorded score.
    pub fn reveal(&mut self, coords: Coord2, now: Instant, today: NaiveDate) -> RevealResult {
        let result = self.engine.reveal(coords);
        for event in &result.events {
            self.timer.apply_at(event, now);
            if let EngineEvent::RecordScore(difficulty) = *event {
                self.record_score(difficulty, today);
            }
        }
        result
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        self.engine.toggle_flag(coords)
    }

    /// One scheduled clock tick, returns whether the displayed time changed.
    pub fn tick(&mut self) -> bool {
        self.timer.tick()
    }

    pub fn poll(&mut self, now: Instant) -> u32 {
        self.timer.poll(now)
    }

    fn record_score(&mut self, difficulty: Difficulty, today: NaiveDate) {
        let entry = ScoreEntry {
            time: self.timer.elapsed_secs(),
            date: today,
        };
        match self.scores.append(difficulty, entry) {
            Some(rank) => log::info!("New {} score {}s ranked #{}", difficulty, entry.time, rank),
            None => return,
        }
        if let Err(err) = self.scores.persist(&mut self.store) {
            log::error!("Could not save scores: {}", err);
        }
    }
}
