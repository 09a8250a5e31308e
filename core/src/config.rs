use serde::{Deserialize, Serialize};

use crate::*;

/// Named difficulty tier. Only the presets take part in the score lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub const RANKED: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn is_ranked(self) -> bool {
        !matches!(self, Self::Custom)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Custom => "custom",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl core::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const EASY: Self = Self::new_unchecked(9, 9, 10);
    pub const MEDIUM: Self = Self::new_unchecked(16, 16, 40);
    pub const HARD: Self = Self::new_unchecked(16, 30, 99);

    pub const MIN_SIDE: Coord = 5;
    pub const MAX_SIDE: Coord = 30;

    /// Builds a config without any bounds checks, only meant for presets and tests.
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Validates a user supplied custom configuration.
    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if !(Self::MIN_SIDE..=Self::MAX_SIDE).contains(&rows) {
            return Err(ConfigError::RowsOutOfRange {
                rows,
                min: Self::MIN_SIDE,
                max: Self::MAX_SIDE,
            });
        }
        if !(Self::MIN_SIDE..=Self::MAX_SIDE).contains(&cols) {
            return Err(ConfigError::ColsOutOfRange {
                cols,
                min: Self::MIN_SIDE,
                max: Self::MAX_SIDE,
            });
        }
        if mines < 1 {
            return Err(ConfigError::TooFewMines);
        }
        let max = Self::max_mines(rows, cols);
        if mines > max {
            return Err(ConfigError::TooManyMines { mines, max });
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    /// At most 90% of the cells can hold a mine.
    pub const fn max_mines(rows: Coord, cols: Coord) -> CellCount {
        // u32 so that 255 * 255 * 9 does not overflow
        ((mult(rows, cols) as u32 * 9) / 10) as CellCount
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Mine density rounded to the nearest whole percent.
    pub fn mine_ratio_percent(&self) -> u8 {
        let total = u32::from(self.total_cells());
        if total == 0 {
            return 0;
        }
        let percent = (u32::from(self.mines) * 100 + total / 2) / total;
        percent.min(100) as u8
    }
}

/// The three fixed presets plus the single user editable custom slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySettings {
    custom: GameConfig,
}

impl DifficultySettings {
    pub const DEFAULT_CUSTOM: GameConfig = GameConfig::new_unchecked(10, 10, 10);

    pub fn new() -> Self {
        Self {
            custom: Self::DEFAULT_CUSTOM,
        }
    }

    pub fn config_for(&self, difficulty: Difficulty) -> GameConfig {
        match difficulty {
            Difficulty::Easy => GameConfig::EASY,
            Difficulty::Medium => GameConfig::MEDIUM,
            Difficulty::Hard => GameConfig::HARD,
            Difficulty::Custom => self.custom,
        }
    }

    pub fn custom(&self) -> GameConfig {
        self.custom
    }

    /// Stores a new custom configuration, leaving the slot untouched when it is rejected.
    pub fn set_custom(&mut self, rows: Coord, cols: Coord, mines: CellCount) -> Result<GameConfig> {
        let config = GameConfig::custom(rows, cols, mines)?;
        log::debug!("Custom difficulty set to {:?}", config);
        self.custom = config;
        Ok(config)
    }
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self::new()
    }
}
