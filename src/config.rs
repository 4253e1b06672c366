use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

use crate::selector::SelectionConstraints;

pub const DEFAULT_TOTAL_QUESTIONS: usize = 10;
pub const DEFAULT_LIFELINE_POOL: u32 = 10;
pub const DEFAULT_MIN_LEN: usize = 4;
pub const DEFAULT_MAX_LEN: usize = 10;
pub const DEFAULT_SEARCH_ATTEMPTS: usize = 20;
pub const DEFAULT_MATCH_THRESHOLD: u32 = 80;
pub const AUTO_REVEALED_LETTERS: usize = 2;

/// Game difficulty. Controls search depth and the per-round clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// How many hops from the seed the selector may travel.
    pub fn max_depth(self) -> usize {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn seconds(self) -> u32 {
        match self {
            Self::Easy => 30,
            Self::Medium => 25,
            Self::Hard => 20,
        }
    }

    /// Advertised lifeline allowance. A round still grants at most one reveal.
    pub fn lifelines_per_round(self) -> u32 {
        match self {
            Self::Easy => 2,
            Self::Medium | Self::Hard => 1,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" | "1" => Ok(Self::Easy),
            "medium" | "m" | "2" => Ok(Self::Medium),
            "hard" | "h" | "3" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Knobs for a single game. Everything here is fixed for the game's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub total_questions: usize,
    pub lifeline_pool: u32,
    pub min_len: usize,
    pub max_len: usize,
    pub search_attempts: usize,
    pub match_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            lifeline_pool: DEFAULT_LIFELINE_POOL,
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            search_attempts: DEFAULT_SEARCH_ATTEMPTS,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl GameConfig {
    pub fn constraints(&self, difficulty: Difficulty) -> SelectionConstraints {
        SelectionConstraints {
            max_depth: difficulty.max_depth(),
            min_len: self.min_len,
            max_len: self.max_len,
        }
    }

    /// Highest score a game can report, used for the final tally.
    pub fn max_score(&self) -> u32 {
        (self.total_questions * 10) as u32
    }
}
