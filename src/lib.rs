// Library interface for word-wizard
// The binary and the integration tests both go through these modules

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod graph;
pub mod logging;
pub mod round;
pub mod sanitizer;
pub mod selector;
pub mod session;
pub mod timer;
pub mod tui;
pub mod worker;

// Re-export commonly used items for easier testing
pub use config::{Difficulty, GameConfig};
pub use error::{DataFormatError, GuessError, SelectionError};
pub use game::{GameInterface, GameSummary, UserAction, run_game};
pub use graph::{EMBEDDED_DATASET, WordEntry, WordGraph};
pub use round::{Outcome, Phase, RoundState, Slot, similarity};
pub use sanitizer::{get_hint, sanitize};
pub use selector::{SelectionConstraints, pick_word, select_word};
pub use session::{Session, SessionState};
pub use timer::Countdown;
