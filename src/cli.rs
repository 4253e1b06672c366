use clap::Parser;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{DEFAULT_LIFELINE_POOL, DEFAULT_TOTAL_QUESTIONS, Difficulty, GameConfig};
use crate::error::DataFormatError;
use crate::game::{GameInterface, GameSummary, UserAction, describe_outcome};
use crate::graph::WordGraph;
use crate::info_log;
use crate::round::RoundState;
use crate::session::SessionState;

const APP_DIR: &str = "word-wizard";
const DATASET_FILE: &str = "words.csv";

/// Word Wizard: guess the hidden word from its hint before time runs out
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a CSV dataset with word, hint and neighbors columns
    #[arg(short = 'w', long = "words")]
    pub words_path: Option<PathBuf>,

    /// Skip the difficulty menu
    #[arg(short = 'd', long = "difficulty", value_enum)]
    pub difficulty: Option<Difficulty>,

    /// Number of words per game
    #[arg(short = 'q', long = "questions", default_value_t = DEFAULT_TOTAL_QUESTIONS)]
    pub questions: usize,

    /// Letter reveals available across the whole game
    #[arg(long = "lifelines", default_value_t = DEFAULT_LIFELINE_POOL)]
    pub lifelines: u32,

    /// Use the line-based interface instead of the full-screen one
    #[arg(long = "plain")]
    pub plain: bool,

    /// Where to write logs
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            total_questions: self.questions,
            lifeline_pool: self.lifelines,
            ..GameConfig::default()
        }
    }

    /// Load the dataset: `--words` first, then the user data directory, then the
    /// copy built into the binary.
    pub fn load_graph(&self) -> Result<WordGraph, DataFormatError> {
        if let Some(path) = &self.words_path {
            info_log!("Loading dataset from {}", path.display());
            return WordGraph::load_from_file(path);
        }
        match default_dataset_path() {
            Some(path) if path.is_file() => {
                info_log!("Loading dataset from {}", path.display());
                WordGraph::load_from_file(&path)
            }
            _ => {
                info_log!("Loading embedded dataset");
                WordGraph::embedded()
            }
        }
    }
}

pub fn default_dataset_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(DATASET_FILE))
}

/// Interpret one line of input.
///
/// A blank line moves on after a round has ended, and counts as an (invalid)
/// guess while it is still running.
pub fn parse_action(input: &str, awaiting_next: bool) -> UserAction {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => UserAction::Exit,
        "next" => UserAction::Next,
        "?" | "reveal" => UserAction::Lifeline,
        "" if awaiting_next => UserAction::Next,
        _ => UserAction::Guess(trimmed.to_string()),
    }
}

// UI output functions

pub fn display_difficulty_menu() {
    println!("\nChoose your difficulty:");
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        println!(
            "{}. {} ({}s per word, search depth {}, {} lifeline(s))",
            i + 1,
            difficulty,
            difficulty.seconds(),
            difficulty.max_depth(),
            difficulty.lifelines_per_round()
        );
    }
    println!("Type a name or number, or 'exit' to quit:");
}

pub fn display_loading(question: usize, total: usize) {
    println!("\nWord {question}/{total}: loading new word...");
}

pub fn display_round(round: &RoundState, session: &SessionState) {
    println!("Hint: {}", round.hint());
    println!("Word: {}", round.masked_display());
    println!(
        "Time: {}s | Reveals: {} (pool {}) | Score: {}",
        round.seconds_remaining(),
        round.lifelines_remaining(),
        session.lifeline_pool,
        session.score_total
    );
    println!("Enter your guess ('?' to reveal a letter, 'exit' to quit):");
}

pub fn display_invalid_guess() {
    println!("Please enter a guess!");
}

pub fn display_outcome(round: &RoundState, session: &SessionState) {
    let Some(message) = describe_outcome(round) else {
        return;
    };
    println!("{message}");
    println!("Score: {}", session.score_total);
    println!("Press Enter or type 'next' to continue.");
}

pub fn display_game_over(summary: &GameSummary) {
    println!("\nGame Complete!");
    println!("{summary}");
}

/// Line-based implementation of the game interface.
pub struct CliInterface<R: BufRead> {
    reader: R,
    awaiting_next: bool,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, awaiting_next: false }
    }

    /// `None` on end of input or a read error.
    fn read_line(&mut self) -> Option<String> {
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                None
            }
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn choose_difficulty(&mut self) -> Option<Difficulty> {
        loop {
            display_difficulty_menu();
            let input = self.read_line()?;
            if matches!(parse_action(&input, false), UserAction::Exit) {
                return None;
            }
            match input.parse::<Difficulty>() {
                Ok(difficulty) => return Some(difficulty),
                Err(e) => println!("{e}"),
            }
        }
    }

    fn display_loading(&mut self, question: usize, total: usize) {
        self.awaiting_next = false;
        display_loading(question, total);
    }

    fn display_round(&mut self, round: &RoundState, session: &SessionState) {
        display_round(round, session);
    }

    // Printing every second would bury the prompt
    fn display_tick(&mut self, _round: &RoundState, _session: &SessionState) {}

    fn display_invalid_guess(&mut self) {
        display_invalid_guess();
    }

    fn display_outcome(&mut self, round: &RoundState, session: &SessionState) {
        self.awaiting_next = true;
        display_outcome(round, session);
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        display_game_over(summary);
    }

    fn read_action(&mut self, _timeout: Duration) -> Option<UserAction> {
        match self.read_line() {
            Some(input) => Some(parse_action(&input, self.awaiting_next)),
            None => Some(UserAction::Exit),
        }
    }

    fn confirm_play_again(&mut self) -> bool {
        println!("\nPlay again? (y/n)");
        self.read_line()
            .is_some_and(|input| matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Print to stderr why the dataset could not be used.
pub fn report_load_error(path: Option<&Path>, error: &DataFormatError) {
    match path {
        Some(path) => eprintln!("Failed to load word list from '{}': {error}", path.display()),
        None => eprintln!("Failed to load word list: {error}"),
    }
}
