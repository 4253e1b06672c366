//! Game-wide state and the session API the front-ends drive.
//!
//! The session owns the lifeline pool and lends it to the current round;
//! nothing here is shared with other threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::config::{Difficulty, GameConfig};
use crate::error::GuessError;
use crate::info_log;
use crate::round::{Outcome, RoundState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub score_total: u32,
    /// Questions started so far, 1-based once the first round begins.
    pub question_index: usize,
    pub total_questions: usize,
    pub used_words: HashSet<String>,
    pub lifeline_pool: u32,
    pub correct_count: usize,
    pub current_streak: usize,
    pub best_streak: usize,
    pub wrong_streak: usize,
}

impl SessionState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score_total: 0,
            question_index: 0,
            total_questions: config.total_questions,
            used_words: HashSet::new(),
            lifeline_pool: config.lifeline_pool,
            correct_count: 0,
            current_streak: 0,
            best_streak: 0,
            wrong_streak: 0,
        }
    }

    /// Every question has been handed out.
    pub fn is_complete(&self) -> bool {
        self.question_index >= self.total_questions
    }

    fn record(&mut self, outcome: Outcome, points: u32) {
        match outcome {
            Outcome::Correct => {
                self.score_total += points;
                self.correct_count += 1;
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
                self.wrong_streak = 0;
            }
            Outcome::Incorrect | Outcome::Timeout => {
                self.current_streak = 0;
                self.wrong_streak += 1;
            }
        }
    }
}

/// One game: session state plus the round in progress.
pub struct Session<R: Rng = StdRng> {
    config: GameConfig,
    difficulty: Difficulty,
    state: SessionState,
    round: Option<RoundState>,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(config: GameConfig, difficulty: Difficulty) -> Self {
        Self::with_rng(config, difficulty, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: GameConfig, difficulty: Difficulty, rng: R) -> Self {
        let state = SessionState::new(&config);
        Self {
            config,
            difficulty,
            state,
            round: None,
            rng,
        }
    }

    /// Throw away all progress and start a fresh game.
    pub fn reset(&mut self, difficulty: Difficulty) {
        info_log!("Session::reset() - new {} game", difficulty);
        self.difficulty = difficulty;
        self.state = SessionState::new(&self.config);
        self.round = None;
    }

    /// Begin the next question, replacing any previous round.
    pub fn start_round(&mut self, word: &str, hint: &str) -> &RoundState {
        self.state.question_index += 1;
        self.state.used_words.insert(word.to_string());
        let round = RoundState::start(
            word,
            hint,
            self.difficulty.seconds(),
            self.state.lifeline_pool > 0,
            &mut self.rng,
        );
        info_log!(
            "Session::start_round() - question {}/{}: '{}'",
            self.state.question_index,
            self.state.total_questions,
            word
        );
        self.round.insert(round)
    }

    /// One second passes. Returns `Some(Timeout)` when this tick ended the round.
    pub fn tick(&mut self) -> Option<Outcome> {
        let round = self.round.as_mut()?;
        if round.tick() {
            self.state.record(Outcome::Timeout, 0);
            return Some(Outcome::Timeout);
        }
        None
    }

    /// Spend a lifeline on the current round. Returns the revealed position.
    pub fn use_lifeline(&mut self) -> Option<usize> {
        let round = self.round.as_mut()?;
        round.use_lifeline(&mut self.state.lifeline_pool, &mut self.rng)
    }

    /// Check a guess. `Ok(None)` means there was no active round to answer.
    pub fn submit_guess(&mut self, text: &str) -> Result<Option<Outcome>, GuessError> {
        let Some(round) = self.round.as_mut() else {
            return Ok(None);
        };
        let outcome = round.submit_guess(text, self.config.match_threshold)?;
        if let Some(outcome) = outcome {
            self.state.record(outcome, round.points_awarded());
            info_log!(
                "Session::submit_guess() - {:?}, score now {}",
                outcome,
                self.state.score_total
            );
        }
        Ok(outcome)
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
