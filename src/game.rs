//! Game controller.
//!
//! Ties a [`Session`] to the countdown and the search worker and drives them
//! from a single control loop. Front-ends plug in through [`GameInterface`].

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rand::Rng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Difficulty, GameConfig};
use crate::error::GuessError;
use crate::graph::WordGraph;
use crate::round::{Outcome, Phase, RoundState};
use crate::session::{Session, SessionState};
use crate::timer::Countdown;
use crate::worker::{SearchRequest, WordPick, spawn_search};
use crate::{debug_log, info_log};

const LOADING_POLL: Duration = Duration::from_millis(50);
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Lifeline,
    Next,
    Exit,
}

/// Result of advancing the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockUpdate {
    Idle,
    Ticked,
    TimedOut,
}

/// Final tally shown when a game ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub difficulty: Difficulty,
    pub score: u32,
    pub max_score: u32,
    pub words_played: usize,
    pub correct: usize,
    pub best_streak: usize,
}

impl GameSummary {
    pub fn performance_message(&self) -> &'static str {
        if self.score * 2 > self.max_score {
            "Great job!"
        } else {
            "Keep practicing!"
        }
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Score: {}/{}", self.score, self.max_score)?;
        writeln!(f, "{}", self.performance_message())?;
        writeln!(f, "Difficulty: {}", self.difficulty)?;
        writeln!(f, "Words Played: {}", self.words_played)?;
        writeln!(f, "Correct Answers: {}", self.correct)?;
        write!(f, "Best Streak: {}", self.best_streak)
    }
}

/// Player-facing line describing how a round ended.
pub fn describe_outcome(round: &RoundState) -> Option<String> {
    let text = match round.outcome()? {
        Outcome::Correct => format!(
            "Correct! '{}' was the answer! (+{} points)",
            round.word(),
            round.points_awarded()
        ),
        Outcome::Incorrect => format!("Incorrect! The word was: {}", round.word()),
        Outcome::Timeout => format!("Time's up! The word was: {}", round.word()),
    };
    Some(text)
}

/// What a front-end must provide to host a game.
pub trait GameInterface {
    /// `None` means the player wants to quit.
    fn choose_difficulty(&mut self) -> Option<Difficulty>;

    fn display_loading(&mut self, question: usize, total: usize);

    fn display_round(&mut self, round: &RoundState, session: &SessionState);

    /// Called once per elapsed second while a round is active.
    fn display_tick(&mut self, round: &RoundState, session: &SessionState) {
        self.display_round(round, session);
    }

    fn display_invalid_guess(&mut self);

    fn display_outcome(&mut self, round: &RoundState, session: &SessionState);

    fn display_game_over(&mut self, summary: &GameSummary);

    /// Wait up to `timeout` for the player. `None` if nothing happened.
    fn read_action(&mut self, timeout: Duration) -> Option<UserAction>;

    fn confirm_play_again(&mut self) -> bool;
}

pub struct Game<R: Rng = StdRng> {
    graph: Arc<WordGraph>,
    session: Session<R>,
    countdown: Countdown,
    pending: Option<Receiver<WordPick>>,
}

impl Game<StdRng> {
    pub fn new(graph: Arc<WordGraph>, config: GameConfig, difficulty: Difficulty) -> Self {
        Self::with_session(graph, Session::new(config, difficulty))
    }
}

impl<R: Rng> Game<R> {
    pub fn with_session(graph: Arc<WordGraph>, session: Session<R>) -> Self {
        Self {
            graph,
            session,
            countdown: Countdown::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            return Phase::Loading;
        }
        self.session.round().map_or(Phase::Loading, RoundState::phase)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Questions remain to be played.
    pub fn has_next(&self) -> bool {
        !self.session.state().is_complete()
    }

    /// Kick off the search for the next word. Any running round's clock stops.
    pub fn request_word(&mut self) {
        self.countdown.cancel();
        let state = self.session.state();
        let request = SearchRequest {
            constraints: self.session.config().constraints(self.session.difficulty()),
            used_words: state.used_words.clone(),
            attempts: self.session.config().search_attempts,
        };
        debug_log!("Game::request_word() - {:?}", request.constraints);
        self.pending = Some(spawn_search(Arc::clone(&self.graph), request));
    }

    /// Wait up to `timeout` for the worker. Returns `true` once a round has started.
    pub fn await_word(&mut self, timeout: Duration) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let pick = match rx.recv_timeout(timeout) {
            Ok(pick) => pick,
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Word search worker vanished, using the fallback word");
                WordPick::fallback()
            }
        };
        self.pending = None;
        self.start_round(&pick.word, &pick.hint);
        true
    }

    /// Start a round directly, bypassing the worker.
    pub fn start_round(&mut self, word: &str, hint: &str) {
        self.pending = None;
        self.session.start_round(word, hint);
        if self.phase() == Phase::Active {
            self.countdown.start(Instant::now());
        } else {
            self.countdown.cancel();
        }
    }

    /// Apply every tick that fell due up to `now`.
    pub fn advance_clock(&mut self, now: Instant) -> ClockUpdate {
        let ticks = self.countdown.poll(now);
        for _ in 0..ticks {
            if self.session.tick() == Some(Outcome::Timeout) {
                self.countdown.cancel();
                return ClockUpdate::TimedOut;
            }
        }
        if ticks > 0 { ClockUpdate::Ticked } else { ClockUpdate::Idle }
    }

    pub fn use_lifeline(&mut self) -> Option<usize> {
        self.session.use_lifeline()
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<Option<Outcome>, GuessError> {
        let outcome = self.session.submit_guess(text)?;
        if outcome.is_some() {
            self.countdown.cancel();
        }
        Ok(outcome)
    }

    /// Leave the game: stop the clock and abandon any search.
    pub fn abandon(&mut self) {
        self.countdown.cancel();
        self.pending = None;
    }

    /// How long to wait for input before the clock needs attention again.
    pub fn input_timeout(&self, now: Instant) -> Duration {
        self.countdown.until_next(now).unwrap_or(INPUT_POLL)
    }

    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.session.round()
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn summary(&self) -> GameSummary {
        let state = self.session.state();
        GameSummary {
            difficulty: self.session.difficulty(),
            score: state.score_total,
            max_score: self.session.config().max_score(),
            words_played: state.question_index,
            correct: state.correct_count,
            best_streak: state.best_streak,
        }
    }
}

fn show_round<R: Rng, I: GameInterface + ?Sized>(game: &Game<R>, interface: &mut I) {
    if let Some(round) = game.round() {
        interface.display_round(round, game.state());
    }
}

fn show_outcome<R: Rng, I: GameInterface + ?Sized>(game: &Game<R>, interface: &mut I) {
    if let Some(round) = game.round() {
        interface.display_outcome(round, game.state());
    }
}

fn sync_clock<R: Rng, I: GameInterface + ?Sized>(game: &mut Game<R>, interface: &mut I) {
    match game.advance_clock(Instant::now()) {
        ClockUpdate::Idle => {}
        ClockUpdate::Ticked => {
            if let Some(round) = game.round() {
                interface.display_tick(round, game.state());
            }
        }
        ClockUpdate::TimedOut => {
            info_log!("Round timed out");
            show_outcome(game, interface);
        }
    }
}

fn request_next<R: Rng, I: GameInterface + ?Sized>(game: &mut Game<R>, interface: &mut I) {
    game.request_word();
    let state = game.state();
    interface.display_loading(state.question_index + 1, state.total_questions);
}

/// Play a prepared game to the end. `None` if the player quit early.
pub fn play<R: Rng, I: GameInterface + ?Sized>(game: &mut Game<R>, interface: &mut I) -> Option<GameSummary> {
    if !game.has_next() {
        debug_log!("play() - no questions configured");
        return Some(finish(game, interface));
    }
    request_next(game, interface);

    loop {
        if game.is_loading() {
            if game.await_word(LOADING_POLL) {
                show_round(game, interface);
            }
            continue;
        }

        sync_clock(game, interface);
        let Some(action) = interface.read_action(game.input_timeout(Instant::now())) else {
            continue;
        };
        // Time spent waiting for input still counts
        sync_clock(game, interface);
        debug_log!("play() - action {:?} in phase {:?}", action, game.phase());

        match action {
            UserAction::Exit => {
                info_log!("Player left the game");
                game.abandon();
                return None;
            }
            UserAction::Lifeline => {
                if game.use_lifeline().is_some() {
                    show_round(game, interface);
                }
            }
            UserAction::Guess(text) => match game.submit_guess(&text) {
                Err(GuessError::InvalidGuess) => interface.display_invalid_guess(),
                Ok(Some(_)) => show_outcome(game, interface),
                Ok(None) => {}
            },
            UserAction::Next => {
                if !matches!(game.phase(), Phase::Resolved(_)) {
                    continue;
                }
                if game.has_next() {
                    request_next(game, interface);
                } else {
                    break;
                }
            }
        }
    }

    Some(finish(game, interface))
}

fn finish<R: Rng, I: GameInterface + ?Sized>(game: &Game<R>, interface: &mut I) -> GameSummary {
    let summary = game.summary();
    info_log!("Game over: {} / {}", summary.score, summary.max_score);
    interface.display_game_over(&summary);
    summary
}

/// Run one game, asking for a difficulty first if none was given.
pub fn run_game<I: GameInterface + ?Sized>(
    graph: Arc<WordGraph>,
    config: &GameConfig,
    difficulty: Option<Difficulty>,
    interface: &mut I,
) -> Option<GameSummary> {
    let difficulty = match difficulty {
        Some(difficulty) => difficulty,
        None => interface.choose_difficulty()?,
    };
    info_log!("Starting {} game with {} questions", difficulty, config.total_questions);
    let mut game = Game::new(graph, config.clone(), difficulty);
    play(&mut game, interface)
}

/// Keep playing games until the player declines another.
pub fn run<I: GameInterface + ?Sized>(
    graph: Arc<WordGraph>,
    config: &GameConfig,
    difficulty: Option<Difficulty>,
    interface: &mut I,
) {
    while run_game(Arc::clone(&graph), config, difficulty, interface).is_some() {
        if !interface.confirm_play_again() {
            break;
        }
    }
}
