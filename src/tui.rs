//! TUI (Terminal User Interface) module for Word Wizard
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `ViewState`: everything that gets rendered, plus key handling
//! - `TuiInterface`: owns the terminal and implements `GameInterface`
//!
//! # State Machine
//! The UI follows these state transitions:
//! - `ChoosingDifficulty` → `Loading` → `Guessing` → `RoundOver` → back to `Loading`
//! - After the last word: `RoundOver` → `GameOver` → `ChoosingDifficulty` or exit

use crate::config::Difficulty;
use crate::game::{GameInterface, GameSummary, UserAction, describe_outcome};
use crate::round::{Outcome, RoundState};
use crate::session::SessionState;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const MAX_INPUT_LEN: usize = 32;
const LOW_TIME_SECONDS: u32 = 5;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const WORD_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TuiState {
    ChoosingDifficulty { selected: usize },
    Loading,
    Guessing,
    RoundOver,
    GameOver,
}

/// What a key press asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Act(UserAction),
    Choose(Difficulty),
    PlayAgain(bool),
    Quit,
}

/// Copy of the round as last reported by the game loop.
#[derive(Clone, Debug, Default)]
struct RoundView {
    masked: String,
    hint: String,
    seconds: u32,
    lifelines: u32,
    pool: u32,
    score: u32,
    question: usize,
    total: usize,
}

impl RoundView {
    fn from_round(round: &RoundState, session: &SessionState) -> Self {
        Self {
            masked: round.masked_display(),
            hint: round.hint().to_string(),
            seconds: round.seconds_remaining(),
            lifelines: round.lifelines_remaining(),
            pool: session.lifeline_pool,
            score: session.score_total,
            question: session.question_index,
            total: session.total_questions,
        }
    }
}

/// Everything the screen shows, independent of the terminal.
#[derive(Debug)]
struct ViewState {
    state: TuiState,
    round: Option<RoundView>,
    current_input: String,
    message: String,
    message_style: Style,
    error_message: String,
    status: String,
    summary: Vec<String>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            state: TuiState::ChoosingDifficulty { selected: 1 },
            round: None,
            current_input: String::new(),
            message: String::new(),
            message_style: MESSAGE_STYLE,
            error_message: String::new(),
            status: "Ready to start".to_string(),
            summary: Vec::new(),
        }
    }

    /// Clear everything left over from the previous round or game.
    fn begin_loading(&mut self, question: usize, total: usize) {
        self.state = TuiState::Loading;
        self.current_input.clear();
        self.message.clear();
        self.message_style = MESSAGE_STYLE;
        self.error_message.clear();
        self.summary.clear();
        self.status = format!("Loading word {question}/{total}...");
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }
        match self.state {
            TuiState::ChoosingDifficulty { selected } => self.handle_difficulty_input(key, selected),
            TuiState::Guessing => self.handle_guess_input(key),
            TuiState::RoundOver => Self::handle_round_over_input(key),
            TuiState::GameOver => Self::handle_game_over_input(key),
            TuiState::Loading => {
                debug_log!("handle_key() - Ignoring key while loading");
                None
            }
        }
    }

    fn handle_difficulty_input(&mut self, key: KeyEvent, selected: usize) -> Option<Command> {
        let last = Difficulty::ALL.len() - 1;
        match key.code {
            KeyCode::Up => {
                self.state = TuiState::ChoosingDifficulty { selected: selected.saturating_sub(1) };
                None
            }
            KeyCode::Down => {
                self.state = TuiState::ChoosingDifficulty { selected: (selected + 1).min(last) };
                None
            }
            KeyCode::Enter => Difficulty::ALL.get(selected).copied().map(Command::Choose),
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char(c) => match c.to_string().parse::<Difficulty>() {
                Ok(difficulty) => Some(Command::Choose(difficulty)),
                Err(_) => {
                    debug_log!("handle_difficulty_input() - Ignoring '{}'", c);
                    None
                }
            },
            _ => None,
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<Command> {
        self.error_message.clear();
        match key.code {
            KeyCode::Esc => {
                info_log!("handle_guess_input() - ESC pressed, returning Exit");
                Some(Command::Act(UserAction::Exit))
            }
            KeyCode::Tab | KeyCode::Char('?') => Some(Command::Act(UserAction::Lifeline)),
            KeyCode::Enter => {
                let guess = std::mem::take(&mut self.current_input);
                info_log!("handle_guess_input() - Submitting '{}'", guess);
                Some(Command::Act(UserAction::Guess(guess)))
            }
            KeyCode::Backspace => {
                self.current_input.pop();
                None
            }
            KeyCode::Char(c) if Self::has_modifier_keys(&key) => {
                debug_log!("handle_guess_input() - Ignoring '{}' with modifier {:?}", c, key.modifiers);
                None
            }
            KeyCode::Char(c) if c.is_alphabetic() || c == '-' || c == ' ' || c == '\'' => {
                if self.current_input.chars().count() < MAX_INPUT_LEN {
                    self.current_input.push(c);
                } else {
                    self.error_message = format!("Guesses are limited to {MAX_INPUT_LEN} characters");
                }
                None
            }
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
                None
            }
            _ => {
                debug_log!("handle_guess_input() - Ignoring key: {:?}", key.code);
                None
            }
        }
    }

    fn handle_round_over_input(key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => Some(Command::Act(UserAction::Exit)),
            KeyCode::Enter | KeyCode::Char(' ' | 'n' | 'N') => Some(Command::Act(UserAction::Next)),
            _ => None,
        }
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y' | 'Y') => Some(Command::PlayAgain(true)),
            KeyCode::Esc | KeyCode::Char('n' | 'N' | 'q') => Some(Command::PlayAgain(false)),
            _ => None,
        }
    }
}

/// Main TUI interface component.
///
/// Manages terminal rendering and input polling; the game loop drives it.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    view: ViewState,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            view: ViewState::new(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let view = &self.view;
        self.terminal.draw(|f| {
            Self::render_static(f, view);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, view: &ViewState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(8), // Word and hint
                Constraint::Length(3), // Timer / score / lifelines
                Constraint::Min(6),    // Input, feedback, summary
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        match view.state {
            TuiState::ChoosingDifficulty { selected } => Self::render_difficulty_menu(f, chunks[1], selected),
            _ => Self::render_board(f, chunks[1], view),
        }
        Self::render_stats(f, chunks[2], view);
        Self::render_info(f, chunks[3], view);
        Self::render_status(f, chunks[4], &view.status);
        Self::render_instructions(f, chunks[5], view.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORD WIZARD")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_difficulty_menu(f: &mut Frame, area: Rect, selected: usize) {
        let mut lines = vec![Line::from(Span::styled("Choose your difficulty", HEADER_STYLE)), Line::from("")];
        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let marker = if i == selected { "> " } else { "  " };
            let style = if i == selected { INFO_STYLE } else { Style::default() };
            lines.push(Line::from(Span::styled(
                format!(
                    "{marker}{}. {:<6}  {}s per word, depth {}, {} lifeline(s)",
                    i + 1,
                    difficulty.to_string(),
                    difficulty.seconds(),
                    difficulty.max_depth(),
                    difficulty.lifelines_per_round()
                ),
                style,
            )));
        }
        let paragraph = Paragraph::new(lines).block(Block::default().title("Difficulty").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_board(f: &mut Frame, area: Rect, view: &ViewState) {
        let title = match &view.round {
            Some(round) if view.state != TuiState::Loading => format!("Word {}/{}", round.question, round.total),
            _ => "Word".to_string(),
        };
        let lines = match (&view.round, view.state) {
            (_, TuiState::Loading) => vec![Line::from(Span::styled("Loading new word...", INFO_STYLE))],
            (Some(round), _) => vec![
                Line::from(""),
                Line::from(Span::styled(round.masked.clone(), WORD_STYLE)),
                Line::from(""),
                Line::from(Span::styled(format!("Hint: {}", round.hint), MESSAGE_STYLE)),
            ],
            (None, _) => vec![Line::from("")],
        };
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_stats(f: &mut Frame, area: Rect, view: &ViewState) {
        let line = match &view.round {
            Some(round) => {
                let time_style = if round.seconds <= LOW_TIME_SECONDS { ERROR_STYLE } else { Style::default() };
                Line::from(vec![
                    Span::styled(format!("Time: {}s", round.seconds), time_style),
                    Span::raw(format!(
                        "   Score: {}   Reveal Letter ({})   Lifelines left: {}",
                        round.score, round.lifelines, round.pool
                    )),
                ])
            }
            None => Line::from(""),
        };
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, view: &ViewState) {
        let mut lines = Vec::new();

        if view.state == TuiState::Guessing {
            lines.push(Line::from(vec![
                Span::styled("Your guess: ", HEADER_STYLE),
                Span::raw(format!("{}_", view.current_input)),
            ]));
            lines.push(Line::from(""));
        }

        if !view.message.is_empty() {
            lines.push(Line::from(Span::styled(view.message.clone(), view.message_style)));
        }

        if !view.error_message.is_empty() {
            lines.push(Line::from(Span::styled(view.error_message.clone(), ERROR_STYLE)));
        }

        if !view.summary.is_empty() {
            lines.push(Line::from(""));
            for (i, entry) in view.summary.iter().enumerate() {
                let style = if i == 0 { SUCCESS_STYLE } else { Style::default() };
                lines.push(Line::from(Span::styled(entry.clone(), style)));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::ChoosingDifficulty { .. } => "UP/DOWN: Select | ENTER or 1-3: Start | ESC: Quit",
            TuiState::Loading => "Searching for a word...",
            TuiState::Guessing => "Type your guess | ENTER: Submit | TAB or ?: Reveal a letter | ESC: Quit",
            TuiState::RoundOver => "ENTER: Next word | ESC: Quit",
            TuiState::GameOver => "Y/ENTER: Play again | N/ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    /// Wait up to `timeout` for one key press and interpret it.
    fn handle_input(&mut self, timeout: Duration) -> Result<Option<Command>, io::Error> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        // Filter out non-key events (mouse, focus, etc.)
        let key = match event::read()? {
            Event::Key(key) => key,
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                return Ok(None);
            }
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        // Replacement and control characters show up from escape sequences when alt-tabbing
        if let KeyCode::Char(c) = key.code {
            if c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD {
                debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
                return Ok(None);
            }
        }

        debug_log!("handle_input() - Key {:?} in state {:?}", key.code, self.view.state);
        Ok(self.view.handle_key(key))
    }

    /// Block until a command arrives. Input errors count as quitting.
    fn wait_for_command(&mut self) -> Command {
        loop {
            self.draw_or_log();
            match self.handle_input(Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(Some(command)) => return command,
                Ok(None) => {}
                Err(e) => {
                    debug_log!("wait_for_command() - Input error: {}", e);
                    return Command::Quit;
                }
            }
        }
    }
}

impl GameInterface for TuiInterface {
    fn choose_difficulty(&mut self) -> Option<Difficulty> {
        self.view.state = TuiState::ChoosingDifficulty { selected: 1 };
        self.view.round = None;
        self.view.summary.clear();
        self.view.message.clear();
        self.view.status = "Choose a difficulty to begin".to_string();
        loop {
            match self.wait_for_command() {
                Command::Choose(difficulty) => {
                    info_log!("choose_difficulty() - {}", difficulty);
                    return Some(difficulty);
                }
                Command::Quit | Command::Act(UserAction::Exit) => return None,
                _ => {}
            }
        }
    }

    fn display_loading(&mut self, question: usize, total: usize) {
        self.view.begin_loading(question, total);
        self.draw_or_log();
    }

    fn display_round(&mut self, round: &RoundState, session: &SessionState) {
        self.view.state = TuiState::Guessing;
        self.view.round = Some(RoundView::from_round(round, session));
        self.view.status = "Waiting for guess...".to_string();
        self.draw_or_log();
    }

    fn display_tick(&mut self, round: &RoundState, session: &SessionState) {
        self.view.round = Some(RoundView::from_round(round, session));
        self.draw_or_log();
    }

    fn display_invalid_guess(&mut self) {
        self.view.error_message = "Please enter a guess!".to_string();
        self.draw_or_log();
    }

    fn display_outcome(&mut self, round: &RoundState, session: &SessionState) {
        self.view.state = TuiState::RoundOver;
        self.view.round = Some(RoundView::from_round(round, session));
        self.view.current_input.clear();
        self.view.message = describe_outcome(round).unwrap_or_default();
        self.view.message_style = match round.outcome() {
            Some(Outcome::Correct) => SUCCESS_STYLE,
            _ => ERROR_STYLE,
        };
        self.view.status = format!("Score: {}", session.score_total);
        self.draw_or_log();
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.view.state = TuiState::GameOver;
        self.view.message = "Game Complete!".to_string();
        self.view.message_style = HEADER_STYLE;
        self.view.summary = summary.to_string().lines().map(str::to_string).collect();
        self.view.status = "Game over".to_string();
        self.draw_or_log();
    }

    fn read_action(&mut self, timeout: Duration) -> Option<UserAction> {
        self.draw_or_log();
        match self.handle_input(timeout) {
            Ok(Some(Command::Act(action))) => {
                info_log!("read_action() - {:?}", action);
                Some(action)
            }
            Ok(Some(Command::Quit)) => Some(UserAction::Exit),
            Ok(_) => None,
            Err(e) => {
                debug_log!("read_action() - Input error: {}", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn confirm_play_again(&mut self) -> bool {
        loop {
            match self.wait_for_command() {
                Command::PlayAgain(again) => return again,
                Command::Quit | Command::Act(UserAction::Exit) => return false,
                _ => {}
            }
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
