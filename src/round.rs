//! Lifecycle of a single question.
//!
//! ```text
//! Loading -> Active -> Resolved(Correct | Incorrect | Timeout)
//! ```
//!
//! `Loading` belongs to whoever is fetching the word; a `RoundState` is born
//! `Active`. Every operation on a resolved round is a silent no-op.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::AUTO_REVEALED_LETTERS;
use crate::debug_log;
use crate::error::GuessError;

pub const MASK_PLACEHOLDER: char = '_';

/// Minimum points for a correct answer, however slow.
pub const MIN_POINTS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Masked,
    Shown(char),
}

impl Slot {
    pub fn is_masked(self) -> bool {
        matches!(self, Self::Masked)
    }

    pub fn display(self) -> char {
        match self {
            Self::Masked => MASK_PLACEHOLDER,
            Self::Shown(c) => c,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Resolved(Outcome),
}

/// Similarity between two strings on a 0-100 scale.
///
/// Based on the normalized Damerau-Levenshtein distance, so a swapped pair of
/// letters costs a single edit.
pub fn similarity(guess: &str, target: &str) -> u32 {
    let ratio = strsim::normalized_damerau_levenshtein(guess, target);
    (ratio * 100.0).round() as u32
}

#[derive(Clone, Debug)]
pub struct RoundState {
    word: String,
    hint: String,
    letters: Vec<char>,
    masked_letters: Vec<Slot>,
    lifelines_remaining: u32,
    seconds_remaining: u32,
    phase: Phase,
    points_awarded: u32,
    last_similarity: Option<u32>,
}

impl RoundState {
    /// Mask every alphabetic character of `word` and reveal two of them at random.
    ///
    /// `lifeline_available` reflects whether the session pool still has lifelines;
    /// a round never grants more than one.
    pub fn start<R: Rng + ?Sized>(
        word: &str,
        hint: &str,
        seconds: u32,
        lifeline_available: bool,
        rng: &mut R,
    ) -> Self {
        let letters: Vec<char> = word.chars().collect();
        let masked_letters = letters
            .iter()
            .map(|&c| if c.is_alphabetic() { Slot::Masked } else { Slot::Shown(c) })
            .collect();

        let mut round = Self {
            word: word.to_string(),
            hint: hint.to_string(),
            letters,
            masked_letters,
            lifelines_remaining: u32::from(lifeline_available),
            seconds_remaining: seconds,
            phase: Phase::Active,
            points_awarded: 0,
            last_similarity: None,
        };

        let hidden = round.masked_positions();
        for &idx in hidden.choose_multiple(rng, AUTO_REVEALED_LETTERS) {
            round.reveal(idx);
        }
        debug_log!("RoundState::start() - '{}' shown as '{}'", round.word, round.masked_display());

        // A zero-second clock has nothing left to count
        if seconds == 0 {
            round.resolve(Outcome::Timeout);
        }
        round
    }

    fn masked_positions(&self) -> Vec<usize> {
        self.masked_letters
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_masked())
            .map(|(i, _)| i)
            .collect()
    }

    fn reveal(&mut self, idx: usize) {
        self.masked_letters[idx] = Slot::Shown(self.letters[idx]);
    }

    fn resolve(&mut self, outcome: Outcome) {
        self.phase = Phase::Resolved(outcome);
        for idx in 0..self.letters.len() {
            self.reveal(idx);
        }
    }

    /// Advance the clock by one second. Returns `true` if this tick ran the clock out.
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            debug_log!("RoundState::tick() - time is up for '{}'", self.word);
            self.resolve(Outcome::Timeout);
            return true;
        }
        false
    }

    /// Reveal one random masked letter, paid for from `pool`.
    ///
    /// At most one reveal per round. Returns the revealed position, or `None`
    /// when nothing happened.
    pub fn use_lifeline<R: Rng + ?Sized>(&mut self, pool: &mut u32, rng: &mut R) -> Option<usize> {
        if !self.is_active() || self.lifelines_remaining == 0 || *pool == 0 {
            return None;
        }
        let idx = *self.masked_positions().choose(rng)?;
        self.reveal(idx);
        *pool -= 1;
        self.lifelines_remaining = 0;
        debug_log!("RoundState::use_lifeline() - revealed position {}, pool now {}", idx, pool);
        Some(idx)
    }

    /// Score `text` against the answer.
    ///
    /// Blank input is rejected without touching the round. On a resolved round this
    /// is a no-op returning `Ok(None)`.
    pub fn submit_guess(&mut self, text: &str, threshold: u32) -> Result<Option<Outcome>, GuessError> {
        if !self.is_active() {
            return Ok(None);
        }
        let guess = text.trim().to_lowercase();
        if guess.is_empty() {
            return Err(GuessError::InvalidGuess);
        }

        let score = similarity(&guess, &self.word.to_lowercase());
        self.last_similarity = Some(score);
        let outcome = if score >= threshold {
            self.points_awarded = MIN_POINTS.max(self.seconds_remaining / 2);
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        debug_log!(
            "RoundState::submit_guess() - '{}' vs '{}' scored {} -> {:?}",
            guess,
            self.word,
            score,
            outcome
        );
        self.resolve(outcome);
        Ok(Some(outcome))
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn masked_letters(&self) -> &[Slot] {
        &self.masked_letters
    }

    /// Letters separated by spaces, masked ones as `_`.
    pub fn masked_display(&self) -> String {
        let chars: Vec<String> = self.masked_letters.iter().map(|s| s.display().to_string()).collect();
        chars.join(" ")
    }

    /// Alphabetic positions currently visible.
    pub fn revealed_count(&self) -> usize {
        self.letters
            .iter()
            .zip(&self.masked_letters)
            .filter(|(c, slot)| c.is_alphabetic() && !slot.is_masked())
            .count()
    }

    pub fn lifelines_remaining(&self) -> u32 {
        self.lifelines_remaining
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn points_awarded(&self) -> u32 {
        self.points_awarded
    }

    pub fn last_similarity(&self) -> Option<u32> {
        self.last_similarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start(word: &str, seconds: u32, lifeline: bool, seed: u64) -> RoundState {
        let mut rng = StdRng::seed_from_u64(seed);
        RoundState::start(word, "a hint", seconds, lifeline, &mut rng)
    }

    #[test]
    fn test_similarity_scale() {
        assert_eq!(similarity("world", "world"), 100);
        assert_eq!(similarity("xyz", "world"), 0);
        assert!(similarity("wrold", "world") >= 80);
        assert!(similarity("wor", "world") < 80);
    }

    #[test]
    fn test_start_masks_and_reveals_two() {
        for seed in 0..20 {
            let round = start("planet", 25, true, seed);
            assert_eq!(round.masked_letters().len(), 6);
            assert_eq!(round.revealed_count(), 2);
            assert!(round.is_active());
            for (slot, c) in round.masked_letters().iter().zip("planet".chars()) {
                if let Slot::Shown(shown) = slot {
                    assert_eq!(*shown, c);
                }
            }
        }
    }

    #[test]
    fn test_non_alphabetic_never_masked() {
        let round = start("ice-cream cone", 30, true, 3);
        let word: Vec<char> = "ice-cream cone".chars().collect();
        assert_eq!(round.masked_letters().len(), word.len());
        assert_eq!(round.masked_letters()[3], Slot::Shown('-'));
        assert_eq!(round.masked_letters()[9], Slot::Shown(' '));
        assert_eq!(round.revealed_count(), 2);
    }

    #[test]
    fn test_short_words_reveal_what_they_can() {
        let round = start("a", 30, true, 1);
        assert_eq!(round.masked_letters(), &[Slot::Shown('a')]);

        let round = start("--", 30, true, 1);
        assert_eq!(round.revealed_count(), 0);
        assert_eq!(round.masked_display(), "- -");
    }

    #[test]
    fn test_masked_display() {
        let round = start("ab", 30, true, 1);
        assert_eq!(round.masked_display(), "a b");

        let round = start("abcdef", 30, true, 1);
        assert_eq!(round.masked_display().matches(MASK_PLACEHOLDER).count(), 4);
    }

    #[test]
    fn test_lifeline_initialization() {
        assert_eq!(start("planet", 25, true, 1).lifelines_remaining(), 1);
        assert_eq!(start("planet", 25, false, 1).lifelines_remaining(), 0);
    }

    #[test]
    fn test_lifeline_reveals_once() {
        let mut round = start("planet", 25, true, 5);
        let mut pool = 3;
        let mut rng = StdRng::seed_from_u64(9);

        let idx = round.use_lifeline(&mut pool, &mut rng).unwrap();
        assert_eq!(round.masked_letters()[idx], Slot::Shown("planet".chars().nth(idx).unwrap()));
        assert_eq!(round.revealed_count(), 3);
        assert_eq!(pool, 2);
        assert_eq!(round.lifelines_remaining(), 0);

        assert_eq!(round.use_lifeline(&mut pool, &mut rng), None);
        assert_eq!(round.revealed_count(), 3);
        assert_eq!(pool, 2);
    }

    #[test]
    fn test_lifeline_with_empty_pool_is_noop() {
        let mut round = start("planet", 25, true, 5);
        let mut pool = 0;
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(round.use_lifeline(&mut pool, &mut rng), None);
        assert_eq!(round.revealed_count(), 2);
        assert_eq!(round.lifelines_remaining(), 1);
    }

    #[test]
    fn test_lifeline_without_masked_letters_keeps_pool() {
        let mut round = start("ab", 25, true, 5);
        let mut pool = 4;
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(round.use_lifeline(&mut pool, &mut rng), None);
        assert_eq!(pool, 4);
    }

    #[test]
    fn test_correct_guess() {
        let mut round = start("world", 20, true, 1);
        assert_eq!(round.submit_guess("wrold", 80), Ok(Some(Outcome::Correct)));
        assert_eq!(round.phase(), Phase::Resolved(Outcome::Correct));
        assert_eq!(round.points_awarded(), 10);
        assert_eq!(round.masked_display(), "w o r l d");
    }

    #[test]
    fn test_guess_is_normalized() {
        let mut round = start("world", 20, true, 1);
        assert_eq!(round.submit_guess("  WORLD \n", 80), Ok(Some(Outcome::Correct)));
        assert_eq!(round.last_similarity(), Some(100));
    }

    #[test]
    fn test_incorrect_guess_reveals_word() {
        let mut round = start("world", 20, true, 1);
        assert_eq!(round.submit_guess("xyz", 80), Ok(Some(Outcome::Incorrect)));
        assert_eq!(round.points_awarded(), 0);
        assert!(round.masked_letters().iter().all(|s| !s.is_masked()));
    }

    #[test]
    fn test_blank_guess_rejected_without_change() {
        let mut round = start("world", 20, true, 1);
        let before = round.masked_display();
        assert_eq!(round.submit_guess("   ", 80), Err(GuessError::InvalidGuess));
        assert_eq!(round.submit_guess("", 80), Err(GuessError::InvalidGuess));
        assert!(round.is_active());
        assert_eq!(round.masked_display(), before);
        assert_eq!(round.last_similarity(), None);
    }

    #[test]
    fn test_points_floor_and_speed_bonus() {
        let mut round = start("world", 30, true, 1);
        round.submit_guess("world", 80).unwrap();
        assert_eq!(round.points_awarded(), 15);

        let mut round = start("world", 30, true, 1);
        for _ in 0..25 {
            round.tick();
        }
        assert_eq!(round.seconds_remaining(), 5);
        round.submit_guess("world", 80).unwrap();
        assert_eq!(round.points_awarded(), MIN_POINTS);
    }

    #[test]
    fn test_timeout_after_full_countdown() {
        let mut round = start("world", 20, true, 1);
        for i in 1..20 {
            assert!(!round.tick(), "timed out early at tick {i}");
        }
        assert!(round.tick());
        assert_eq!(round.phase(), Phase::Resolved(Outcome::Timeout));
        assert_eq!(round.seconds_remaining(), 0);

        assert_eq!(round.submit_guess("world", 80), Ok(None));
        assert_eq!(round.phase(), Phase::Resolved(Outcome::Timeout));
        assert!(!round.tick());
    }

    #[test]
    fn test_resolved_round_ignores_everything() {
        let mut round = start("planet", 25, true, 1);
        round.submit_guess("nope", 80).unwrap();
        let mut pool = 5;
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(round.use_lifeline(&mut pool, &mut rng), None);
        assert_eq!(pool, 5);
        assert_eq!(round.submit_guess("planet", 80), Ok(None));
        assert_eq!(round.outcome(), Some(Outcome::Incorrect));
        assert!(!round.tick());
        assert_eq!(round.seconds_remaining(), 25);
    }

    #[test]
    fn test_zero_second_round_is_already_over() {
        let round = start("planet", 0, true, 1);
        assert_eq!(round.outcome(), Some(Outcome::Timeout));
    }
}
