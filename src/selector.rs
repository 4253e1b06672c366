//! Candidate selection over the word graph.
//!
//! A bounded breadth-first search from a seed collects every reachable word
//! that fits the length and alphabetic filter, then picks at random among the
//! candidates found deepest. Shallower candidates are discarded on purpose:
//! farther words make for harder questions.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

use crate::debug_log;
use crate::error::SelectionError;
use crate::graph::{WordGraph, normalize_key};

/// Used when every search attempt comes back empty.
pub const FALLBACK_WORD: &str = "orange";
pub const FALLBACK_HINT: &str = "A citrus fruit known for its vitamin C.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionConstraints {
    pub max_depth: usize,
    pub min_len: usize,
    pub max_len: usize,
}

impl SelectionConstraints {
    /// Length is counted in characters; every character must be alphabetic.
    pub fn accepts(&self, word: &str) -> bool {
        let len = word.chars().count();
        len > 0
            && (self.min_len..=self.max_len).contains(&len)
            && word.chars().all(char::is_alphabetic)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub depth: usize,
}

/// Every word reachable from `seed` within `max_depth` hops that passes the filter,
/// tagged with the depth it was discovered at.
///
/// Words missing from the graph are walked through but have no neighbors and never
/// become candidates.
pub fn collect_candidates(
    graph: &WordGraph,
    seed: &str,
    constraints: &SelectionConstraints,
) -> Vec<Candidate> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::from([(normalize_key(seed), 0)]);
    let mut candidates = Vec::new();

    while let Some((node, depth)) = queue.pop_front() {
        if !visited.insert(node.clone()) {
            continue;
        }
        let Some(entry) = graph.lookup(&node) else {
            continue;
        };
        if constraints.accepts(&node) {
            candidates.push(Candidate { word: node.clone(), depth });
        }
        if depth < constraints.max_depth {
            for neighbor in &entry.neighbors {
                if !visited.contains(neighbor) {
                    queue.push_back((neighbor.clone(), depth + 1));
                }
            }
        }
    }

    candidates
}

/// Pick a word reachable from `seed`, uniformly among the deepest candidates.
pub fn select_word<R: Rng + ?Sized>(
    graph: &WordGraph,
    seed: &str,
    constraints: &SelectionConstraints,
    rng: &mut R,
) -> Option<String> {
    let candidates = collect_candidates(graph, seed, constraints);
    let deepest = candidates.iter().map(|c| c.depth).max()?;
    let top: Vec<&Candidate> = candidates.iter().filter(|c| c.depth == deepest).collect();
    debug_log!(
        "select_word('{}') - {} candidates, {} at depth {}",
        seed,
        candidates.len(),
        top.len(),
        deepest
    );
    top.choose(rng).map(|c| c.word.clone())
}

/// Retry `select_word` from random seeds until it yields a word not in `used`.
pub fn pick_word<R: Rng + ?Sized>(
    graph: &WordGraph,
    constraints: &SelectionConstraints,
    used: &HashSet<String>,
    attempts: usize,
    rng: &mut R,
) -> Result<String, SelectionError> {
    let seeds: Vec<&str> = graph.keys().collect();

    for attempt in 1..=attempts {
        let Some(seed) = seeds.choose(rng) else {
            break;
        };
        match select_word(graph, seed, constraints, rng) {
            Some(word) if !used.contains(&word) => {
                debug_log!("pick_word() - attempt {} found '{}' from seed '{}'", attempt, word, seed);
                return Ok(word);
            }
            Some(word) => {
                debug_log!("pick_word() - attempt {} found used word '{}'", attempt, word);
            }
            None => {
                debug_log!("pick_word() - attempt {} found nothing from '{}'", attempt, seed);
            }
        }
    }

    Err(SelectionError::NoCandidateFound { attempts })
}
