//! Background word search.
//!
//! The search may take a while on a large graph, so it runs on its own thread
//! and posts a single [`WordPick`] back over a channel. The worker only reads the
//! shared graph and its own copy of the request.

use crossbeam_channel::Receiver;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crate::graph::WordGraph;
use crate::info_log;
use crate::sanitizer::get_hint;
use crate::selector::{FALLBACK_HINT, FALLBACK_WORD, SelectionConstraints, pick_word};

const WORKER_NAME: &str = "word-search";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub constraints: SelectionConstraints,
    /// Snapshot of the session's used words at request time.
    pub used_words: HashSet<String>,
    pub attempts: usize,
}

/// Word and sanitized hint ready for a new round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPick {
    pub word: String,
    pub hint: String,
    /// The search failed and the fixed default pair was used.
    pub fallback: bool,
}

impl WordPick {
    pub fn fallback() -> Self {
        Self {
            word: FALLBACK_WORD.to_string(),
            hint: FALLBACK_HINT.to_string(),
            fallback: true,
        }
    }
}

/// Run the search synchronously.
pub fn find_word<R: Rng + ?Sized>(graph: &WordGraph, request: &SearchRequest, rng: &mut R) -> WordPick {
    match pick_word(graph, &request.constraints, &request.used_words, request.attempts, rng) {
        Ok(word) => {
            let hint = get_hint(graph, &word, rng);
            WordPick { word, hint, fallback: false }
        }
        Err(e) => {
            log::warn!("{e}, falling back to '{FALLBACK_WORD}'");
            WordPick::fallback()
        }
    }
}

/// Start a search on a worker thread. The pick arrives on the returned receiver.
///
/// Dropping the receiver abandons the search; the worker's send then fails quietly.
pub fn spawn_search(graph: Arc<WordGraph>, request: SearchRequest) -> Receiver<WordPick> {
    let (tx, rx) = crossbeam_channel::bounded(1);

    let worker_tx = tx.clone();
    let worker_graph = Arc::clone(&graph);
    let worker_request = request.clone();
    let spawned = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            let pick = find_word(&worker_graph, &worker_request, &mut rand::thread_rng());
            info_log!("Word search finished with '{}'", pick.word);
            let _ = worker_tx.send(pick);
        });

    if let Err(e) = spawned {
        log::warn!("Could not start {WORKER_NAME} thread ({e}), searching inline");
        let _ = tx.send(find_word(&graph, &request, &mut rand::thread_rng()));
    }
    rx
}
