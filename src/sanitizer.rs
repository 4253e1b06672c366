//! Hint sanitization: keep the answer out of its own clue.

use rand::Rng;
use rand::seq::SliceRandom;
use regex::{NoExpand, RegexBuilder};

use crate::debug_log;
use crate::graph::WordGraph;

/// Stand-ins for the answer. One is picked per call and used for every occurrence.
pub const SUBSTITUTES: [&str; 4] = ["this word", "it", "this term", "the answer"];

/// Used when every entry of [`SUBSTITUTES`] would itself name the answer.
pub const NEUTRAL_SUBSTITUTE: &str = "the solution";

/// Returned whenever there is no usable hint.
pub const GENERIC_HINT: &str = "Think about this word carefully.";

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace whole-word, case-insensitive occurrences of `word` in `hint`.
///
/// When the word occurs, the hint is lowercased, every occurrence becomes the same
/// randomly chosen substitute and the first character is capitalized. Otherwise the
/// hint comes back untouched. An empty hint yields [`GENERIC_HINT`].
pub fn sanitize<R: Rng + ?Sized>(word: &str, hint: &str, rng: &mut R) -> String {
    if hint.trim().is_empty() {
        return GENERIC_HINT.to_string();
    }

    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return hint.to_string();
    }

    let pattern = format!(r"\b{}\b", regex::escape(&word));
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            debug_log!("sanitize() - could not build pattern for '{}': {}", word, e);
            return hint.to_string();
        }
    };

    if !re.is_match(hint) {
        return hint.to_string();
    }

    // A substitute containing the answer would put it straight back
    let pool: Vec<&str> = SUBSTITUTES.iter().copied().filter(|s| !re.is_match(s)).collect();
    let substitute = pool.choose(rng).copied().unwrap_or(NEUTRAL_SUBSTITUTE);
    let lowered = hint.to_lowercase();
    let replaced = re.replace_all(&lowered, NoExpand(substitute));
    capitalize_first(&replaced)
}

/// The sanitized hint for `word`, never empty.
pub fn get_hint<R: Rng + ?Sized>(graph: &WordGraph, word: &str, rng: &mut R) -> String {
    match graph.lookup(word) {
        Some(entry) => sanitize(&entry.word, &entry.hint, rng),
        None => GENERIC_HINT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn whole_word_present(word: &str, text: &str) -> bool {
        let re = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(word)))
            .case_insensitive(true)
            .build()
            .unwrap();
        re.is_match(text)
    }

    #[test]
    fn test_pet_scenario() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hint = sanitize("cat", "A cat is a pet.", &mut rng);
            assert!(!hint.to_lowercase().contains("cat"), "leaked: {hint}");
            assert!(SUBSTITUTES.iter().any(|s| hint.contains(s)), "no substitute: {hint}");
            assert!(hint.starts_with('A'));
            assert!(hint.ends_with("is a pet."));
        }
    }

    #[test]
    fn test_answer_never_reintroduced_by_substitute() {
        for word in ["answer", "term", "word", "this", "it"] {
            for seed in 0..40 {
                let mut rng = StdRng::seed_from_u64(seed);
                let hint = sanitize(word, &format!("Think of the {word} here."), &mut rng);
                assert!(!whole_word_present(word, &hint), "'{word}' leaked: {hint}");
                assert!(hint.starts_with("Think of the "));
            }
        }
    }

    #[test]
    fn test_leading_occurrence_is_capitalized() {
        let mut rng = StdRng::seed_from_u64(4);
        let hint = sanitize("apple", "Apple pie is made with apples and APPLE juice.", &mut rng);
        let first = hint.chars().next().unwrap();
        assert!(first.is_uppercase());
        assert!(!whole_word_present("apple", &hint));
        // "apples" is a different word and survives, lowercased
        assert!(hint.contains("apples"));
    }

    #[test]
    fn test_all_occurrences_use_the_same_substitute() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hint = sanitize("dog", "dog eat dog world", &mut rng);
            let used: Vec<&&str> = SUBSTITUTES
                .iter()
                .filter(|s| hint.to_lowercase() == format!("{s} eat {s} world"))
                .collect();
            assert_eq!(used.len(), 1, "inconsistent substitution: {hint}");
        }
    }

    #[test]
    fn test_substring_is_not_a_match() {
        let mut rng = StdRng::seed_from_u64(1);
        let hint = "A Category of things.";
        assert_eq!(sanitize("cat", hint, &mut rng), hint);
    }

    #[test]
    fn test_absent_word_returns_hint_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        let hint = "Known as the King of the Beasts.";
        assert_eq!(sanitize("lion", hint, &mut rng), hint);
    }

    #[test]
    fn test_empty_hint_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sanitize("cat", "", &mut rng), GENERIC_HINT);
        assert_eq!(sanitize("cat", "   ", &mut rng), GENERIC_HINT);
    }

    #[test]
    fn test_word_with_regex_metacharacters() {
        let mut rng = StdRng::seed_from_u64(1);
        let hint = sanitize("c.t", "Not a cat, but c.t itself.", &mut rng);
        assert!(hint.contains("cat"));
        assert!(!hint.contains("c.t"));
    }

    #[test]
    fn test_substitute_text_is_literal() {
        let mut rng = StdRng::seed_from_u64(1);
        let hint = sanitize("cash", "Cash is money.", &mut rng);
        assert!(!hint.contains('$'));
    }

    #[test]
    fn test_never_leaks_across_embedded_dataset() {
        let graph = WordGraph::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let words: Vec<String> = graph.keys().map(str::to_string).collect();
        for word in words {
            let hint = get_hint(&graph, &word, &mut rng);
            assert!(!hint.is_empty());
            assert!(!whole_word_present(&word, &hint), "'{word}' leaked in '{hint}'");
        }
    }

    #[test]
    fn test_get_hint_unknown_word() {
        let graph = WordGraph::load_from_str("word,hint,neighbors\ncat,,dog\n").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(get_hint(&graph, "unicorn", &mut rng), GENERIC_HINT);
        assert_eq!(get_hint(&graph, "cat", &mut rng), GENERIC_HINT);
    }

    #[test]
    fn test_get_hint_sanitizes() {
        let graph = WordGraph::load_from_str("word,hint,neighbors\ncat,The cat naps.,dog\n").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let hint = get_hint(&graph, "CAT", &mut rng);
        assert!(!whole_word_present("cat", &hint));
        assert!(hint.ends_with("naps."));
    }
}
