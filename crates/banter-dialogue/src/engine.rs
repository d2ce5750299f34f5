//! Ordered first-hit keyword matching.

use crate::rules::{Rule, RuleStore};

/// The outcome of a successful match: the winning rule and the keyword that
/// hit, both borrowed from the store.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    pub keyword: &'a str,
}

impl RuleMatch<'_> {
    pub fn response(&self) -> &str {
        &self.rule.response
    }
}

/// Resolves an utterance against a rule store.
///
/// Matching is plain substring containment with no word-boundary requirement:
/// the keyword "hi" matches inside "this". That looseness is part of the
/// contract, as is the nested iteration order below; callers relying on rule
/// precedence order their source lines accordingly.
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    store: RuleStore,
}

impl DialogueEngine {
    pub fn new(store: RuleStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// The reply for utterances no rule matches.
    pub fn fallback_response(&self) -> &str {
        self.store.fallback_response()
    }

    /// Find the first matching rule for an utterance.
    ///
    /// Iterates rules in store order and, within each rule, keywords in
    /// declaration order; the first keyword that is a substring of the
    /// lower-cased utterance wins and the search stops immediately. No
    /// scoring, no longest-match preference.
    pub fn match_utterance(&self, utterance: &str) -> Option<RuleMatch<'_>> {
        let normalized = utterance.to_lowercase();

        for rule in self.store.rules() {
            for keyword in &rule.keywords {
                if normalized.contains(keyword.as_str()) {
                    return Some(RuleMatch { rule, keyword });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(lines: &[&str]) -> DialogueEngine {
        DialogueEngine::new(RuleStore::from_lines(lines.iter().copied()))
    }

    // =====================================================================
    // Basic matching
    // =====================================================================

    #[test]
    fn test_simple_match() {
        let eng = engine(&["hello|Hello there!"]);
        let m = eng.match_utterance("hello world").unwrap();
        assert_eq!(m.response(), "Hello there!");
        assert_eq!(m.keyword, "hello");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let eng = engine(&["hello|Hi!"]);
        assert!(eng.match_utterance("HELLO THERE").is_some());
        assert!(eng.match_utterance("HeLLo").is_some());
    }

    #[test]
    fn test_no_match_returns_none() {
        let eng = engine(&["hello|Hi!"]);
        assert!(eng.match_utterance("goodbye").is_none());
    }

    #[test]
    fn test_substring_match_without_word_boundary() {
        // "hi" inside "this" matches; documented contract.
        let eng = engine(&["hi|Hi!"]);
        let m = eng.match_utterance("what is this").unwrap();
        assert_eq!(m.keyword, "hi");
    }

    #[test]
    fn test_empty_store_never_matches() {
        let eng = DialogueEngine::new(RuleStore::empty());
        for utterance in ["hello", "anything at all", "", "fallback"] {
            assert!(eng.match_utterance(utterance).is_none());
        }
    }

    // =====================================================================
    // Precedence
    // =====================================================================

    #[test]
    fn test_earlier_rule_wins() {
        let eng = engine(&["a|R1", "b|R2"]);
        let m = eng.match_utterance("a b").unwrap();
        assert_eq!(m.response(), "R1");
    }

    #[test]
    fn test_keyword_declaration_order_within_rule() {
        let eng = engine(&["zzz,a|R1"]);
        // Both "zzz" and "a" could match "zzz a"; "zzz" is declared first.
        let m = eng.match_utterance("zzz a").unwrap();
        assert_eq!(m.keyword, "zzz");
    }

    #[test]
    fn test_no_longest_match_preference() {
        let eng = engine(&["hi|Short", "hi there|Long"]);
        let m = eng.match_utterance("hi there").unwrap();
        assert_eq!(m.response(), "Short");
    }

    #[test]
    fn test_later_rule_matches_when_earlier_does_not() {
        let eng = engine(&["a|R1", "b|R2"]);
        let m = eng.match_utterance("only b here").unwrap();
        assert_eq!(m.response(), "R2");
    }

    // =====================================================================
    // Determinism
    // =====================================================================

    #[test]
    fn test_match_is_deterministic() {
        let eng = engine(&["hello,hi|Hi!", "bye|Bye!"]);
        let first = eng.match_utterance("hello and bye").map(|m| m.response().to_string());
        for _ in 0..10 {
            let again = eng.match_utterance("hello and bye").map(|m| m.response().to_string());
            assert_eq!(again, first);
        }
    }

    // =====================================================================
    // Fallback
    // =====================================================================

    #[test]
    fn test_fallback_response_from_store() {
        let eng = engine(&["hello|Hi!", "fallback|No idea."]);
        assert!(eng.match_utterance("unrelated").is_none());
        assert_eq!(eng.fallback_response(), "No idea.");
    }

    #[test]
    fn test_fallback_keyword_is_not_matchable() {
        let eng = engine(&["fallback|No idea."]);
        assert!(eng.match_utterance("fallback").is_none());
    }
}
