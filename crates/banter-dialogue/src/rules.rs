//! Rule table loading and normalization.
//!
//! One rule per source line: `[optional-tag]kw1,kw2,kw3|Response text`.
//! Malformed lines are skipped individually; a load never fails as a whole.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Reply used when no rule matches and the rule source supplied no override.
pub const DEFAULT_FALLBACK_RESPONSE: &str = "Hmm, I don't have a good answer for that one.";

/// Separator between the keyword segment and the response segment.
const SEPARATOR: char = '|';

/// Reserved keyword marking a line as the fallback-response override.
const FALLBACK_KEYWORD: &str = "fallback";

/// A single canned-answer rule: any keyword hit selects the response.
///
/// Keywords are normalized (trimmed, lower-cased, non-empty) at load time and
/// kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub keywords: Vec<String>,
    pub response: String,
}

/// Immutable-after-load table of rules plus one fallback response.
///
/// Rule order is declaration order and doubles as match precedence.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<Rule>,
    fallback_response: String,
}

enum ParsedLine {
    Rule(Rule),
    FallbackOverride(String),
    Skip,
}

fn leading_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[[^\]]*\]").expect("Invalid tag regex"))
}

/// Parse one source line.
///
/// Lines without a separator, lines whose response segment is empty, and
/// lines whose keyword list normalizes to nothing are all skipped.
fn parse_line(line: &str) -> ParsedLine {
    let Some((head, tail)) = line.split_once(SEPARATOR) else {
        return ParsedLine::Skip;
    };

    let response = tail.trim();
    if response.is_empty() {
        debug!(line, "Rule line has no response segment, skipped");
        return ParsedLine::Skip;
    }

    let head = leading_tag_re().replace(head, "");
    let keywords: Vec<String> = head
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    if keywords.is_empty() {
        debug!(line, "Rule line has no usable keywords, skipped");
        return ParsedLine::Skip;
    }

    if keywords.iter().any(|k| k == FALLBACK_KEYWORD) {
        return ParsedLine::FallbackOverride(response.to_string());
    }

    ParsedLine::Rule(Rule {
        keywords,
        response: response.to_string(),
    })
}

impl RuleStore {
    /// Build a store from raw source lines.
    ///
    /// The last fallback-tagged line wins; everything else becomes a rule in
    /// declaration order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        let mut fallback_response = DEFAULT_FALLBACK_RESPONSE.to_string();

        for line in lines {
            match parse_line(line.as_ref()) {
                ParsedLine::Rule(rule) => rules.push(rule),
                ParsedLine::FallbackOverride(response) => fallback_response = response,
                ParsedLine::Skip => {}
            }
        }

        debug!(rule_count = rules.len(), "Rule store loaded");
        Self {
            rules,
            fallback_response,
        }
    }

    /// An empty store with the built-in default fallback. Used when the rule
    /// source is absent.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback_response: DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Rules in declaration (= precedence) order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The reply used when no rule matches.
    pub fn fallback_response(&self) -> &str {
        &self.fallback_response
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::empty()
    }
}
