//! Local rule-matching dialogue engine.
//!
//! Provides the statically loaded rule table, ordered first-hit keyword
//! matching, and the session-scoped duplicate-question memory.

pub mod engine;
pub mod memory;
pub mod rules;

pub use engine::{DialogueEngine, RuleMatch};
pub use memory::QuestionMemory;
pub use rules::{Rule, RuleStore, DEFAULT_FALLBACK_RESPONSE};
