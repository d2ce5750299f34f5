//! Collaborator interfaces the host supplies.
//!
//! Rendering, asset loading, audio playback, and animation control all stay
//! on the host side; the dispatcher only decides what to play and when.

use std::collections::HashMap;

use banter_core::types::ChatRole;

/// A handle to one audio asset.
///
/// Assets are named `<group>_<variant>`; the prefix before the first
/// underscore is the cue group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub name: String,
}

impl AudioClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Cue groups keyed by asset-name prefix.
pub type CueGroups = HashMap<String, Vec<AudioClip>>;

/// Supplies the raw rule source lines.
pub trait RuleSource: Send + Sync {
    /// An empty result yields an empty store with the built-in fallback.
    fn load_rule_lines(&self) -> Vec<String>;
}

/// Supplies the audio cue groups.
pub trait CueLibrary: Send + Sync {
    fn load_cue_groups(&self) -> CueGroups;
}

/// Plays one cue from a group.
pub trait CuePlayer: Send + Sync {
    /// Which clip to play (random or otherwise) is the host's choice.
    fn play_from(&self, group_key: &str, clips: &[AudioClip]);
}

/// Fires triggers on the host's animation controller.
pub trait AnimationDriver: Send + Sync {
    fn has_trigger(&self, name: &str) -> bool;
    fn fire(&self, name: &str);
}

/// Renders conversation output.
pub trait MessageRenderer: Send + Sync {
    fn render(&self, text: &str, role: ChatRole);

    /// An incremental fragment of an in-progress reply. Hosts that only show
    /// complete messages can leave the default no-op.
    fn render_delta(&self, fragment: &str) {
        let _ = fragment;
    }
}
