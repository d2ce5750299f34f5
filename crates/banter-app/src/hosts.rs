//! Console-bound collaborator implementations for the demo shell.
//!
//! Real deployments provide their own: a game engine renders speech bubbles
//! and plays clips; here everything lands on stdout and the log.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{info, warn};

use banter_core::config::AnimationConfig;
use banter_core::types::ChatRole;
use banter_dispatch::{
    group_clips_by_prefix, AnimationDriver, AudioClip, CueGroups, CueLibrary, CuePlayer,
    MessageRenderer, RuleSource,
};

/// Reads rule lines from a plain text file.
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RuleSource for FileRuleSource {
    fn load_rule_lines(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Rule source unavailable, starting with an empty store"
                );
                Vec::new()
            }
        }
    }
}

/// Scans a directory of audio assets and groups them by file-stem prefix.
pub struct DirCueLibrary {
    dir: PathBuf,
}

impl DirCueLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl CueLibrary for DirCueLibrary {
    fn load_cue_groups(&self) -> CueGroups {
        let mut clips = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
                    clips.push(AudioClip::new(stem));
                }
            }
        }
        // Directory iteration order is platform-dependent.
        clips.sort_by(|a, b| a.name.cmp(&b.name));
        group_clips_by_prefix(clips)
    }
}

/// Logs cue playback instead of producing sound.
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play_from(&self, group_key: &str, clips: &[AudioClip]) {
        info!(group = %group_key, clips = clips.len(), "Audio cue");
    }
}

/// Knows exactly the configured trigger names and logs each firing.
pub struct LogAnimationDriver {
    known: Vec<String>,
}

impl LogAnimationDriver {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            known: vec![
                config.greeting_trigger.clone(),
                config.farewell_trigger.clone(),
                config.success_trigger.clone(),
                config.fallback_trigger.clone(),
            ],
        }
    }
}

impl AnimationDriver for LogAnimationDriver {
    fn has_trigger(&self, name: &str) -> bool {
        self.known.iter().any(|k| k == name)
    }

    fn fire(&self, name: &str) {
        info!(trigger = %name, "Animation trigger");
    }
}

/// Prints conversation output to stdout, streaming deltas inline.
#[derive(Default)]
pub struct ConsoleRenderer {
    /// Set while a streamed reply is being printed fragment by fragment, so
    /// the final render only has to close the line.
    streaming: Mutex<bool>,
}

impl MessageRenderer for ConsoleRenderer {
    fn render(&self, text: &str, role: ChatRole) {
        match role {
            ChatRole::User => {}
            ChatRole::Assistant => {
                let mut streaming = self.streaming.lock().unwrap_or_else(|p| p.into_inner());
                if *streaming {
                    *streaming = false;
                    println!();
                } else {
                    println!("banter> {}", text);
                }
            }
            ChatRole::System => {}
        }
    }

    fn render_delta(&self, fragment: &str) {
        let mut streaming = self.streaming.lock().unwrap_or_else(|p| p.into_inner());
        if !*streaming {
            *streaming = true;
            print!("banter> ");
        }
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_rule_source_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "hello|Hi!\nbye|Bye!\n").unwrap();

        let source = FileRuleSource::new(path);
        let lines = source.load_rule_lines();
        assert_eq!(lines, vec!["hello|Hi!", "bye|Bye!"]);
    }

    #[test]
    fn test_file_rule_source_missing_file_is_empty() {
        let source = FileRuleSource::new(PathBuf::from("/nonexistent/rules.txt"));
        assert!(source.load_rule_lines().is_empty());
    }

    #[test]
    fn test_dir_cue_library_groups_by_stem_prefix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["hello_01.wav", "hello_02.wav", "fallback_01.wav"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let library = DirCueLibrary::new(dir.path().to_path_buf());
        let groups = library.load_cue_groups();
        assert_eq!(groups["hello"].len(), 2);
        assert_eq!(groups["fallback"].len(), 1);
    }

    #[test]
    fn test_dir_cue_library_missing_dir_is_empty() {
        let library = DirCueLibrary::new(PathBuf::from("/nonexistent/cues"));
        assert!(library.load_cue_groups().is_empty());
    }

    #[test]
    fn test_log_animation_driver_knows_configured_triggers() {
        let driver = LogAnimationDriver::new(&AnimationConfig::default());
        assert!(driver.has_trigger("greet"));
        assert!(driver.has_trigger("ponder"));
        assert!(!driver.has_trigger("backflip"));
    }
}
