use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BanterError, Result};

/// Top-level configuration for a Banter deployment.
///
/// Loaded from a TOML file chosen by the host. Each section corresponds to a
/// bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl BanterConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BanterConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BanterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Rule table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path to the rule source file (one rule per line).
    pub path: String,
    /// Reply shown when the same question is submitted twice in a session.
    pub already_asked_response: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: "rules.txt".to_string(),
            already_asked_response: "You already asked me that one.".to_string(),
        }
    }
}

/// Remote generative-text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub base_url: String,
    /// Bearer credential. Hosts typically fill this from an environment
    /// variable rather than the config file.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Optional system prompt inserted at the start of each conversation.
    pub system_prompt: Option<String>,
    /// Connection timeout in seconds. No overall deadline is applied so a
    /// long-running stream is never cut off mid-reply.
    pub connect_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
            connect_timeout_secs: 10,
        }
    }
}

/// Audio cue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory of audio cue assets, named `<group>_<variant>`.
    pub cue_dir: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            cue_dir: "cues".to_string(),
        }
    }
}

/// Animation trigger names exposed by the host's animation controller.
///
/// Explicit configuration instead of an implicit lookup table; hosts whose
/// controllers use different parameter names override these in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fired for greeting-flavored intent keys.
    pub greeting_trigger: String,
    /// Fired for farewell-flavored intent keys.
    pub farewell_trigger: String,
    /// Fired for every other locally matched reply.
    pub success_trigger: String,
    /// Fired for replies produced by the streaming fallback path.
    pub fallback_trigger: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            greeting_trigger: "greet".to_string(),
            farewell_trigger: "farewell".to_string(),
            success_trigger: "respond".to_string(),
            fallback_trigger: "ponder".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BanterConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert!(config.llm.system_prompt.is_none());
        assert_eq!(config.animation.success_trigger, "respond");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = BanterConfig::default();
        config.llm.model = "test-model".to_string();
        config.llm.system_prompt = Some("You are a mascot.".to_string());
        config.animation.greeting_trigger = "wave".to_string();
        config.save(&path).unwrap();

        let loaded = BanterConfig::load(&path).unwrap();
        assert_eq!(loaded.llm.model, "test-model");
        assert_eq!(loaded.llm.system_prompt.as_deref(), Some("You are a mascot."));
        assert_eq!(loaded.animation.greeting_trigger, "wave");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = BanterConfig::load(Path::new("/nonexistent/banter.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = BanterConfig::load_or_default(Path::new("/nonexistent/banter.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_or_default_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "general = [[[").unwrap();

        let config = BanterConfig::load_or_default(&path);
        assert_eq!(config.llm.model, LlmConfig::default().model);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"local-llama\"\n").unwrap();

        let config = BanterConfig::load(&path).unwrap();
        assert_eq!(config.llm.model, "local-llama");
        // Untouched sections come from Default.
        assert_eq!(config.rules.path, "rules.txt");
        assert_eq!(config.animation.fallback_trigger, "ponder");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/config.toml");
        BanterConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
