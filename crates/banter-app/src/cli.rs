//! CLI argument definitions for the Banter demo shell.
//!
//! Uses `clap` with derive macros. Priority resolution: CLI args > env vars
//! > config file > defaults.

use std::path::PathBuf;

use clap::Parser;

/// Banter — rule-matched canned answers with a streaming generative fallback.
#[derive(Parser, Debug)]
#[command(name = "banter", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Path to the rule source file (overrides the config value).
    #[arg(short = 'r', long = "rules")]
    pub rules: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BANTER_CONFIG env var > ./banter.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("BANTER_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("banter.toml")
    }

    /// Resolve the rule source path.
    ///
    /// Priority: --rules flag > config file value.
    pub fn resolve_rules_path(&self, config_value: &str) -> PathBuf {
        self.rules
            .clone()
            .unwrap_or_else(|| PathBuf::from(config_value))
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_value: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["banter"]);
        assert!(args.config.is_none());
        assert!(args.rules.is_none());
        assert_eq!(args.resolve_rules_path("rules.txt"), PathBuf::from("rules.txt"));
        assert_eq!(args.resolve_log_level("info"), "info");
    }

    #[test]
    fn test_flags_override_config_values() {
        let args = CliArgs::parse_from([
            "banter",
            "--rules",
            "custom.txt",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.resolve_rules_path("rules.txt"), PathBuf::from("custom.txt"));
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = CliArgs::parse_from(["banter", "-c", "/tmp/b.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/b.toml"));
    }
}
