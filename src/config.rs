//! Configuration file support for planedit
//!
//! Reads from .planedit/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// "Did you mean" settings
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Trailing-section settings for notes
    #[serde(default)]
    pub notes: NotesConfig,

    /// Plan file location
    #[serde(default)]
    pub plan: PlanConfig,
}

/// Fuzzy suggestion settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SuggestConfig {
    /// Minimum similarity (0.0 to 1.0) for a suggestion
    /// Default: 0.5
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum number of suggestions shown
    /// Default: 3
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Notes settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotesConfig {
    /// Section that `note` appends to when none is given
    /// Default: "Notes"
    #[serde(default = "default_section")]
    pub section: String,
}

/// Plan file settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlanConfig {
    /// Plan file used when `--file` is not passed
    /// Default: "PLAN.md"
    #[serde(default = "default_plan_file")]
    pub file: PathBuf,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_limit() -> usize {
    3
}

fn default_section() -> String {
    "Notes".to_string()
}

fn default_plan_file() -> PathBuf {
    PathBuf::from("PLAN.md")
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_limit(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            section: default_section(),
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            file: default_plan_file(),
        }
    }
}

impl Config {
    /// Load config from .planedit/config.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        match std::env::current_dir() {
            Ok(dir) => Self::load_from(&dir),
            Err(_) => Self::default(),
        }
    }

    /// Load config by walking up from `start`
    pub fn load_from(start: &Path) -> Self {
        if let Some(path) = Self::find_config_path(start) {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
                    }
                }
            }
        }
        Self::default()
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path(start: &Path) -> Option<PathBuf> {
        let mut dir = start;

        loop {
            let config_path = dir.join(".planedit").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}
