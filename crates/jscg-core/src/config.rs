//! Configuration loading and parsing for jscg
//!
//! Provides functionality to load and parse `jscg.toml` configuration files.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::flow::Strategy;

pub const CONFIG_FILENAME: &str = "jscg.toml";

/// Top-level keys, and for tables the keys they accept.
const SCHEMA: &[(&str, &[&str])] = &[
    ("include", &[]),
    ("exclude", &[]),
    ("analysis", &["strategy", "natives"]),
];

pub const DEFAULT_CONFIG: &str = r#"# jscg configuration

# Regular expressions matched against each input path. `include` re-adds
# files removed by `exclude`.
include = []
exclude = ["node_modules", "\\.min\\.js$"]

[analysis]
# "demand" or "full" (full currently runs demand)
strategy = "demand"
# Seed built-in functions such as Math.log and Array.prototype.map
natives = true
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub strategy: Strategy,
    pub natives: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Demand,
            natives: true,
        }
    }
}

impl Config {
    /// `-` filters for `exclude` followed by `+` filters for `include`, in
    /// the form the CLI's `--filter` option takes.
    pub fn filters(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|pattern| format!("-{}", pattern))
            .chain(self.include.iter().map(|pattern| format!("+{}", pattern)))
            .collect()
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    Ok((config, content))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    read_config(path).map(|(config, _)| config)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let (config, content) = read_config(path)?;
    let warnings = detect_unknown_keys(&content);
    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for (key, value) in &table {
        let Some((_, nested)) = SCHEMA.iter().find(|(name, _)| *name == key.as_str()) else {
            warnings.push(format!("Unknown config option: '{}'", key));
            continue;
        };
        if let toml::Value::Table(section) = value {
            warnings.extend(
                section
                    .keys()
                    .filter(|k| !nested.contains(&k.as_str()))
                    .map(|k| format!("Unknown config option in [{}]: '{}'", key, k)),
            );
        }
    }
    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

/// Like [`load_config_or_default`], but an unreadable or invalid file is
/// reported as a warning instead of being ignored silently.
pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    let Some(path) = find_config_file(start_dir) else {
        return ConfigResult::default();
    };
    load_config_with_warnings(&path).unwrap_or_else(|err| ConfigResult {
        config: Config::default(),
        warnings: vec![format!("{}; using defaults", err)],
    })
}
