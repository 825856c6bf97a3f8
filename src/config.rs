//! Search configuration
//!
//! Settings come from built-in defaults, then an optional JSON file, then
//! command-line overrides. Every field in the file is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{
    Alphabet, SearchError, SearchParams, Selector, Target, DEFAULT_ALPHABET, DEFAULT_MAX_LENGTH,
    DEFAULT_MIN_LENGTH, DEFAULT_PREFIX, DEFAULT_SUFFIX, DEFAULT_TARGET,
};

/// Directory name under the platform config dir
const CONFIG_DIR: &str = "selector-collider";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default seconds between progress lines
pub const DEFAULT_PROGRESS_SECS: u64 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Search settings as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ordered candidate symbols
    pub alphabet: String,
    /// Shortest candidate body
    pub min_length: usize,
    /// Longest candidate body
    pub max_length: usize,
    /// Signature whose selector is sought
    pub target: String,
    /// Raw selector to search for instead of the target's own (hex)
    pub target_selector: Option<String>,
    /// Text before every candidate body
    pub prefix: String,
    /// Text after every candidate body
    pub suffix: String,
    /// Worker threads (default: number of CPU cores)
    pub threads: Option<usize>,
    /// Seconds between progress reports, 0 to disable
    pub progress_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            target: DEFAULT_TARGET.to_string(),
            target_selector: None,
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            threads: None,
            progress_secs: DEFAULT_PROGRESS_SECS,
        }
    }
}

impl Config {
    /// Load a config file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load `explicit` if given, else the default file if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// What the search looks for
    ///
    /// With `target_selector` set, `target` only names the signature to leave
    /// out of the results (an empty `target` excludes nothing).
    pub fn resolve_target(&self) -> Result<Target, ConfigError> {
        match &self.target_selector {
            Some(hex) => {
                let selector: Selector = hex.parse()?;
                if self.target.is_empty() {
                    Ok(Target::from_selector(selector))
                } else {
                    Ok(Target::with_excluded(selector, self.target.clone()))
                }
            }
            None => Ok(Target::from_signature(self.target.clone())),
        }
    }

    pub fn progress_interval(&self) -> Option<Duration> {
        (self.progress_secs > 0).then(|| Duration::from_secs(self.progress_secs))
    }

    /// Validated engine parameters
    pub fn to_params(&self) -> Result<SearchParams, ConfigError> {
        let alphabet = Alphabet::new(&self.alphabet)?;
        let mut params = SearchParams::new(alphabet, self.resolve_target()?)
            .with_lengths(self.min_length, self.max_length)
            .with_prefix(self.prefix.clone())
            .with_suffix(self.suffix.clone())
            .with_progress_interval(self.progress_interval());
        if let Some(threads) = self.threads {
            params = params.with_workers(threads);
        }
        params.validate()?;
        Ok(params)
    }
}

/// `<config dir>/selector-collider/config.json`, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
