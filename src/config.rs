//! Run configuration.
//!
//! Loaded once from `<program path>/config.json` and passed by reference to
//! every component; nothing mutates it after [`RunConfig::load`] returns.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Directory name under `$HOME` holding the config and state files.
const PROGRAM_DIR: &str = ".sredd";

/// Overrides the program directory when set.
const HOME_ENV_VAR: &str = "SREDD_HOME";

const CONFIG_FILE: &str = "config.json";

/// On-disk shape of `config.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigFile {
    #[serde(default, alias = "command")]
    command: String,
    #[serde(default, alias = "command_args")]
    command_args: Vec<String>,
    #[serde(default, alias = "filter_comments")]
    filter_comments: bool,
    #[serde(default, alias = "subreddits")]
    subreddits: Vec<String>,
}

/// Immutable settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Command run with the new URLs, e.g. `open`.
    pub command: String,
    /// Leading arguments placed before the URLs, e.g. `["-a", "Safari"]`.
    pub command_args: Vec<String>,
    /// Drop discussion-thread links (`/comments/`).
    pub filter_comments: bool,
    /// Directory holding `config.json` and the `r_<name>.log` state files.
    pub program_path: PathBuf,
    /// Feeds to check, in order.
    pub subreddits: Vec<String>,
}

impl RunConfig {
    /// Resolve the program directory and load `config.json` from it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(program_path()?)
    }

    /// Load `config.json` from the given program directory.
    pub fn load_from(program_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let program_path = program_path.into();
        let path = program_path.join(CONFIG_FILE);
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw, &path, program_path)
    }

    fn parse(raw: &str, path: &Path, program_path: PathBuf) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.command.is_empty() {
            return Err(ConfigError::MissingCommand);
        }
        if file.subreddits.is_empty() {
            return Err(ConfigError::MissingSubreddits);
        }

        tracing::debug!(
            path = %path.display(),
            feeds = file.subreddits.len(),
            "loaded configuration"
        );

        Ok(Self {
            command: file.command,
            command_args: file.command_args,
            filter_comments: file.filter_comments,
            program_path,
            subreddits: file.subreddits,
        })
    }
}

/// `$SREDD_HOME` if set, otherwise `$HOME/.sredd`.
fn program_path() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(PROGRAM_DIR))
        .ok_or(ConfigError::NoHome)
}
