//! Error types, one enum per component.
//!
//! [`RunError`] is what the run loop returns; its `Display` carries the
//! prefix printed on stderr before the process exits with status 1.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Loading or validating `config.json` failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("option 'Command' not set")]
    MissingCommand,

    #[error("option 'Subreddits' not set")]
    MissingSubreddits,

    #[error("cannot locate home directory (set HOME or SREDD_HOME)")]
    NoHome,
}

/// Fetching or decoding a feed listing failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("{0}")]
    Request(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("{0} consecutive redirects")]
    Redirects(usize),

    /// Non-200 response; holds the status line, e.g. `503 Service Unavailable`.
    #[error("{0}")]
    Status(String),

    #[error("malformed listing: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reading or writing a per-feed state file failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("writing {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// The external command could not be started or did not succeed.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{command}: {source}")]
    Launch { command: String, source: io::Error },

    #[error("{command}: {status}")]
    Failed { command: String, status: ExitStatus },
}

/// A fatal error that ends the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Subreddit error: {0}")]
    Fetch(#[from] FetchError),

    #[error("New posts error: {0}")]
    Store(#[from] StoreError),

    #[error("Command error: {0}")]
    Action(#[from] ActionError),

    #[error("Output error: {0}")]
    Console(#[from] io::Error),

    #[error("Interrupted")]
    Interrupted,
}
