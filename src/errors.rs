//! Error types shared by every `setup-zsh` component.
//!
//! Fatal errors abort an install run immediately and are printed to the user
//! with the failing step and the underlying cause. Recoverable conditions
//! (a missing configuration file, a tool that could not be installed) have
//! their own types so callers can never confuse them with fatal ones.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::libs::dependency_validator::Capability;

/// Failure to load the user configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the configured location. Triggers the bootstrap path.
    #[error("configuration file not found at {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but does not hold the four required fields.
    #[error("configuration file {} is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The file exists but could not be read.
    #[error("could not read configuration file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a network or source-control fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error or non-success HTTP status.
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// The JSON response lacked the expected string field (absent, null or empty).
    #[error("response from {url} has no usable `{field}` field")]
    MissingField { url: String, field: String },

    /// `git clone` (or the framework install routine) exited unsuccessfully.
    #[error("fetching {url} failed: {reason}")]
    Remote { url: String, reason: String },

    #[error("I/O error while fetching: {0}")]
    Io(#[from] io::Error),
}

/// Fatal errors of an install run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("missing required dependencies: {}", format_capabilities(.0))]
    MissingDependencies(Vec<Capability>),

    #[error("{what}: {source}")]
    FetchFailed {
        what: String,
        #[source]
        source: FetchError,
    },

    #[error("could not write {} (from {from}): {source}", .to.display())]
    CopyFailed {
        from: String,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not move {} to {}: {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{operation} failed: {reason}")]
    PrivilegedOperationFailed { operation: String, reason: String },

    #[error("no supported package manager found (looked for {0})")]
    NoPackageManager(String),

    #[error("could not determine the home directory")]
    HomeDirUnavailable,
}

fn format_capabilities(capabilities: &[Capability]) -> String {
    capabilities
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
