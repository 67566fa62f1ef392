//! Installation state as derived from the filesystem.
//!
//! Nothing here is persisted. Every run re-derives the state of each
//! sub-component from existence checks, which is what makes repeated install
//! and uninstall runs idempotent.

use std::fmt;
use std::path::PathBuf;

/// Installation state of one sub-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Present,
}

impl Presence {
    pub fn is_present(self) -> bool {
        self == Presence::Present
    }

    pub fn from_bool(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }
}

/// What a probed location represents. Used for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    FrameworkRoot,
    Plugin(String),
    Theme(String),
    ShellInterpreter,
    AuxTool,
    ResourceFile,
    Backup,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::FrameworkRoot => f.write_str("framework root"),
            Component::Plugin(id) => write!(f, "plugin {id}"),
            Component::Theme(id) => write!(f, "theme {id}"),
            Component::ShellInterpreter => f.write_str("shell interpreter"),
            Component::AuxTool => f.write_str("auxiliary tool"),
            Component::ResourceFile => f.write_str("shell resource file"),
            Component::Backup => f.write_str("resource file backup"),
        }
    }
}

/// Where a sub-component lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A concrete path; present when it exists.
    Path(PathBuf),
    /// An executable name looked up on the search path.
    Program(String),
}

/// A path plus a "what it represents" tag, handed to the state prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub component: Component,
    pub location: Location,
}

impl Descriptor {
    pub fn path(component: Component, path: impl Into<PathBuf>) -> Self {
        Self {
            component,
            location: Location::Path(path.into()),
        }
    }

    pub fn program(component: Component, name: impl Into<String>) -> Self {
        Self {
            component,
            location: Location::Program(name.into()),
        }
    }
}

/// An external plugin (or theme) and the directory it is cloned into.
///
/// The existence of `target_directory` is the only state signal; no metadata is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    pub identifier: String,
    pub target_directory: PathBuf,
}

/// The single tracked backup/original pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
}
