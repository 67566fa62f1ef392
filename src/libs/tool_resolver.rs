//! # Tool Fallback Resolver
//!
//! Installs the auxiliary tool (`eza`) on hosts whose packaging is not known in
//! advance. Installation is expressed as an ordered list of [`FallbackStrategy`]
//! values, each a name, a precondition and an action. [`run_strategies`] walks
//! the list in order and stops at the first action that succeeds:
//!
//! 1. the host's primary package manager (on apt, itself a three-repository chain),
//! 2. the prebuilt release archive from GitHub,
//! 3. `cargo install`.
//!
//! A strategy whose precondition does not hold is recorded as skipped and never
//! run. Exhausting the list yields [`ToolInstallFailed`], which the orchestrator
//! records without aborting the run.
//!
//! With a pinned version, a strategy only counts as successful when some
//! installed copy of the tool reports that version afterwards. Installed copies
//! are looked up on `PATH` and in `~/.local/bin` and `~/.cargo/bin`, which a
//! fresh login may not have on `PATH` yet.

use std::fmt;
use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::errors::FetchError;
use crate::installers::package_manager::{self, PackageManager};
use crate::installers::{apt_repositories, cargo, release_binary};
use crate::libs::host::Host;
use crate::libs::state_prober::{find_program, reported_version, version_matches, version_output_at};
use crate::libs::utilities::http::string_field;
use crate::libs::utilities::platform::release_target;
use crate::schemas::configuration::ToolVersion;
use crate::schemas::path_resolver::PathResolver;
use crate::{log_debug, log_info, log_warn};

/// Name of the auxiliary tool, both as a package and as a binary.
pub const TOOL: &str = "eza";
/// Version discovery endpoint; the version is the `tag_name` field.
pub const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/eza-community/eza/releases/latest";

type Check<'s> = Box<dyn Fn() -> Result<(), String> + 's>;

/// One named attempt within the resolver's ordered list.
pub struct FallbackStrategy<'s> {
    pub name: String,
    precondition: Check<'s>,
    action: Check<'s>,
}

impl<'s> FallbackStrategy<'s> {
    /// A strategy that is always eligible.
    pub fn new(name: impl Into<String>, action: impl Fn() -> Result<(), String> + 's) -> Self {
        Self {
            name: name.into(),
            precondition: Box::new(|| Ok(())),
            action: Box::new(action),
        }
    }

    /// Only run the action when `precondition` returns `Ok`; `Err` carries the reason.
    pub fn when(mut self, precondition: impl Fn() -> Result<(), String> + 's) -> Self {
        self.precondition = Box::new(precondition);
        self
    }
}

/// What happened to one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Skipped { strategy: String, reason: String },
    Failed { strategy: String, reason: String },
    Succeeded { strategy: String },
}

impl Attempt {
    pub fn strategy(&self) -> &str {
        match self {
            Attempt::Skipped { strategy, .. }
            | Attempt::Failed { strategy, .. }
            | Attempt::Succeeded { strategy } => strategy,
        }
    }

    /// `true` when the action actually ran.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Attempt::Skipped { .. })
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::Skipped { strategy, reason } => write!(f, "{strategy}: skipped ({reason})"),
            Attempt::Failed { strategy, reason } => write!(f, "{strategy}: {reason}"),
            Attempt::Succeeded { strategy } => write!(f, "{strategy}: succeeded"),
        }
    }
}

/// A successful run of the strategy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Name of the strategy that succeeded.
    pub strategy: String,
    /// Version the tool ended up at, when it could be determined.
    pub version: Option<String>,
    pub attempts: Vec<Attempt>,
}

/// Every strategy was skipped or failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not install {tool}: {}", summarize(.attempts))]
pub struct ToolInstallFailed {
    pub tool: String,
    pub attempts: Vec<Attempt>,
}

fn summarize(attempts: &[Attempt]) -> String {
    if attempts.is_empty() {
        return "no installation strategy available".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runs `strategies` in order until one succeeds.
pub fn run_strategies(tool: &str, strategies: Vec<FallbackStrategy<'_>>) -> Result<Resolution, ToolInstallFailed> {
    let mut attempts = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        if let Err(reason) = (strategy.precondition)() {
            log_debug!("[Tool] Skipping '{}': {}", strategy.name, reason);
            attempts.push(Attempt::Skipped {
                strategy: strategy.name,
                reason,
            });
            continue;
        }

        log_info!("[Tool] Trying {} for {}...", strategy.name.cyan(), tool.bold());
        match (strategy.action)() {
            Ok(()) => {
                log_info!("[Tool] {} installed via {}", tool.bold(), strategy.name.green());
                attempts.push(Attempt::Succeeded {
                    strategy: strategy.name.clone(),
                });
                return Ok(Resolution {
                    strategy: strategy.name,
                    version: None,
                    attempts,
                });
            }
            Err(reason) => {
                log_warn!("[Tool] {} failed: {}", strategy.name.yellow(), reason);
                attempts.push(Attempt::Failed {
                    strategy: strategy.name,
                    reason,
                });
            }
        }
    }

    Err(ToolInstallFailed {
        tool: tool.to_string(),
        attempts,
    })
}

/// Result of [`install_tool`] when the tool is usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Already installed (at the requested version when one is pinned). Nothing ran.
    Present(String),
    Installed(Resolution),
}

/// Latest released tag from the discovery endpoint.
pub fn discover_latest(host: &Host) -> Result<String, FetchError> {
    let body = host.http.get_json(LATEST_RELEASE_URL)?;
    let tag = string_field(&body, LATEST_RELEASE_URL, "tag_name")?;
    log_debug!("[Tool] Latest {} release: {}", TOOL, tag);
    Ok(tag)
}

/// Installed copies of the tool: the search path first, then the directories
/// the release archive and `cargo install` write to.
fn installed_copies(host: &Host, paths: &PathResolver) -> Vec<PathBuf> {
    let mut copies: Vec<PathBuf> = find_program(host, TOOL).into_iter().collect();
    for dir in [paths.local_bin().to_path_buf(), paths.cargo_bin()] {
        let binary = dir.join(TOOL);
        if !copies.contains(&binary) && host.fs.is_file(&binary) {
            copies.push(binary);
        }
    }
    copies
}

/// First installed copy whose `--version` output contains `tag`.
fn copy_at_version(host: &Host, paths: &PathResolver, tag: &str) -> Option<PathBuf> {
    installed_copies(host, paths)
        .into_iter()
        .find(|binary| version_output_at(host, binary).is_some_and(|output| version_matches(&output, tag)))
}

/// Turns a strategy's success into a failure when the pinned version did not land.
fn confirm_version(host: &Host, paths: &PathResolver, pinned: Option<&str>) -> Result<(), String> {
    let Some(tag) = pinned else {
        return Ok(());
    };
    if copy_at_version(host, paths, tag).is_some() {
        return Ok(());
    }
    let reported = installed_copies(host, paths)
        .first()
        .and_then(|binary| version_output_at(host, binary))
        .and_then(|output| reported_version(&output))
        .unwrap_or_else(|| "no version".to_string());
    Err(format!("installed {TOOL} reports {reported}, not {tag}"))
}

/// Short-circuits when the tool is already present, otherwise runs the strategy list.
pub fn install_tool(host: &Host, paths: &PathResolver, requested: &ToolVersion) -> Result<ToolStatus, ToolInstallFailed> {
    match requested {
        ToolVersion::Pinned(tag) => {
            if let Some(binary) = copy_at_version(host, paths, tag) {
                return Ok(ToolStatus::Present(format!("{TOOL} {tag} at {}", binary.display())));
            }
        }
        ToolVersion::Latest => {
            if let Some(binary) = installed_copies(host, paths).into_iter().next() {
                return Ok(ToolStatus::Present(format!("{TOOL} at {}", binary.display())));
            }
        }
    }

    let version = match requested {
        ToolVersion::Pinned(tag) => Some(tag.clone()),
        ToolVersion::Latest => match discover_latest(host) {
            Ok(tag) => Some(tag),
            Err(e) => {
                log_warn!("[Tool] Version discovery failed: {}", e);
                None
            }
        },
    };

    let strategies = tool_strategies(host, paths, version.as_deref(), requested.pinned());
    let mut resolution = run_strategies(TOOL, strategies)?;
    resolution.version = match requested {
        ToolVersion::Pinned(tag) => Some(tag.clone()),
        ToolVersion::Latest => installed_copies(host, paths)
            .first()
            .and_then(|binary| version_output_at(host, binary))
            .and_then(|output| reported_version(&output))
            .or(version),
    };
    Ok(ToolStatus::Installed(resolution))
}

/// The ordered strategy list for this host.
fn tool_strategies<'s>(
    host: &'s Host<'s>,
    paths: &'s PathResolver,
    version: Option<&'s str>,
    pinned: Option<&'s str>,
) -> Vec<FallbackStrategy<'s>> {
    let manager = package_manager::detect(host);

    vec![
        FallbackStrategy::new("package manager", move || {
            let installed = match manager {
                Some(PackageManager::Apt) => run_strategies(TOOL, apt_repositories::strategies(host, TOOL))
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                Some(pm) => package_manager::install(host, pm, &[TOOL]).map_err(|e| e.to_string()),
                None => Err("no package manager".to_string()),
            };
            installed?;
            confirm_version(host, paths, pinned)
        })
        .when(move || manager.map(|_| ()).ok_or_else(|| "no supported package manager found".to_string())),
        FallbackStrategy::new("GitHub release archive", move || {
            let (Some(tag), Some(target)) = (version, release_target()) else {
                return Err("release archive unavailable".to_string());
            };
            release_binary::install(host, TOOL, tag, target, paths.local_bin()).map_err(|e| e.to_string())?;
            confirm_version(host, paths, pinned)
        })
        .when(move || match (version, release_target()) {
            (None, _) => Err("no concrete version known".to_string()),
            (_, None) => Err("no prebuilt archive for this platform".to_string()),
            _ => Ok(()),
        }),
        FallbackStrategy::new("cargo install", move || {
            cargo::install(host, TOOL, pinned).map_err(|e| e.to_string())?;
            confirm_version(host, paths, pinned)
        })
        .when(move || {
            find_program(host, "cargo")
                .map(|_| ())
                .ok_or_else(|| "cargo not found on PATH".to_string())
        }),
    ]
}
