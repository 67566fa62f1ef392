//! # Package Manager Installer
//!
//! Detects the host's primary package manager by probing the search path (never
//! by OS name) and installs packages through it non-interactively.
//!
//! Detection order is fixed: `apt-get`, `dnf`, `pacman`, `zypper`, `apk`, `brew`.
//! The first one found is the only one used. Every manager except `brew`
//! runs elevated.

use std::fmt;

use colored::Colorize;

use crate::errors::SetupError;
use crate::libs::host::Host;
use crate::libs::state_prober::find_program;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::{log_debug, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Zypper,
    Apk,
    Brew,
}

/// Probe order.
pub const ALL: [PackageManager; 6] = [
    PackageManager::Apt,
    PackageManager::Dnf,
    PackageManager::Pacman,
    PackageManager::Zypper,
    PackageManager::Apk,
    PackageManager::Brew,
];

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
            PackageManager::Apk => "apk",
            PackageManager::Brew => "brew",
        }
    }

    /// Homebrew refuses to run as root.
    pub fn needs_privileges(self) -> bool {
        !matches!(self, PackageManager::Brew)
    }

    /// Non-interactive install command, before privilege elevation.
    pub fn install_command(self, packages: &[&str]) -> CommandSpec {
        let base = CommandSpec::new(self.program());
        let base = match self {
            PackageManager::Apt => base
                .args(["install", "-y", "--no-install-recommends"])
                .env("DEBIAN_FRONTEND", "noninteractive"),
            PackageManager::Dnf => base.args(["install", "-y"]),
            PackageManager::Pacman => base.args(["-S", "--noconfirm", "--needed"]),
            PackageManager::Zypper => base.args(["--non-interactive", "install"]),
            PackageManager::Apk => base.args(["add", "--no-cache"]),
            PackageManager::Brew => base.arg("install"),
        };
        base.args(packages.iter().copied())
    }

    /// Index refresh to run once before installing, if the manager needs one.
    pub fn refresh_command(self) -> Option<CommandSpec> {
        match self {
            PackageManager::Apt => Some(
                CommandSpec::new("apt-get")
                    .arg("update")
                    .env("DEBIAN_FRONTEND", "noninteractive"),
            ),
            PackageManager::Pacman => Some(CommandSpec::new("pacman").arg("-Sy")),
            _ => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// The first supported package manager found on the search path.
pub fn detect(host: &Host) -> Option<PackageManager> {
    let found = ALL
        .into_iter()
        .find(|pm| find_program(host, pm.program()).is_some());
    log_debug!("[Packages] Detected package manager: {:?}", found);
    found
}

/// Same as [`detect`], but an error naming every manager that was looked for.
pub fn require(host: &Host) -> Result<PackageManager, SetupError> {
    detect(host).ok_or_else(|| {
        SetupError::NoPackageManager(
            ALL.iter()
                .map(|pm| pm.program())
                .collect::<Vec<_>>()
                .join(", "),
        )
    })
}

/// Wraps `spec` for `pm`: elevated unless the manager is Homebrew.
pub fn for_manager(host: &Host, pm: PackageManager, spec: CommandSpec) -> CommandSpec {
    if pm.needs_privileges() {
        host.privileged(spec)
    } else {
        spec
    }
}

/// Refreshes the index (when needed) and installs `packages`.
///
/// # Errors
/// `SetupError::PrivilegedOperationFailed` carrying the failed command's stderr.
pub fn install(host: &Host, pm: PackageManager, packages: &[&str]) -> Result<(), SetupError> {
    let operation = format!("{} install {}", pm, packages.join(" "));
    log_info!("[Packages] Installing {} with {}...", packages.join(", ").cyan(), pm.to_string().bold());

    if let Some(refresh) = pm.refresh_command() {
        // A stale index is not fatal by itself; the install below decides.
        if let Err(reason) = host.runner.run_checked(&for_manager(host, pm, refresh)) {
            log_debug!("[Packages] Index refresh failed: {}", reason);
        }
    }

    host.runner
        .run_checked(&for_manager(host, pm, pm.install_command(packages)))
        .map(|_| ())
        .map_err(|reason| SetupError::PrivilegedOperationFailed { operation, reason })
}
