//! # APT Repository Chain for `eza`
//!
//! On apt hosts the package-manager strategy is itself a chain of three
//! attempts, tried in this exact order:
//!
//! 1. the distribution's default repositories,
//! 2. the signed `deb.gierens.de` repository maintained by the eza authors,
//! 3. Debian backports for the host's release codename.
//!
//! The order decides whose signing key ends up trusted on the host, so it is
//! fixed rather than chosen per run.

use std::path::Path;

use colored::Colorize;
use tempfile::TempDir;

use crate::errors::SetupError;
use crate::installers::package_manager::{self, PackageManager};
use crate::libs::host::Host;
use crate::libs::tool_resolver::FallbackStrategy;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::{log_debug, log_info};

const GIERENS_KEY_URL: &str = "https://raw.githubusercontent.com/eza-community/eza/main/deb.asc";
const GIERENS_KEYRING: &str = "/etc/apt/keyrings/gierens.gpg";
const GIERENS_LIST: &str = "/etc/apt/sources.list.d/gierens.list";
const GIERENS_SOURCE: &str =
    "deb [signed-by=/etc/apt/keyrings/gierens.gpg] http://deb.gierens.de stable main\n";

const DEBIAN_ARCHIVE_KEYRING: &str = "/usr/share/keyrings/debian-archive-keyring.gpg";
const DEFAULT_CODENAME: &str = "bookworm";
const OS_RELEASE: &str = "/etc/os-release";

/// The three apt attempts for `package`, in order.
pub fn strategies<'s>(host: &'s Host<'s>, package: &'s str) -> Vec<FallbackStrategy<'s>> {
    vec![
        FallbackStrategy::new("apt default repositories", move || {
            package_manager::install(host, PackageManager::Apt, &[package]).map_err(|e| e.to_string())
        }),
        FallbackStrategy::new("apt deb.gierens.de repository", move || {
            add_gierens_repository(host).map_err(|e| e.to_string())?;
            package_manager::install(host, PackageManager::Apt, &[package]).map_err(|e| e.to_string())
        }),
        FallbackStrategy::new("apt debian backports", move || {
            let codename = release_codename(host);
            let suite = add_backports_repository(host, &codename).map_err(|e| e.to_string())?;
            install_from_suite(host, package, &suite).map_err(|e| e.to_string())
        }),
    ]
}

fn privileged_step(host: &Host, operation: &str, spec: CommandSpec) -> Result<(), SetupError> {
    host.runner
        .run_checked(&host.privileged(spec))
        .map(|_| ())
        .map_err(|reason| SetupError::PrivilegedOperationFailed {
            operation: operation.to_string(),
            reason,
        })
}

/// Installs the eza signing key and source list.
fn add_gierens_repository(host: &Host) -> Result<(), SetupError> {
    log_info!("[Tool] Adding the {} apt repository...", "deb.gierens.de".cyan());

    let staging = TempDir::new().map_err(|source| SetupError::CopyFailed {
        from: GIERENS_KEY_URL.to_string(),
        to: std::env::temp_dir(),
        source,
    })?;
    let armored = staging.path().join("gierens.asc");
    host.http
        .download(GIERENS_KEY_URL, &armored)
        .map_err(|source| SetupError::FetchFailed {
            what: "eza repository signing key".to_string(),
            source,
        })?;

    privileged_step(
        host,
        "create apt keyring directory",
        CommandSpec::new("mkdir").args(["-p", "/etc/apt/keyrings"]),
    )?;
    privileged_step(
        host,
        "import eza repository key",
        CommandSpec::new("gpg")
            .args(["--dearmor", "--yes", "-o", GIERENS_KEYRING])
            .arg(armored.to_string_lossy()),
    )?;
    privileged_step(
        host,
        "write eza source list",
        CommandSpec::new("tee").arg(GIERENS_LIST).stdin(GIERENS_SOURCE),
    )?;
    privileged_step(
        host,
        "set repository file permissions",
        CommandSpec::new("chmod").args(["644", GIERENS_KEYRING, GIERENS_LIST]),
    )
}

/// Enables `<codename>-backports` and returns the suite name.
fn add_backports_repository(host: &Host, codename: &str) -> Result<String, SetupError> {
    let suite = format!("{codename}-backports");
    log_info!("[Tool] Enabling Debian {}...", suite.cyan());
    let list = format!("/etc/apt/sources.list.d/{suite}.list");
    let source = format!(
        "deb [signed-by={DEBIAN_ARCHIVE_KEYRING}] http://deb.debian.org/debian {suite} main\n"
    );
    privileged_step(
        host,
        "write backports source list",
        CommandSpec::new("tee").arg(list).stdin(source),
    )?;
    Ok(suite)
}

fn install_from_suite(host: &Host, package: &str, suite: &str) -> Result<(), SetupError> {
    let noninteractive = |spec: CommandSpec| spec.env("DEBIAN_FRONTEND", "noninteractive");
    privileged_step(host, "apt-get update", noninteractive(CommandSpec::new("apt-get").arg("update")))?;
    privileged_step(
        host,
        &format!("apt-get install -t {suite} {package}"),
        noninteractive(CommandSpec::new("apt-get").args(["install", "-y", "-t", suite, package])),
    )
}

/// `VERSION_CODENAME` from `/etc/os-release`, `bookworm` when unknown.
pub fn release_codename(host: &Host) -> String {
    let codename = host
        .fs
        .read(Path::new(OS_RELEASE))
        .ok()
        .and_then(|bytes| parse_codename(&String::from_utf8_lossy(&bytes)));
    log_debug!("[Tool] os-release codename: {:?}", codename);
    codename.unwrap_or_else(|| DEFAULT_CODENAME.to_string())
}

fn parse_codename(os_release: &str) -> Option<String> {
    os_release
        .lines()
        .filter_map(|line| line.trim().strip_prefix("VERSION_CODENAME="))
        .map(|v| v.trim().trim_matches('"').to_string())
        .find(|v| !v.is_empty())
}
