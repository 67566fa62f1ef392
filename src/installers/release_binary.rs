//! # GitHub Release Installer
//!
//! Downloads a prebuilt `<tool>_<target>.tar.gz` for a concrete release tag,
//! unpacks it in a temporary directory and writes the binary into
//! `~/.local/bin` through the host filesystem. Only the staging directory lives
//! on the real disk. Used when the package manager could not provide the tool.

use std::path::Path;

use colored::Colorize;
use tempfile::TempDir;

use crate::errors::{FetchError, SetupError};
use crate::libs::host::Host;
use crate::libs::utilities::binary::{find_binary, install_binary};
use crate::libs::utilities::compression::extract_tar_gz;
use crate::{log_debug, log_info};

const RELEASES_BASE: &str = "https://github.com/eza-community/eza/releases/download";

/// Download URL of the archive for `tag` and `target`.
pub fn asset_url(tool: &str, tag: &str, target: &str) -> String {
    format!("{RELEASES_BASE}/{tag}/{tool}_{target}.tar.gz")
}

/// Installs `tool` from the release archive into `bin_dir`.
///
/// The staging directory is removed when this returns, successful or not.
pub fn install(host: &Host, tool: &str, tag: &str, target: &str, bin_dir: &Path) -> Result<(), SetupError> {
    let url = asset_url(tool, tag, target);
    log_info!("[Tool] Downloading {} {} from {}", tool.bold(), tag.cyan(), url.blue());

    let fetch_failed = |source: FetchError| SetupError::FetchFailed {
        what: format!("{tool} release archive"),
        source,
    };

    let staging = TempDir::new().map_err(|e| fetch_failed(FetchError::Io(e)))?;
    let archive = staging.path().join(format!("{tool}_{target}.tar.gz"));
    host.http.download(&url, &archive).map_err(fetch_failed)?;

    let extracted = extract_tar_gz(&archive, staging.path()).map_err(|e| fetch_failed(FetchError::Io(e)))?;
    let binary = find_binary(&extracted, tool).ok_or_else(|| {
        fetch_failed(FetchError::Remote {
            url: url.clone(),
            reason: format!("archive does not contain a `{tool}` binary"),
        })
    })?;

    let destination = bin_dir.join(tool);
    install_binary(host.fs, &binary, &destination).map_err(|source| SetupError::CopyFailed {
        from: binary.display().to_string(),
        to: destination.clone(),
        source,
    })?;
    log_debug!("[Tool] Staging directory {} cleaned up", staging.path().display());
    log_info!(
        "[Tool] Installed {} to {}",
        tool.bold(),
        destination.display().to_string().green()
    );
    Ok(())
}
