//! # Cargo Installer
//!
//! Last-resort source build: `cargo install <crate> --locked`, pinned with
//! `--version` when a concrete tag was requested. Runs as the invoking user so
//! the binary lands in `~/.cargo/bin`.

use colored::Colorize;

use crate::errors::SetupError;
use crate::libs::host::Host;
use crate::libs::state_prober::find_program;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::log_info;

/// `v0.18.0` -> `0.18.0`; crates.io versions carry no prefix.
pub fn crate_version(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

pub fn install(host: &Host, krate: &str, version: Option<&str>) -> Result<(), SetupError> {
    let cargo = find_program(host, "cargo").ok_or_else(|| SetupError::PrivilegedOperationFailed {
        operation: format!("cargo install {krate}"),
        reason: "cargo not found on PATH".to_string(),
    })?;

    let mut spec = CommandSpec::new(cargo.to_string_lossy()).args(["install", krate, "--locked"]);
    if let Some(tag) = version {
        spec = spec.args(["--version", crate_version(tag)]);
    }
    log_info!(
        "[Tool] Building {} from source with cargo (this can take a few minutes)...",
        krate.bold()
    );

    host.runner
        .run_checked(&spec)
        .map(|_| ())
        .map_err(|reason| SetupError::PrivilegedOperationFailed {
            operation: format!("cargo install {krate}"),
            reason,
        })
}
