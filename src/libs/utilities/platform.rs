// Host platform detection used to pick the prebuilt release archive.

use crate::log_debug;
use colored::Colorize;

/// Rust target triple of the published `eza` Linux archives for this host, if any.
pub fn release_target() -> Option<&'static str> {
    release_target_for(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn release_target_for(os: &str, arch: &str) -> Option<&'static str> {
    let target = match (os, arch) {
        ("linux", "x86_64") => Some("x86_64-unknown-linux-gnu"),
        ("linux", "aarch64") => Some("aarch64-unknown-linux-gnu"),
        ("linux", "arm") => Some("arm-unknown-linux-gnueabihf"),
        _ => None,
    };
    log_debug!("[Platform] os={} arch={} -> release target {:?}", os, arch, target);
    target
}
