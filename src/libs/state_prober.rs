// Classifies each sub-component as `Present` or `Absent`. These functions only
// read: existence checks, file digests and a few read-only queries
// (`<tool> --version`, `getent passwd`). All skip/act decisions are based on
// their answers.

use std::env;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::libs::host::Host;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::libs::utilities::file_operations::FileSystem;
use crate::schemas::state::{Descriptor, Location, Presence};
use crate::log_debug;
use colored::Colorize;

/// Present if the described path exists (or the program is found on the search path).
pub fn probe(host: &Host, descriptor: &Descriptor) -> Presence {
    let presence = match &descriptor.location {
        Location::Path(path) => Presence::from_bool(host.fs.exists(path)),
        Location::Program(name) => Presence::from_bool(find_program(host, name).is_some()),
    };
    log_debug!(
        "[Probe] {} -> {:?}",
        descriptor.component.to_string().cyan(),
        presence
    );
    presence
}

/// First regular file called `name` in the host's search path.
pub fn find_program(host: &Host, name: &str) -> Option<PathBuf> {
    find_on_path(host.fs, &host.search_path, name)
}

pub fn find_on_path(fs: &dyn FileSystem, search_path: &std::ffi::OsStr, name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return fs.is_file(&path).then_some(path);
    }
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| fs.is_file(candidate))
}

/// Present if `path` holds exactly `expected` (compared by SHA-256 digest).
pub fn probe_content(fs: &dyn FileSystem, path: &Path, expected: &[u8]) -> Presence {
    let Ok(current) = fs.read(path) else {
        log_debug!("[Probe] {} unreadable or missing", path.display());
        return Presence::Absent;
    };
    let same = digest(&current) == digest(expected);
    log_debug!(
        "[Probe] {} matches rendered template: {}",
        path.display(),
        same
    );
    Presence::from_bool(same)
}

/// Hex SHA-256 of `data`.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Output of `<binary> --version`, or `None` when it cannot be run or fails.
/// The binary does not have to be on the search path.
pub fn version_output_at(host: &Host, binary: &Path) -> Option<String> {
    let spec = CommandSpec::new(binary.to_string_lossy()).arg("--version");
    match host.runner.run(&spec) {
        Ok(out) if out.success() => Some(format!("{}{}", out.stdout, out.stderr)),
        Ok(out) => {
            log_debug!("[Probe] `{}` failed: {}", spec, out.failure_text());
            None
        }
        Err(e) => {
            log_debug!("[Probe] could not run `{}`: {}", spec, e);
            None
        }
    }
}

/// Weak version equality: the self-reported version text contains the requested tag.
///
/// `v0.18.0` also matches `v0.18.01`; accepted because version output formats
/// differ between packaging ecosystems.
pub fn version_matches(version_output: &str, requested: &str) -> bool {
    let requested = requested.trim();
    !requested.is_empty() && version_output.contains(requested)
}

/// First word of `version_output` that looks like a version (`v0.18.0`, `0.18.0`).
pub fn reported_version(version_output: &str) -> Option<String> {
    version_output
        .split_whitespace()
        .find(|word| {
            word.contains('.')
                && word
                    .trim_start_matches('v')
                    .starts_with(|c: char| c.is_ascii_digit())
        })
        .map(str::to_string)
}

/// The user's login shell, from `getent passwd` with `$SHELL` as fallback.
pub fn login_shell(host: &Host) -> Option<String> {
    if !host.user.is_empty() {
        let spec = CommandSpec::new("getent").args(["passwd", host.user.as_str()]);
        if let Ok(out) = host.runner.run(&spec)
            && out.success()
            && let Some(shell) = out.stdout.trim().rsplit(':').next()
            && !shell.is_empty()
        {
            return Some(shell.to_string());
        }
    }
    env::var("SHELL").ok().filter(|s| !s.is_empty())
}

/// Present if the login shell is `zsh_path` (or any binary named `zsh`).
pub fn probe_login_shell(host: &Host, zsh_path: &Path) -> Presence {
    let Some(current) = login_shell(host) else {
        return Presence::Absent;
    };
    let current = Path::new(&current);
    let same = current == zsh_path || current.file_name().is_some_and(|n| n == "zsh");
    log_debug!("[Probe] login shell {} -> zsh: {}", current.display(), same);
    Presence::from_bool(same)
}
