//! # Oh My Zsh Installer
//!
//! Runs the framework's published `install.sh` unattended. The script is told
//! to keep the existing `~/.zshrc` (the resource-file step owns that file), not
//! to start a new shell and not to change the login shell (the default-shell
//! step owns that).

use std::path::Path;

use colored::Colorize;

use crate::errors::FetchError;
use crate::libs::host::Host;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::{log_debug, log_info};

pub const INSTALL_SCRIPT_URL: &str = "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";

/// The unattended install command for a framework rooted at `root`.
pub fn install_command(root: &Path) -> CommandSpec {
    CommandSpec::new("sh")
        .arg("-c")
        .arg(format!(
            "curl -fsSL {INSTALL_SCRIPT_URL} | sh -s -- --unattended --keep-zshrc"
        ))
        .env("ZSH", root.to_string_lossy())
        .env("RUNZSH", "no")
        .env("CHSH", "no")
        .env("KEEP_ZSHRC", "yes")
}

/// Installs the framework into `root` and checks that the directory exists afterwards.
pub fn install(host: &Host, root: &Path) -> Result<(), FetchError> {
    log_info!("[Framework] Running the Oh My Zsh installer into {}...", root.display().to_string().cyan());
    host.runner
        .run_checked(&install_command(root))
        .map_err(|reason| FetchError::Remote {
            url: INSTALL_SCRIPT_URL.to_string(),
            reason,
        })?;

    if !host.fs.exists(root) {
        return Err(FetchError::Remote {
            url: INSTALL_SCRIPT_URL.to_string(),
            reason: format!("installer finished but {} does not exist", root.display()),
        });
    }
    log_debug!("[Framework] {} is in place", root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::testing::{FakeHttp, FakeRunner};
    use crate::libs::utilities::file_operations::memory::MemoryFs;
    use std::ffi::OsString;

    #[test]
    fn command_is_unattended_and_keeps_zshrc() {
        let spec = install_command(Path::new("/home/ada/.oh-my-zsh"));
        assert!(spec.to_string().contains("--unattended --keep-zshrc"));
        assert!(spec.env.contains(&("ZSH".to_string(), "/home/ada/.oh-my-zsh".to_string())));
        assert!(spec.env.contains(&("CHSH".to_string(), "no".to_string())));
    }

    #[test]
    fn missing_root_after_success_is_a_failure() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        let host = Host {
            fs: &fs,
            runner: &runner,
            http: &http,
            search_path: OsString::new(),
            user: "ada".into(),
        };
        let err = install(&host, Path::new("/home/ada/.oh-my-zsh")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
