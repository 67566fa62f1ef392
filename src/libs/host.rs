// The machine `setup-zsh` runs against: filesystem, command execution, HTTPS,
// the executable search path and the invoking user. Built once in the command
// layer and passed by reference into every component.

use std::env;
use std::ffi::OsString;

use crate::libs::utilities::command_runner::{CommandRunner, CommandSpec};
use crate::libs::utilities::file_operations::FileSystem;
use crate::libs::utilities::http::HttpClient;
use crate::log_debug;
use colored::Colorize;

pub struct Host<'a> {
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn CommandRunner,
    pub http: &'a dyn HttpClient,
    /// Value of `PATH` used for every program lookup.
    pub search_path: OsString,
    /// Login name of the invoking user.
    pub user: String,
}

impl<'a> Host<'a> {
    /// Captures `PATH` and the user name from the process environment.
    pub fn from_env(
        fs: &'a dyn FileSystem,
        runner: &'a dyn CommandRunner,
        http: &'a dyn HttpClient,
    ) -> Self {
        let search_path = env::var_os("PATH").unwrap_or_default();
        let user = env::var("USER")
            .or_else(|_| env::var("LOGNAME"))
            .ok()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| {
                runner
                    .run(&CommandSpec::new("id").arg("-un"))
                    .ok()
                    .filter(|o| o.success())
                    .map(|o| o.stdout.trim().to_string())
            })
            .unwrap_or_default();
        log_debug!("[Host] user='{}' PATH={:?}", user, search_path);
        Self {
            fs,
            runner,
            http,
            search_path,
            user,
        }
    }

    pub fn is_root(&self) -> bool {
        self.user == "root"
    }

    /// Runs `spec` with elevated privileges (via `sudo` unless already root).
    pub fn privileged(&self, spec: CommandSpec) -> CommandSpec {
        if self.is_root() { spec } else { spec.with_sudo() }
    }
}
