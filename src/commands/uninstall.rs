// Entry point for `setup-zsh --uninstall`. Needs no configuration and no
// network, so neither the dependency check nor the config loader runs here.

use colored::Colorize;

use crate::commands::summary;
use crate::libs::host::Host;
use crate::libs::uninstaller;
use crate::libs::utilities::command_runner::HostRunner;
use crate::libs::utilities::file_operations::HostFs;
use crate::libs::utilities::http::UreqClient;
use crate::schemas::path_resolver::PathResolver;
use crate::{log_debug, log_error};

/// Runs the uninstall sequence and returns the exit status.
///
/// "Nothing to remove" is success; only a sub-step that actually failed gives `1`.
pub fn run(config_path: Option<String>) -> i32 {
    log_debug!("Entered uninstall::run() function.");

    let paths = match PathResolver::new(config_path) {
        Ok(paths) => paths,
        Err(e) => {
            log_error!("{}", e.to_string().red());
            return 1;
        }
    };

    let (fs, runner, http) = (HostFs, HostRunner, UreqClient::new());
    let host = Host::from_env(&fs, &runner, &http);
    let report = uninstaller::uninstall(&host, &paths);

    summary::print_uninstall(&report);
    report.exit_code()
}
