// This file contains the entry point for a plain `setup-zsh` run.
// It resolves paths, wires the real host (filesystem, commands, HTTPS) and
// hands over to the orchestrator. The exit status comes from the report.

use colored::Colorize;

use crate::commands::summary;
use crate::libs::host::Host;
use crate::libs::orchestrator;
use crate::libs::utilities::command_runner::HostRunner;
use crate::libs::utilities::file_operations::HostFs;
use crate::libs::utilities::http::UreqClient;
use crate::schemas::path_resolver::PathResolver;
use crate::schemas::reports::RunOutcome;
use crate::{log_debug, log_error, log_info};

/// Main entry point of an install run.
///
/// # Arguments
/// * `config_path`: Optional path to `config.yaml` from `--config` / `SETUP_ZSH_CONFIG`.
///
/// # Returns
/// The process exit status: `0` on success or bootstrap, `1` on a fatal step failure.
pub fn run(config_path: Option<String>) -> i32 {
    log_debug!("Entered install::run() function.");

    let paths = match PathResolver::new(config_path) {
        Ok(paths) => paths,
        Err(e) => {
            log_error!("{}", e.to_string().red());
            return 1;
        }
    };

    let (fs, runner, http) = (HostFs, HostRunner, UreqClient::new());
    let host = Host::from_env(&fs, &runner, &http);
    let report = orchestrator::install(&host, &paths);

    summary::print_install(&report);
    if let RunOutcome::Bootstrapped(path) = &report.outcome {
        log_info!(
            "Edit {} to your liking, then run {} again.",
            path.display().to_string().cyan(),
            "setup-zsh".bold()
        );
    }
    report.exit_code()
}
