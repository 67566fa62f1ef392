// `setup-zsh`: installs Oh My Zsh, a theme, external plugins and eza, writes
// ~/.zshrc and switches the login shell, all idempotently. `--uninstall`
// reverses it.

// The logging macros are `#[macro_export]`ed, so `logger` must come first.
mod logger;

mod cli;
mod commands;
mod errors;
mod installers;
mod libs;
mod schemas;

use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use crate::cli::cmd_enums::Cli;
use crate::libs::watchdog;

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);
    log_debug!("Parsed arguments: {:?}", cli);

    if let Some(seconds) = cli.timeout {
        watchdog::arm(Duration::from_secs(seconds));
    }

    let code = if cli.uninstall {
        commands::uninstall::run(cli.config)
    } else {
        commands::install::run(cli.config)
    };
    std::process::exit(code);
}
