use clap::Parser;

/// Defines the command-line interface of `setup-zsh`.
///
/// There are no subcommands: a plain run installs, `--uninstall` reverses it.
#[derive(Parser, Debug)]
#[command(name = "setup-zsh", version)]
#[command(about = "Install Oh My Zsh, a theme, plugins and eza in one idempotent run", long_about = None)]
pub struct Cli {
    /// Remove Oh My Zsh and restore the previous ~/.zshrc instead of installing.
    #[arg(long)]
    pub(crate) uninstall: bool,

    /// Path to config.yaml (defaults to ~/.setup-zsh/config.yaml).
    #[arg(long, env = "SETUP_ZSH_CONFIG", value_name = "PATH")]
    pub(crate) config: Option<String>,

    /// Terminate the whole run after this many seconds (exit status 124).
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) timeout: Option<u64>,

    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long)]
    pub(crate) debug: bool,
}
