// Register application commands.
// `setup-zsh` has no subcommand verbs; `--uninstall` selects between the two runs.

// Runs the idempotent install sequence.
pub mod install;
// Removes the framework and restores the previous ~/.zshrc.
pub mod uninstall;
// Prints the end-of-run summary.
pub mod summary;
