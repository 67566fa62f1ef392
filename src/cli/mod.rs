// Command-line surface of `setup-zsh`.
pub mod cmd_enums;
