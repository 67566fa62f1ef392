// Data types shared across `setup-zsh`: the user configuration, the resolved
// on-disk layout, probed installation state and run reports.

pub mod configuration;
pub mod path_resolver;
pub mod reports;
pub mod state;
