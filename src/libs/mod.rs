// Core logic of `setup-zsh`: probing, reconciling and reversing the shell
// environment. The command layer builds a `Host` and a `PathResolver` and
// hands them to `orchestrator::install` or `uninstaller::uninstall`.

/// The machine being configured: filesystem, command runner, HTTP client, PATH and user.
pub mod host;

/// Low-level helpers (filesystem and command seams, HTTP, archives, platform).
pub mod utilities;

/// Loading and bootstrapping of `config.yaml`.
pub mod config_loading;

/// Pre-flight check of required external capabilities.
pub mod dependency_validator;

/// Read-only classification of components as present or absent.
pub mod state_prober;

/// The single `~/.zshrc` backup/original pair.
pub mod backup_manager;

/// Rendering of the shipped `~/.zshrc` template.
pub mod zshrc_template;

/// External plugin and theme fetches.
pub mod plugin_installer;

/// Ordered fallback strategies for the auxiliary tool.
pub mod tool_resolver;

/// The install sequence.
pub mod orchestrator;

/// The uninstall sequence.
pub mod uninstaller;

/// Whole-run timeout.
pub mod watchdog;

#[cfg(test)]
pub(crate) mod testing;
