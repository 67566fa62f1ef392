// Installers for everything `setup-zsh` puts on the machine. Each submodule
// wraps one external mechanism (a package manager, a git remote, a release
// archive, `cargo`) behind a small function the orchestrator and the tool
// resolver call.

/// Package manager detection and non-interactive package installs.
pub(crate) mod package_manager;

/// The apt repository chain used for `eza` on Debian-family hosts.
pub(crate) mod apt_repositories;

/// The Oh My Zsh unattended install script.
pub(crate) mod oh_my_zsh;

/// Shallow clones of plugin and theme repositories.
pub(crate) mod git;

/// Prebuilt release archives from GitHub.
pub(crate) mod release_binary;

/// `cargo install`, the source-build fallback.
pub(crate) mod cargo;
