// Expansion of user supplied paths (`~/...`, `$HOME/...`).

use std::path::PathBuf;

use crate::log_debug;
use colored::Colorize;

/// Expands `~` and environment variables in `path`.
///
/// Unknown variables are left untouched rather than failing, so a literal `$`
/// in a directory name still resolves to something usable.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = match shellexpand::full(path) {
        Ok(expanded) => expanded.into_owned(),
        Err(e) => {
            log_debug!("[Paths] Could not expand variables in '{}': {}", path, e);
            shellexpand::tilde(path).into_owned()
        }
    };
    PathBuf::from(expanded)
}
