// Shallow `git clone` of plugin and theme repositories.

use std::path::Path;

use colored::Colorize;

use crate::errors::FetchError;
use crate::libs::host::Host;
use crate::libs::utilities::command_runner::CommandSpec;
use crate::log_debug;

/// `https://github.com/<owner>/<repo>.git`
pub fn remote_url(identifier: &str) -> String {
    let identifier = identifier.trim().trim_end_matches(".git");
    format!("https://github.com/{identifier}.git")
}

/// Clones `identifier` into `target`. Nothing is cleaned up here on failure.
pub fn clone(host: &Host, identifier: &str, target: &Path) -> Result<(), FetchError> {
    let url = remote_url(identifier);
    log_debug!("[Git] Cloning {} into {}", url.cyan(), target.display());

    let spec = CommandSpec::new("git")
        .args(["clone", "--depth=1", "--quiet", url.as_str()])
        .arg(target.to_string_lossy())
        .env("GIT_TERMINAL_PROMPT", "0");
    host.runner
        .run_checked(&spec)
        .map(|_| ())
        .map_err(|reason| FetchError::Remote { url, reason })
}
