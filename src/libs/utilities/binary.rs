// Helpers for placing a downloaded binary on disk.

use std::io;
use std::path::{Path, PathBuf};

use crate::libs::utilities::file_operations::FileSystem;
use crate::{log_debug, log_warn};
use colored::Colorize;

/// Finds the first regular file named exactly `name` below `dir`.
pub fn find_binary(dir: &Path, name: &str) -> Option<PathBuf> {
    log_debug!("[Binary] Searching for '{}' in {}", name, dir.display().to_string().yellow());
    let found = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path());

    if found.is_none() {
        log_warn!("[Binary] No file named '{}' found within {}", name, dir.display());
    }
    found
}

/// Copies the staged file `from` to `to` through `fs` (creating parent
/// directories) and marks it executable.
pub fn install_binary(fs: &dyn FileSystem, from: &Path, to: &Path) -> io::Result<()> {
    let bytes = std::fs::read(from)?;
    if let Some(parent) = to.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write(to, &bytes)?;
    fs.set_executable(to)?;
    log_debug!("[Binary] Installed {} -> {}", from.display(), to.display().to_string().green());
    Ok(())
}
