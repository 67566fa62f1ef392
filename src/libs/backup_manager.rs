//! # Backup/Restore of `~/.zshrc`
//!
//! Exactly one backup/original pair is tracked. The install path moves the
//! user's file aside once, before it is first overwritten; the uninstall path
//! moves it back. Both directions are guarded by existence checks so repeated
//! runs never clobber the first backup and never fail on "nothing to do".

use colored::Colorize;

use crate::errors::SetupError;
use crate::libs::state_prober::probe;
use crate::libs::host::Host;
use crate::schemas::reports::RestoreResult;
use crate::schemas::state::{BackupRecord, Component, Descriptor};
use crate::{log_debug, log_info, log_warn};

/// Outcome of [`ensure_backup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The original was moved to the backup path.
    Created,
    /// A backup already exists; it is left untouched.
    AlreadyBackedUp,
    /// There is no original to preserve.
    NoOriginal,
}

/// Moves the original aside unless a backup already exists.
///
/// # Errors
/// `SetupError::MoveFailed` when the move itself fails.
pub fn ensure_backup(host: &Host, record: &BackupRecord) -> Result<BackupOutcome, SetupError> {
    let original = Descriptor::path(Component::ResourceFile, &record.original_path);
    let backup = Descriptor::path(Component::Backup, &record.backup_path);

    if probe(host, &backup).is_present() {
        log_debug!(
            "[ZshRC] Backup {} already exists, keeping it",
            record.backup_path.display()
        );
        return Ok(BackupOutcome::AlreadyBackedUp);
    }
    if !probe(host, &original).is_present() {
        log_debug!("[ZshRC] No {} to back up", record.original_path.display());
        return Ok(BackupOutcome::NoOriginal);
    }

    host.fs
        .rename(&record.original_path, &record.backup_path)
        .map_err(|source| SetupError::MoveFailed {
            from: record.original_path.clone(),
            to: record.backup_path.clone(),
            source,
        })?;
    log_info!(
        "[ZshRC] Backed up {} to {}",
        record.original_path.display(),
        record.backup_path.display().to_string().green()
    );
    Ok(BackupOutcome::Created)
}

/// Moves the backup over the original (replacing whatever is there).
///
/// Never fails the caller: a failed move is reported as `RestoreResult::Failed`.
pub fn restore_if_present(host: &Host, record: &BackupRecord) -> RestoreResult {
    let backup = Descriptor::path(Component::Backup, &record.backup_path);
    if !probe(host, &backup).is_present() {
        log_info!("[Uninstall] No backup at {}, nothing to restore", record.backup_path.display());
        return RestoreResult::NothingToRestore;
    }

    match host.fs.rename(&record.backup_path, &record.original_path) {
        Ok(()) => {
            log_info!(
                "[Uninstall] Restored {} from {}",
                record.original_path.display().to_string().green(),
                record.backup_path.display()
            );
            RestoreResult::Restored
        }
        Err(e) => {
            log_warn!(
                "[Uninstall] Could not restore {}: {}",
                record.original_path.display().to_string().yellow(),
                e
            );
            RestoreResult::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::testing::{FakeHttp, FakeRunner};
    use crate::libs::utilities::file_operations::FileSystem;
    use crate::libs::utilities::file_operations::memory::MemoryFs;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    fn record() -> BackupRecord {
        BackupRecord {
            original_path: PathBuf::from("/h/.zshrc"),
            backup_path: PathBuf::from("/h/.zshrc.pre-oh-my-zsh"),
        }
    }

    fn host<'a>(fs: &'a MemoryFs, runner: &'a FakeRunner, http: &'a FakeHttp) -> Host<'a> {
        Host {
            fs,
            runner,
            http,
            search_path: OsString::new(),
            user: "ada".into(),
        }
    }

    #[test]
    fn first_backup_moves_original() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/h/.zshrc", "mine");
        let host = host(&fs, &runner, &http);

        assert_eq!(ensure_backup(&host, &record()).unwrap(), BackupOutcome::Created);
        assert_eq!(fs.contents("/h/.zshrc.pre-oh-my-zsh").as_deref(), Some("mine"));
        assert!(!fs.exists(Path::new("/h/.zshrc")));
    }

    #[test]
    fn existing_backup_is_never_overwritten() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/h/.zshrc", "generated");
        fs.add_file("/h/.zshrc.pre-oh-my-zsh", "mine");
        let host = host(&fs, &runner, &http);

        assert_eq!(ensure_backup(&host, &record()).unwrap(), BackupOutcome::AlreadyBackedUp);
        assert_eq!(fs.contents("/h/.zshrc.pre-oh-my-zsh").as_deref(), Some("mine"));
        assert_eq!(fs.contents("/h/.zshrc").as_deref(), Some("generated"));
    }

    #[test]
    fn nothing_to_back_up() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_dir("/h");
        let host = host(&fs, &runner, &http);
        assert_eq!(ensure_backup(&host, &record()).unwrap(), BackupOutcome::NoOriginal);
    }

    #[test]
    fn failed_move_is_move_failed() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/h/.zshrc", "mine");
        fs.deny_writes_to("/h/.zshrc");
        let host = host(&fs, &runner, &http);
        assert!(matches!(
            ensure_backup(&host, &record()),
            Err(SetupError::MoveFailed { .. })
        ));
    }

    #[test]
    fn restore_replaces_live_file_and_consumes_backup() {
        let (fs, runner, http) = (MemoryFs::new(), FakeRunner::new(), FakeHttp::new());
        fs.add_file("/h/.zshrc", "generated");
        fs.add_file("/h/.zshrc.pre-oh-my-zsh", "mine");
        let host = host(&fs, &runner, &http);

        assert_eq!(restore_if_present(&host, &record()), RestoreResult::Restored);
        assert_eq!(fs.contents("/h/.zshrc").as_deref(), Some("mine"));
        assert!(!fs.exists(Path::new("/h/.zshrc.pre-oh-my-zsh")));

        assert_eq!(restore_if_present(&host, &record()), RestoreResult::NothingToRestore);
    }
}
