// Reverses an install: removes the framework root (plugins and external themes
// go with it, they live below it) and puts the backed-up `~/.zshrc` back.
// Both sub-steps always run, in this order, and neither aborts the other.
// Nothing outside the framework root and the backup/original pair is touched.

use colored::Colorize;

use crate::libs::backup_manager::restore_if_present;
use crate::libs::host::Host;
use crate::libs::state_prober::probe;
use crate::schemas::path_resolver::PathResolver;
use crate::schemas::reports::{RemovalResult, UninstallReport};
use crate::schemas::state::{Component, Descriptor};
use crate::{log_info, log_warn};

pub fn uninstall(host: &Host, paths: &PathResolver) -> UninstallReport {
    log_info!("[Uninstall] Removing Oh My Zsh and restoring the previous .zshrc...");
    let framework = remove_framework(host, paths);
    let resource_file = restore_if_present(host, &paths.backup_record());
    let report = UninstallReport {
        framework,
        resource_file,
    };
    if report.was_noop() {
        log_info!("[Uninstall] {}", "Nothing was installed; nothing to do.".green());
    }
    report
}

fn remove_framework(host: &Host, paths: &PathResolver) -> RemovalResult {
    let root = paths.framework_root();
    if !probe(host, &Descriptor::path(Component::FrameworkRoot, root)).is_present() {
        log_info!("[Uninstall] No framework at {}, nothing to remove", root.display());
        return RemovalResult::NothingToRemove;
    }
    match host.fs.remove_dir_all(root) {
        Ok(()) => {
            log_info!("[Uninstall] Removed {}", root.display().to_string().green());
            RemovalResult::Removed
        }
        Err(e) => {
            log_warn!("[Uninstall] Could not remove {}: {}", root.display().to_string().yellow(), e);
            RemovalResult::Failed(e.to_string())
        }
    }
}
