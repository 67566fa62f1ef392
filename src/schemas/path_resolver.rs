// =========================================================================== //
//                          STANDARD LIBRARY DEPENDENCIES                      //
// =========================================================================== //

use std::env;
use std::path::{Path, PathBuf};

// =========================================================================== //
//                             EXTERNAL DEPENDENCIES                           //
// =========================================================================== //

use colored::Colorize;

// =========================================================================== //
//                              INTERNAL IMPORTS                               //
// =========================================================================== //

use crate::errors::SetupError;
use crate::libs::utilities::path_helpers::expand_path;
use crate::schemas::configuration::repo_name;
use crate::schemas::state::{BackupRecord, PluginRecord};
use crate::{log_debug, log_info};

/// Suffix of the single tracked backup of the shell resource file.
pub const BACKUP_SUFFIX: &str = ".pre-oh-my-zsh";

/// # PathResolver
///
/// Every on-disk location `setup-zsh` reads or writes, derived once from the
/// home directory. Only this type (and the dependency probes) look at the
/// process environment: `ZSH` and `ZSH_CUSTOM` relocate the framework the same
/// way the framework's own scripts honour them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    home: PathBuf,
    /// `~/.oh-my-zsh` (or `$ZSH`).
    framework_root: PathBuf,
    /// `<root>/custom` (or `$ZSH_CUSTOM`).
    custom_dir: PathBuf,
    /// `~/.zshrc`.
    rc_file: PathBuf,
    /// `~/.setup-zsh/config.yaml` unless overridden.
    config_file: PathBuf,
    /// Target of the prebuilt tool binary.
    local_bin: PathBuf,
}

impl PathResolver {
    /// Resolves all paths for the current user.
    ///
    /// `config_path` (from `--config` / `SETUP_ZSH_CONFIG`) takes priority over the default.
    pub fn new(config_path: Option<String>) -> Result<Self, SetupError> {
        let home = dirs::home_dir().ok_or(SetupError::HomeDirUnavailable)?;
        let framework_root = env::var("ZSH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| expand_path(&v));
        let custom_dir = env::var("ZSH_CUSTOM")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| expand_path(&v));

        let mut resolver = Self::with_home(&home, framework_root, custom_dir);
        if let Some(path) = config_path.filter(|p| !p.trim().is_empty()) {
            resolver.config_file = expand_path(&path);
        }

        log_info!(
            "[Paths] Using configuration file: {}",
            resolver.config_file.display().to_string().cyan()
        );
        log_debug!("[Paths] Resolved layout: {:#?}", resolver);
        Ok(resolver)
    }

    /// Default layout below `home`, with optional framework/custom overrides.
    pub fn with_home(home: &Path, framework_root: Option<PathBuf>, custom_dir: Option<PathBuf>) -> Self {
        let framework_root = framework_root.unwrap_or_else(|| home.join(".oh-my-zsh"));
        let custom_dir = custom_dir.unwrap_or_else(|| framework_root.join("custom"));
        Self {
            home: home.to_path_buf(),
            framework_root,
            custom_dir,
            rc_file: home.join(".zshrc"),
            config_file: home.join(".setup-zsh").join("config.yaml"),
            local_bin: home.join(".local").join("bin"),
        }
    }


    pub fn framework_root(&self) -> &Path {
        &self.framework_root
    }

    pub fn custom_dir(&self) -> &Path {
        &self.custom_dir
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.custom_dir.join("plugins")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.custom_dir.join("themes")
    }

    pub fn rc_file(&self) -> &Path {
        &self.rc_file
    }

    /// `~/.zshrc.pre-oh-my-zsh`.
    pub fn backup_file(&self) -> PathBuf {
        let mut name = self
            .rc_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(BACKUP_SUFFIX);
        self.rc_file.with_file_name(name)
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn local_bin(&self) -> &Path {
        &self.local_bin
    }

    /// `~/.cargo/bin`, where `cargo install` puts binaries.
    pub fn cargo_bin(&self) -> PathBuf {
        self.home.join(".cargo").join("bin")
    }

    /// The backup/original pair for the resource file.
    pub fn backup_record(&self) -> BackupRecord {
        BackupRecord {
            original_path: self.rc_file.clone(),
            backup_path: self.backup_file(),
        }
    }

    /// Target directory of an external plugin.
    pub fn plugin_record(&self, identifier: &str) -> PluginRecord {
        PluginRecord {
            identifier: identifier.trim().to_string(),
            target_directory: self.plugins_dir().join(repo_name(identifier)),
        }
    }

    /// Target directory of an external theme.
    pub fn theme_record(&self, identifier: &str) -> PluginRecord {
        PluginRecord {
            identifier: identifier.trim().to_string(),
            target_directory: self.themes_dir().join(repo_name(identifier)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_below_home() {
        let paths = PathResolver::with_home(Path::new("/home/ada"), None, None);
        assert_eq!(paths.framework_root(), Path::new("/home/ada/.oh-my-zsh"));
        assert_eq!(paths.plugins_dir(), PathBuf::from("/home/ada/.oh-my-zsh/custom/plugins"));
        assert_eq!(paths.rc_file(), Path::new("/home/ada/.zshrc"));
        assert_eq!(paths.backup_file(), PathBuf::from("/home/ada/.zshrc.pre-oh-my-zsh"));
        assert_eq!(paths.config_file(), Path::new("/home/ada/.setup-zsh/config.yaml"));
        assert_eq!(paths.local_bin(), Path::new("/home/ada/.local/bin"));
        assert_eq!(paths.cargo_bin(), PathBuf::from("/home/ada/.cargo/bin"));
    }

    #[test]
    fn custom_dir_follows_framework_override() {
        let paths = PathResolver::with_home(Path::new("/home/ada"), Some(PathBuf::from("/opt/omz")), None);
        assert_eq!(paths.custom_dir(), Path::new("/opt/omz/custom"));

        let paths = PathResolver::with_home(
            Path::new("/home/ada"),
            None,
            Some(PathBuf::from("/home/ada/zsh-custom")),
        );
        assert_eq!(paths.themes_dir(), PathBuf::from("/home/ada/zsh-custom/themes"));
    }

    #[test]
    fn plugin_record_uses_last_segment() {
        let paths = PathResolver::with_home(Path::new("/h"), None, None);
        let record = paths.plugin_record("zsh-users/zsh-autosuggestions");
        assert_eq!(record.identifier, "zsh-users/zsh-autosuggestions");
        assert_eq!(
            record.target_directory,
            PathBuf::from("/h/.oh-my-zsh/custom/plugins/zsh-autosuggestions")
        );
    }
}
