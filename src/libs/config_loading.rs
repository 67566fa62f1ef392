use std::io;
use std::path::Path;

use colored::Colorize;

use crate::errors::ConfigError;
use crate::libs::utilities::file_operations::FileSystem;
use crate::schemas::configuration::Configuration;
use crate::{log_debug, log_error, log_info};

/// Default configuration written on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../../templates/config.yaml");

/// Loads the user configuration from `path`.
///
/// This is a pure read: loading the same file twice yields the same value and
/// changes nothing on disk.
///
/// # Arguments
/// * `fs`: Filesystem to read from.
/// * `path`: Location of `config.yaml`.
///
/// # Returns
/// * `Ok(Configuration)` when all four keys are present and valid.
/// * `Err(ConfigError::Missing)` when there is no file; the caller bootstraps.
/// * `Err(ConfigError::Malformed)` for invalid YAML, missing keys or wrong types.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Configuration, ConfigError> {
    log_debug!("[Config] Loading configuration from {}", path.display().to_string().blue());

    let bytes = match fs.read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let malformed = |reason: String| ConfigError::Malformed {
        path: path.to_path_buf(),
        reason,
    };
    let text = String::from_utf8(bytes).map_err(|e| malformed(format!("not valid UTF-8: {e}")))?;
    let config: Configuration = serde_yaml::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    config.validate().map_err(malformed)?;

    log_info!(
        "[Config] Loaded {}: theme {}, {} external plugin(s), {} builtin plugin(s), eza {}",
        path.display().to_string().green(),
        config.theme.cyan(),
        config.external_plugins.len(),
        config.builtin_plugins.len(),
        config.tool_version.to_string().cyan()
    );
    log_debug!("[Config] {:#?}", config);
    Ok(config)
}

/// Writes the default configuration to `path` so the user can review it.
///
/// Creates the parent directory when needed. Never overwrites an existing file.
pub fn bootstrap(fs: &dyn FileSystem, path: &Path) -> io::Result<()> {
    if fs.exists(path) {
        log_debug!("[Config] {} already exists, not bootstrapping", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs.create_dir_all(parent)?;
    }
    fs.write(path, DEFAULT_CONFIG.as_bytes()).inspect_err(|e| {
        log_error!(
            "[Config] Could not write default configuration to {}: {}",
            path.display().to_string().red(),
            e
        );
    })?;
    log_info!(
        "[Config] Wrote default configuration to {}. Review it, then run setup-zsh again.",
        path.display().to_string().green()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::utilities::file_operations::HostFs;
    use crate::libs::utilities::file_operations::memory::MemoryFs;
    use crate::schemas::configuration::ToolVersion;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_recoverable() {
        let fs = MemoryFs::new();
        let err = load(&fs, Path::new("/h/.setup-zsh/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn missing_key_is_malformed() {
        let fs = MemoryFs::new();
        fs.add_file("/h/c.yaml", "theme: agnoster\nexternal_plugins: []\nbuiltin_plugins: []\n");
        let err = load(&fs, Path::new("/h/c.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }), "{err}");
        assert!(err.to_string().contains("tool_version"));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let fs = MemoryFs::new();
        fs.add_file(
            "/h/c.yaml",
            "theme: agnoster\nexternal_plugins: a/x\nbuiltin_plugins: []\ntool_version: latest\n",
        );
        assert!(matches!(
            load(&fs, Path::new("/h/c.yaml")),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn loads_are_stable() {
        let fs = MemoryFs::new();
        fs.add_file(
            "/h/c.yaml",
            "theme: agnoster\nexternal_plugins: [a/x, b/y]\nbuiltin_plugins: [git]\ntool_version: v0.18.0\n",
        );
        let first = load(&fs, Path::new("/h/c.yaml")).unwrap();
        let second = load(&fs, Path::new("/h/c.yaml")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.tool_version, ToolVersion::Pinned("v0.18.0".into()));
        assert_eq!(first.external_plugins, vec!["a/x", "b/y"]);
    }

    #[test]
    fn bootstrap_writes_loadable_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".setup-zsh").join("config.yaml");

        bootstrap(&HostFs, &path).unwrap();
        let config = load(&HostFs, &path).unwrap();
        assert_eq!(config.theme, "agnoster");
        assert!(config.tool_version.is_latest());

        std::fs::write(&path, "theme: custom\n").unwrap();
        bootstrap(&HostFs, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "theme: custom\n");
    }
}
