// Filesystem access for everything `setup-zsh` inspects or mutates under the
// home directory. Components only ever talk to the `FileSystem` trait so the
// probing and backup logic can be exercised against an in-memory tree.

use std::fs;
use std::io;
use std::path::Path;

use crate::log_debug;
use colored::Colorize;

/// The filesystem operations the installer needs, and nothing more.
pub trait FileSystem {
    /// `true` when anything (file, directory, symlink target) exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// `true` only for regular files.
    fn is_file(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Creates or truncates `path`. The parent directory must exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    /// Adds execute permission (`0o755`). A no-op where permissions do not apply.
    fn set_executable(&self, path: &Path) -> io::Result<()>;
    /// Moves `from` to `to`, replacing `to` if it is a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            // Cross-device moves (e.g. a home directory on another mount) can't be renamed.
            Err(e) if from.is_file() => {
                log_debug!(
                    "[FS] rename {} -> {} failed ({}), falling back to copy + remove",
                    from.display().to_string().yellow(),
                    to.display().to_string().yellow(),
                    e
                );
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            Err(e) => Err(e),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory `FileSystem` for unit tests that must not touch the disk.

    use super::FileSystem;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};
    use std::io;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Node {
        File(Vec<u8>),
        Dir,
    }

    #[derive(Debug, Default)]
    pub(crate) struct MemoryFs {
        nodes: RefCell<BTreeMap<PathBuf, Node>>,
        /// Paths whose writes fail, to simulate permission errors.
        read_only: RefCell<Vec<PathBuf>>,
        executable: RefCell<BTreeSet<PathBuf>>,
    }

    impl MemoryFs {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn add_file(&self, path: impl AsRef<Path>, contents: &str) {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                self.add_dir(parent);
            }
            self.nodes
                .borrow_mut()
                .insert(path.to_path_buf(), Node::File(contents.as_bytes().to_vec()));
        }

        pub(crate) fn add_dir(&self, path: impl AsRef<Path>) {
            let mut nodes = self.nodes.borrow_mut();
            for ancestor in path.as_ref().ancestors() {
                if ancestor.as_os_str().is_empty() {
                    continue;
                }
                nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
            }
        }

        pub(crate) fn deny_writes_to(&self, path: impl AsRef<Path>) {
            self.read_only.borrow_mut().push(path.as_ref().to_path_buf());
        }

        pub(crate) fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
            match self.nodes.borrow().get(path.as_ref()) {
                Some(Node::File(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            }
        }

        pub(crate) fn is_executable(&self, path: impl AsRef<Path>) -> bool {
            self.executable.borrow().contains(path.as_ref())
        }

        fn check_writable(&self, path: &Path) -> io::Result<()> {
            if self.read_only.borrow().iter().any(|p| path.starts_with(p)) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("permission denied: {}", path.display()),
                ));
            }
            Ok(())
        }

        fn not_found(path: &Path) -> io::Error {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", path.display()),
            )
        }
    }

    impl FileSystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.nodes.borrow().contains_key(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            matches!(self.nodes.borrow().get(path), Some(Node::File(_)))
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            match self.nodes.borrow().get(path) {
                Some(Node::File(bytes)) => Ok(bytes.clone()),
                Some(Node::Dir) => Err(io::Error::other("is a directory")),
                None => Err(Self::not_found(path)),
            }
        }

        fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.check_writable(path)?;
            let parent_exists = path
                .parent()
                .map(|p| p.as_os_str().is_empty() || self.exists(p))
                .unwrap_or(true);
            if !parent_exists {
                return Err(Self::not_found(path));
            }
            self.nodes
                .borrow_mut()
                .insert(path.to_path_buf(), Node::File(contents.to_vec()));
            Ok(())
        }

        fn set_executable(&self, path: &Path) -> io::Result<()> {
            self.check_writable(path)?;
            if !self.is_file(path) {
                return Err(Self::not_found(path));
            }
            self.executable.borrow_mut().insert(path.to_path_buf());
            Ok(())
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            self.check_writable(from)?;
            self.check_writable(to)?;
            let mut nodes = self.nodes.borrow_mut();
            let moved: Vec<(PathBuf, Node)> = nodes
                .iter()
                .filter(|(p, _)| p.starts_with(from))
                .map(|(p, n)| (p.clone(), n.clone()))
                .collect();
            if moved.is_empty() {
                return Err(Self::not_found(from));
            }
            for (old, node) in moved {
                nodes.remove(&old);
                let suffix = old.strip_prefix(from).unwrap_or(Path::new(""));
                nodes.insert(to.join(suffix), node);
            }
            Ok(())
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            self.check_writable(path)?;
            self.add_dir(path);
            Ok(())
        }

        fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
            self.check_writable(path)?;
            let mut nodes = self.nodes.borrow_mut();
            if !nodes.contains_key(path) {
                return Err(Self::not_found(path));
            }
            nodes.retain(|p, _| !p.starts_with(path));
            Ok(())
        }
    }
}
