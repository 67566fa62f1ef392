//! Recording fakes for the `CommandRunner` and `HttpClient` seams.
//!
//! Rules match a substring of the rendered command line (`sudo apt-get install -y eza`).
//! The most recently added matching rule wins; unmatched commands succeed with
//! empty output. Every call is recorded in order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::FetchError;
use crate::libs::utilities::command_runner::{CommandOutput, CommandRunner, CommandSpec};
use crate::libs::utilities::file_operations::FileSystem;
use crate::libs::utilities::file_operations::memory::MemoryFs;
use crate::libs::utilities::http::HttpClient;

enum Reply {
    Output(CommandOutput),
    /// Succeeds and creates this directory in the linked filesystem.
    CreateDir(PathBuf),
    /// Succeeds and creates this (empty) file in the linked filesystem.
    CreateFile(PathBuf),
    /// Succeeds and creates the directory named by the last argument (`git clone ... <dest>`).
    CloneIntoLastArg,
    SpawnError,
}

pub(crate) struct FakeRunner<'a> {
    fs: Option<&'a MemoryFs>,
    rules: RefCell<Vec<(String, Reply)>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl<'a> FakeRunner<'a> {
    pub(crate) fn new() -> Self {
        Self {
            fs: None,
            rules: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A runner whose side effects land in `fs`.
    pub(crate) fn with_fs(fs: &'a MemoryFs) -> Self {
        Self {
            fs: Some(fs),
            ..Self::new()
        }
    }

    pub(crate) fn respond(&self, pattern: &str, output: CommandOutput) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Reply::Output(output)));
    }

    pub(crate) fn fail(&self, pattern: &str, stderr: &str) {
        self.respond(
            pattern,
            CommandOutput {
                status_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    pub(crate) fn missing(&self, pattern: &str) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Reply::SpawnError));
    }

    pub(crate) fn creates_dir(&self, pattern: &str, dir: impl AsRef<Path>) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Reply::CreateDir(dir.as_ref().to_path_buf())));
    }

    pub(crate) fn creates_file(&self, pattern: &str, file: impl AsRef<Path>) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Reply::CreateFile(file.as_ref().to_path_buf())));
    }

    pub(crate) fn clones(&self, pattern: &str) {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Reply::CloneIntoLastArg));
    }

    /// Rendered command lines, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    /// Number of recorded calls whose command line contains `pattern`.
    pub(crate) fn count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl CommandRunner for FakeRunner<'_> {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.to_string();
        let rules = self.rules.borrow();
        let Some((_, reply)) = rules.iter().rev().find(|(pattern, _)| line.contains(pattern.as_str())) else {
            return Ok(CommandOutput::default());
        };
        match reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::SpawnError => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", spec.program),
            )),
            Reply::CreateDir(dir) => {
                if let Some(fs) = self.fs {
                    fs.create_dir_all(dir)?;
                }
                Ok(CommandOutput::default())
            }
            Reply::CreateFile(file) => {
                if let Some(fs) = self.fs {
                    fs.add_file(file, "");
                }
                Ok(CommandOutput::default())
            }
            Reply::CloneIntoLastArg => {
                if let (Some(fs), Some(dest)) = (self.fs, spec.args.last()) {
                    fs.add_file(Path::new(dest).join("README.md"), "cloned");
                }
                Ok(CommandOutput::default())
            }
        }
    }
}

/// `HttpClient` serving canned JSON documents and download bodies by URL.
#[derive(Default)]
pub(crate) struct FakeHttp {
    json: RefCell<HashMap<String, serde_json::Value>>,
    files: RefCell<HashMap<String, Vec<u8>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeHttp {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve_json(&self, url: &str, body: serde_json::Value) {
        self.json.borrow_mut().insert(url.to_string(), body);
    }

    pub(crate) fn serve_file(&self, url: &str, body: Vec<u8>) {
        self.files.borrow_mut().insert(url.to_string(), body);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn not_found(url: &str) -> FetchError {
        FetchError::Http {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        }
    }
}

impl HttpClient for FakeHttp {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.json
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        let files = self.files.borrow();
        let body = files.get(url).ok_or_else(|| Self::not_found(url))?;
        std::fs::write(dest, body)?;
        Ok(())
    }
}

/// A `.tar.gz` holding a single executable `entry` with `data`, shaped like a release archive.
pub(crate) fn tar_gz(entry: &str, data: &[u8]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, entry, data).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}
