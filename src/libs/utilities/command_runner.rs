// External command execution. Every shell-out (`git`, `sudo apt-get`, `chsh`,
// `eza --version`, ...) is described by a `CommandSpec` and executed through
// the `CommandRunner` trait, so tests can queue outputs and inspect calls.

use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::log_debug;
use colored::Colorize;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Text piped to the child's stdin (used for `sudo tee`).
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Wraps the command in `sudo`.
    ///
    /// `sudo` resets the environment, so variables are passed as `KEY=VALUE` arguments.
    pub fn with_sudo(self) -> Self {
        let mut args = Vec::with_capacity(self.env.len() + self.args.len() + 1);
        args.extend(self.env.into_iter().map(|(k, v)| format!("{k}={v}")));
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            env: Vec::new(),
            stdin: self.stdin,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }

    /// Short human readable reason for a failed command.
    pub fn failure_text(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit status {}", self.status_code)
        } else {
            format!("exit status {}: {}", self.status_code, stderr)
        }
    }
}

/// Runs external commands to completion (blocking).
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput>;

    /// Runs `spec` and turns a spawn error or non-zero exit into a message.
    fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, String> {
        log_debug!("[Exec] {}", spec.to_string().cyan());
        match self.run(spec) {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(format!("`{}` failed with {}", spec, output.failure_text())),
            Err(e) => Err(format!("could not execute `{}`: {}", spec.program, e)),
        }
    }
}

/// Runs commands on the real host via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostRunner;

impl CommandRunner for HostRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        let mut child = cmd.spawn()?;
        if let Some(input) = &spec.stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        let result = CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.stderr.trim().is_empty() {
            log_debug!("[Exec] stderr of `{}`: {}", spec.program, result.stderr.trim());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_sudo_prefixes_program() {
        let spec = CommandSpec::new("apt-get").args(["install", "-y", "zsh"]).with_sudo();
        assert_eq!(spec.program, "sudo");
        assert_eq!(spec.to_string(), "sudo apt-get install -y zsh");

        let spec = CommandSpec::new("apt-get")
            .arg("update")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .with_sudo();
        assert!(spec.env.is_empty());
        assert_eq!(spec.to_string(), "sudo DEBIAN_FRONTEND=noninteractive apt-get update");
    }

    #[test]
    fn failure_text_prefers_stderr() {
        let out = CommandOutput {
            status_code: 100,
            stdout: String::new(),
            stderr: "E: Unable to locate package eza\n".into(),
        };
        assert_eq!(out.failure_text(), "exit status 100: E: Unable to locate package eza");
    }

    #[cfg(unix)]
    #[test]
    fn host_runner_pipes_stdin() {
        let out = HostRunner.run(&CommandSpec::new("cat").stdin("hello")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello");
    }
}
