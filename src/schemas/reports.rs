// Results of an install or uninstall run, as returned to the command layer
// for the summary table and the process exit status.

use std::fmt;
use std::path::PathBuf;

/// A mutating step of the install sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Prerequisites,
    AuxTool,
    Framework,
    Theme(String),
    Plugin(String),
    ResourceFile,
    DefaultShell,
}

impl Step {
    /// Bracketed tag used in every log line of the step.
    pub fn section(&self) -> &'static str {
        match self {
            Step::Prerequisites => "[Zsh]",
            Step::AuxTool => "[Tool]",
            Step::Framework => "[Framework]",
            Step::Theme(_) => "[Theme]",
            Step::Plugin(_) => "[Plugins]",
            Step::ResourceFile => "[ZshRC]",
            Step::DefaultShell => "[Shell]",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Prerequisites => f.write_str("framework prerequisites"),
            Step::AuxTool => f.write_str("auxiliary tool"),
            Step::Framework => f.write_str("framework installation"),
            Step::Theme(id) => write!(f, "theme {id}"),
            Step::Plugin(id) => write!(f, "plugin {id}"),
            Step::ResourceFile => f.write_str("shell resource file"),
            Step::DefaultShell => f.write_str("default shell"),
        }
    }
}

/// How a step ended. Each variant has its own log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Already present; nothing was done.
    Skipped(String),
    Performed(String),
    /// Failed. Fatal unless the step is the auxiliary tool.
    Failed(String),
}

impl StepStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepStatus::Skipped(_))
    }

    pub fn detail(&self) -> &str {
        match self {
            StepStatus::Skipped(d) | StepStatus::Performed(d) | StepStatus::Failed(d) => d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub status: StepStatus,
}

/// Terminal state of an install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// No configuration existed; a default was written for review. Not a failure.
    Bootstrapped(PathBuf),
    /// A fatal step failed. `step` names it, `reason` says why.
    Aborted { step: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub steps: Vec<StepRecord>,
    pub outcome: RunOutcome,
}

impl InstallReport {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            outcome: RunOutcome::Succeeded,
        }
    }

    pub fn record(&mut self, step: Step, status: StepStatus) {
        self.steps.push(StepRecord { step, status });
    }

    pub fn status_of(&self, step: &Step) -> Option<&StepStatus> {
        self.steps.iter().find(|r| &r.step == step).map(|r| &r.status)
    }

    /// `true` when the run completed and every step found its component already present.
    pub fn all_skipped(&self) -> bool {
        self.outcome == RunOutcome::Succeeded && self.steps.iter().all(|r| r.status.is_skipped())
    }

    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::Succeeded | RunOutcome::Bootstrapped(_) => 0,
            RunOutcome::Aborted { .. } => 1,
        }
    }
}

impl Default for InstallReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of removing the framework root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalResult {
    Removed,
    NothingToRemove,
    Failed(String),
}

/// Result of restoring the resource file backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreResult {
    Restored,
    NothingToRestore,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub framework: RemovalResult,
    pub resource_file: RestoreResult,
}

impl UninstallReport {
    /// `true` when neither sub-step had anything to do.
    pub fn was_noop(&self) -> bool {
        self.framework == RemovalResult::NothingToRemove
            && self.resource_file == RestoreResult::NothingToRestore
    }

    /// Non-zero only when a sub-step actually failed; "nothing to do" is success.
    pub fn exit_code(&self) -> i32 {
        let failed = matches!(self.framework, RemovalResult::Failed(_))
            || matches!(self.resource_file, RestoreResult::Failed(_));
        i32::from(failed)
    }
}
