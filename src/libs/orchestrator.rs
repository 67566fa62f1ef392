//! # Installation Orchestrator
//!
//! Sequences one idempotent install run. Every step probes first and acts only
//! when its component is absent, so a second run over an unchanged machine
//! performs nothing and logs every step as skipped.
//!
//! Order (fixed):
//!
//! 1. dependency check, before anything is read or written;
//! 2. configuration load, or bootstrap of a default file (ends the run, exit 0);
//! 3. framework prerequisites (`zsh`);
//! 4. auxiliary tool (`eza`), the only step whose failure is not fatal;
//! 5. the framework itself;
//! 6. an external theme, when configured;
//! 7. external plugins, fail-fast;
//! 8. `~/.zshrc`, backed up once and then replaced by the rendered template;
//! 9. the login shell.
//!
//! A fatal failure stops the run where it happened. Completed steps are not
//! rolled back; `--uninstall` is the only way back.

use std::path::PathBuf;

use colored::Colorize;

use crate::errors::{ConfigError, SetupError};
use crate::installers::{oh_my_zsh, package_manager};
use crate::libs::backup_manager::{BackupOutcome, ensure_backup};
use crate::libs::host::Host;
use crate::libs::state_prober::{find_program, probe, probe_content, probe_login_shell};
use crate::libs::tool_resolver::{ToolStatus, install_tool};
use crate::libs::utilities::command_runner::CommandSpec;
use crate::libs::{config_loading, dependency_validator, plugin_installer, zshrc_template};
use crate::logger::{StepMark, step_line};
use crate::schemas::configuration::{Configuration, ThemeSource};
use crate::schemas::path_resolver::PathResolver;
use crate::schemas::reports::{InstallReport, RunOutcome, Step, StepStatus};
use crate::schemas::state::{Component, Descriptor, Presence};
use crate::{log_error, log_info, log_warn};

/// A fatal failure and the step it happened in.
struct Abort {
    step: String,
    error: SetupError,
}

fn abort(step: impl ToString) -> impl FnOnce(SetupError) -> Abort {
    let step = step.to_string();
    move |error| Abort { step, error }
}

/// Logs the outcome line of `step` and records it in `report`.
pub(crate) fn conclude(report: &mut InstallReport, step: Step, status: StepStatus) {
    let mark = match &status {
        StepStatus::Skipped(_) => StepMark::Skipped,
        StepStatus::Performed(_) => StepMark::Performed,
        StepStatus::Failed(_) => StepMark::Failed,
    };
    step_line(step.section(), mark, status.detail());
    report.record(step, status);
}

fn entry_line(step: &Step) -> String {
    format!("{} {}...", step.section(), step)
}

/// Logs the entry line of `step`. Every step, plugins and themes included, goes through here.
pub(crate) fn enter(step: &Step) {
    log_info!("{}", entry_line(step).cyan());
}

/// Runs the whole install sequence. Never panics on host failures; the outcome says how it ended.
pub fn install(host: &Host, paths: &PathResolver) -> InstallReport {
    let mut report = InstallReport::new();
    match run(host, paths, &mut report) {
        Ok(outcome) => report.outcome = outcome,
        Err(Abort { step, error }) => {
            log_error!("Installation aborted during {}: {}", step.bold(), error.to_string().red());
            report.outcome = RunOutcome::Aborted {
                step,
                reason: error.to_string(),
            };
        }
    }
    report
}

fn run(host: &Host, paths: &PathResolver, report: &mut InstallReport) -> Result<RunOutcome, Abort> {
    dependency_validator::check(host, &dependency_validator::base_capabilities())
        .map_err(abort("dependency check"))?;

    let config = match config_loading::load(host.fs, paths.config_file()) {
        Ok(config) => config,
        Err(ConfigError::Missing(path)) => return bootstrap(host, path),
        Err(e) => return Err(abort("configuration load")(e.into())),
    };
    dependency_validator::check(host, &dependency_validator::config_capabilities(&config))
        .map_err(abort("dependency check"))?;

    install_prerequisites(host, report)?;
    install_aux_tool(host, paths, &config, report);
    install_framework(host, paths, report)?;

    if let ThemeSource::External { identifier } = config.theme_source() {
        plugin_installer::ensure_theme(host, paths, &identifier, report)
            .map_err(abort(Step::Theme(identifier.clone())))?;
    }
    plugin_installer::reconcile(host, paths, &config.external_plugins, report)
        .map_err(abort("plugin installation"))?;

    reconcile_resource_file(host, paths, &config, report)?;
    change_default_shell(host, report)?;

    log_info!("{}", "Installation completed.".green().bold());
    Ok(RunOutcome::Succeeded)
}

fn bootstrap(host: &Host, path: PathBuf) -> Result<RunOutcome, Abort> {
    log_warn!(
        "[Config] No configuration found at {}",
        path.display().to_string().yellow()
    );
    config_loading::bootstrap(host.fs, &path).map_err(|source| Abort {
        step: "configuration bootstrap".to_string(),
        error: SetupError::CopyFailed {
            from: "default configuration".to_string(),
            to: path.clone(),
            source,
        },
    })?;
    Ok(RunOutcome::Bootstrapped(path))
}

/// Runs `body` for `step`, recording a failure before handing it back as fatal.
fn fatal_step(
    report: &mut InstallReport,
    step: Step,
    body: impl FnOnce() -> Result<StepStatus, SetupError>,
) -> Result<(), Abort> {
    enter(&step);
    match body() {
        Ok(status) => {
            conclude(report, step, status);
            Ok(())
        }
        Err(error) => {
            conclude(report, step.clone(), StepStatus::Failed(error.to_string()));
            Err(Abort {
                step: step.to_string(),
                error,
            })
        }
    }
}

fn install_prerequisites(host: &Host, report: &mut InstallReport) -> Result<(), Abort> {
    fatal_step(report, Step::Prerequisites, || {
        let shell = Descriptor::program(Component::ShellInterpreter, "zsh");
        if let Some(path) = find_program(host, "zsh") {
            return Ok(StepStatus::Skipped(format!("zsh at {}", path.display())));
        }
        let pm = package_manager::require(host)?;
        package_manager::install(host, pm, &["zsh"])?;
        if probe(host, &shell) == Presence::Absent {
            return Err(SetupError::PrivilegedOperationFailed {
                operation: format!("{pm} install zsh"),
                reason: "zsh is still not on PATH afterwards".to_string(),
            });
        }
        Ok(StepStatus::Performed(format!("zsh installed with {pm}")))
    })
}

/// Non-fatal: a failure is recorded and logged, and the run goes on.
fn install_aux_tool(host: &Host, paths: &PathResolver, config: &Configuration, report: &mut InstallReport) {
    let step = Step::AuxTool;
    enter(&step);
    let status = match install_tool(host, paths, &config.tool_version) {
        Ok(ToolStatus::Present(detail)) => StepStatus::Skipped(detail),
        Ok(ToolStatus::Installed(resolution)) => StepStatus::Performed(match &resolution.version {
            Some(version) => format!("eza {version} via {}", resolution.strategy),
            None => format!("eza via {}", resolution.strategy),
        }),
        Err(e) => {
            log_warn!("[Tool] Continuing without eza; the shell works without it.");
            StepStatus::Failed(e.to_string())
        }
    };
    conclude(report, step, status);
}

fn install_framework(host: &Host, paths: &PathResolver, report: &mut InstallReport) -> Result<(), Abort> {
    fatal_step(report, Step::Framework, || {
        let root = Descriptor::path(Component::FrameworkRoot, paths.framework_root());
        if probe(host, &root).is_present() {
            return Ok(StepStatus::Skipped(format!("Oh My Zsh at {}", paths.framework_root().display())));
        }
        oh_my_zsh::install(host, paths.framework_root()).map_err(|source| SetupError::FetchFailed {
            what: "Oh My Zsh installation".to_string(),
            source,
        })?;
        Ok(StepStatus::Performed(format!(
            "Oh My Zsh installed into {}",
            paths.framework_root().display()
        )))
    })
}

fn reconcile_resource_file(
    host: &Host,
    paths: &PathResolver,
    config: &Configuration,
    report: &mut InstallReport,
) -> Result<(), Abort> {
    fatal_step(report, Step::ResourceFile, || {
        let rendered = zshrc_template::render(config, paths.framework_root());
        let rc_file = paths.rc_file();
        if probe_content(host.fs, rc_file, rendered.as_bytes()).is_present() {
            return Ok(StepStatus::Skipped(format!("{} is up to date", rc_file.display())));
        }

        let backup = ensure_backup(host, &paths.backup_record())?;
        host.fs
            .write(rc_file, rendered.as_bytes())
            .map_err(|source| SetupError::CopyFailed {
                from: "rendered .zshrc template".to_string(),
                to: rc_file.to_path_buf(),
                source,
            })?;

        let detail = match backup {
            BackupOutcome::Created => format!(
                "{} written, previous file saved as {}",
                rc_file.display(),
                paths.backup_file().display()
            ),
            BackupOutcome::AlreadyBackedUp | BackupOutcome::NoOriginal => format!("{} written", rc_file.display()),
        };
        Ok(StepStatus::Performed(detail))
    })
}

fn change_default_shell(host: &Host, report: &mut InstallReport) -> Result<(), Abort> {
    fatal_step(report, Step::DefaultShell, || {
        let zsh = find_program(host, "zsh").ok_or_else(|| SetupError::PrivilegedOperationFailed {
            operation: "chsh".to_string(),
            reason: "zsh not found on PATH".to_string(),
        })?;
        if probe_login_shell(host, &zsh).is_present() {
            return Ok(StepStatus::Skipped(format!("login shell of {} is zsh", host.user)));
        }

        let spec = host.privileged(
            CommandSpec::new("chsh")
                .args(["-s"])
                .arg(zsh.to_string_lossy())
                .arg(host.user.as_str()),
        );
        host.runner
            .run_checked(&spec)
            .map_err(|reason| SetupError::PrivilegedOperationFailed {
                operation: format!("chsh -s {} {}", zsh.display(), host.user),
                reason,
            })?;
        Ok(StepStatus::Performed(format!(
            "login shell of {} set to {} (takes effect at next login)",
            host.user,
            zsh.display()
        )))
    })
}
