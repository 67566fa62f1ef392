//! # Plugin Installer
//!
//! Reconciles the configured external plugins (and an external theme) with the
//! custom directory. Identifiers are handled strictly in configuration order,
//! one at a time:
//!
//! - target directory present: skipped, nothing runs;
//! - target directory absent: shallow-cloned from GitHub.
//!
//! The first failed clone ends the run. Directories cloned before it stay on
//! disk; there is no automatic cleanup of partial progress. Duplicate
//! identifiers are not removed: the second occurrence finds the directory the
//! first one created and is skipped.

use colored::Colorize;

use crate::errors::SetupError;
use crate::installers::git;
use crate::libs::host::Host;
use crate::libs::orchestrator::{conclude, enter};
use crate::libs::state_prober::probe;
use crate::libs::utilities::file_operations::FileSystem;
use crate::schemas::path_resolver::PathResolver;
use crate::schemas::reports::{InstallReport, Step, StepStatus};
use crate::schemas::state::{Component, Descriptor, PluginRecord};
use crate::log_info;

/// Fetches every absent plugin in `identifiers`, stopping at the first failure.
pub fn reconcile(
    host: &Host,
    paths: &PathResolver,
    identifiers: &[String],
    report: &mut InstallReport,
) -> Result<(), SetupError> {
    if identifiers.is_empty() {
        log_info!("[Plugins] No external plugins configured.");
        return Ok(());
    }
    log_info!("[Plugins] Reconciling {} external plugin(s)...", identifiers.len());

    for identifier in identifiers {
        let record = paths.plugin_record(identifier);
        let component = Component::Plugin(record.identifier.clone());
        ensure_repository(host, Step::Plugin(record.identifier.clone()), component, &record, report)?;
    }
    Ok(())
}

/// Fetches an external theme into the custom themes directory unless present.
pub fn ensure_theme(
    host: &Host,
    paths: &PathResolver,
    identifier: &str,
    report: &mut InstallReport,
) -> Result<(), SetupError> {
    let record = paths.theme_record(identifier);
    let component = Component::Theme(record.identifier.clone());
    ensure_repository(host, Step::Theme(record.identifier.clone()), component, &record, report)
}

fn ensure_repository(
    host: &Host,
    step: Step,
    component: Component,
    record: &PluginRecord,
    report: &mut InstallReport,
) -> Result<(), SetupError> {
    enter(&step);
    let target = Descriptor::path(component, &record.target_directory);

    if probe(host, &target).is_present() {
        let detail = format!("{} ({})", record.identifier, record.target_directory.display());
        conclude(report, step, StepStatus::Skipped(detail));
        return Ok(());
    }

    log_info!(
        "{} Fetching {}...",
        step.section().bold(),
        record.identifier.cyan()
    );
    let cloned = match record.target_directory.parent() {
        Some(parent) => host.fs.create_dir_all(parent).map_err(|source| SetupError::CopyFailed {
            from: git::remote_url(&record.identifier),
            to: parent.to_path_buf(),
            source,
        }),
        None => Ok(()),
    }
    .and_then(|()| {
        git::clone(host, &record.identifier, &record.target_directory).map_err(|source| SetupError::FetchFailed {
            what: step.to_string(),
            source,
        })
    });

    match cloned {
        Ok(()) => {
            let detail = format!("{} -> {}", record.identifier, record.target_directory.display());
            conclude(report, step, StepStatus::Performed(detail));
            Ok(())
        }
        Err(e) => {
            conclude(report, step, StepStatus::Failed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::testing::{FakeHttp, FakeRunner};
    use crate::libs::utilities::file_operations::memory::MemoryFs;
    use std::ffi::OsString;
    use std::path::Path;

    fn setup(fs: &MemoryFs) -> PathResolver {
        fs.add_dir("/home/ada/.oh-my-zsh/custom/plugins");
        PathResolver::with_home(Path::new("/home/ada"), None, None)
    }

    fn host<'a>(fs: &'a MemoryFs, runner: &'a FakeRunner<'a>, http: &'a FakeHttp) -> Host<'a> {
        Host {
            fs,
            runner,
            http,
            search_path: OsString::from("/usr/bin"),
            user: "ada".into(),
        }
    }

    #[test]
    fn clones_absent_and_skips_present_in_order() {
        let fs = MemoryFs::new();
        let paths = setup(&fs);
        fs.add_dir("/home/ada/.oh-my-zsh/custom/plugins/x");
        let runner = FakeRunner::with_fs(&fs);
        runner.clones("git clone");
        let http = FakeHttp::new();
        let host = host(&fs, &runner, &http);
        let mut report = InstallReport::new();

        reconcile(&host, &paths, &["a/x".into(), "b/y".into()], &mut report).unwrap();

        assert_eq!(
            runner.calls(),
            vec!["git clone --depth=1 --quiet https://github.com/b/y.git /home/ada/.oh-my-zsh/custom/plugins/y"]
        );
        assert!(report.status_of(&Step::Plugin("a/x".into())).unwrap().is_skipped());
        assert!(matches!(
            report.status_of(&Step::Plugin("b/y".into())),
            Some(StepStatus::Performed(_))
        ));
    }

    #[test]
    fn duplicate_identifier_is_a_noop_the_second_time() {
        let fs = MemoryFs::new();
        let paths = setup(&fs);
        let runner = FakeRunner::with_fs(&fs);
        runner.clones("git clone");
        let http = FakeHttp::new();
        let host = host(&fs, &runner, &http);
        let mut report = InstallReport::new();

        reconcile(&host, &paths, &["a/x".into(), "a/x".into()], &mut report).unwrap();

        assert_eq!(runner.count("git clone"), 1);
        assert_eq!(report.steps.len(), 2);
        assert!(report.steps[1].status.is_skipped());
    }

    #[test]
    fn first_failure_stops_and_keeps_earlier_clones() {
        let fs = MemoryFs::new();
        let paths = setup(&fs);
        let runner = FakeRunner::with_fs(&fs);
        runner.clones("git clone");
        runner.fail("github.com/b/y.git", "fatal: repository not found");
        let http = FakeHttp::new();
        let host = host(&fs, &runner, &http);
        let mut report = InstallReport::new();

        let err = reconcile(&host, &paths, &["a/x".into(), "b/y".into(), "c/z".into()], &mut report).unwrap_err();

        assert!(err.to_string().contains("plugin b/y"));
        assert!(err.to_string().contains("repository not found"));
        assert!(fs.exists(Path::new("/home/ada/.oh-my-zsh/custom/plugins/x")));
        assert_eq!(runner.count("c/z"), 0);
        assert_eq!(report.steps.len(), 2);
    }

    #[test]
    fn external_theme_goes_to_themes_dir() {
        let fs = MemoryFs::new();
        let paths = setup(&fs);
        let runner = FakeRunner::with_fs(&fs);
        runner.clones("git clone");
        let http = FakeHttp::new();
        let host = host(&fs, &runner, &http);
        let mut report = InstallReport::new();

        ensure_theme(&host, &paths, "romkatv/powerlevel10k", &mut report).unwrap();
        assert!(fs.exists(Path::new("/home/ada/.oh-my-zsh/custom/themes/powerlevel10k")));

        ensure_theme(&host, &paths, "romkatv/powerlevel10k", &mut report).unwrap();
        assert_eq!(runner.count("git clone"), 1);
    }
}
