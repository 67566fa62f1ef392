// End-of-run summary, printed to stdout after all log lines (which go to stderr).

use colored::{ColoredString, Colorize};

use crate::schemas::reports::{InstallReport, RemovalResult, RestoreResult, RunOutcome, StepStatus, UninstallReport};

const WIDTH: usize = 28;

fn label(status: &StepStatus) -> &'static str {
    match status {
        StepStatus::Skipped(_) => "already present",
        StepStatus::Performed(_) => "done",
        StepStatus::Failed(_) => "FAILED",
    }
}

fn colored_label(status: &StepStatus) -> ColoredString {
    match status {
        StepStatus::Skipped(_) => label(status).dimmed(),
        StepStatus::Performed(_) => label(status).green(),
        StepStatus::Failed(_) => label(status).red().bold(),
    }
}

fn outcome_line(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Succeeded => "Result: success".to_string(),
        RunOutcome::Bootstrapped(path) => format!(
            "Result: default configuration written to {}; nothing installed",
            path.display()
        ),
        RunOutcome::Aborted { step, reason } => format!("Result: aborted during {step}: {reason}"),
    }
}

pub fn print_install(report: &InstallReport) {
    println!();
    println!("{}", "setup-zsh summary".bold().underline());
    for record in &report.steps {
        println!(
            "  {:<WIDTH$} {}",
            record.step.to_string(),
            colored_label(&record.status)
        );
        if let StepStatus::Failed(reason) = &record.status {
            println!("  {:<WIDTH$} {}", "", reason.red());
        }
    }
    let line = outcome_line(&report.outcome);
    match report.outcome {
        RunOutcome::Succeeded if report.all_skipped() => {
            println!("{} {}", line.green().bold(), "(nothing to do)".dimmed())
        }
        RunOutcome::Succeeded | RunOutcome::Bootstrapped(_) => println!("{}", line.green().bold()),
        RunOutcome::Aborted { .. } => println!("{}", line.red().bold()),
    }
}

fn removal_label(result: &RemovalResult) -> String {
    match result {
        RemovalResult::Removed => "removed".to_string(),
        RemovalResult::NothingToRemove => "nothing to remove".to_string(),
        RemovalResult::Failed(reason) => format!("FAILED: {reason}"),
    }
}

fn restore_label(result: &RestoreResult) -> String {
    match result {
        RestoreResult::Restored => "restored".to_string(),
        RestoreResult::NothingToRestore => "nothing to restore".to_string(),
        RestoreResult::Failed(reason) => format!("FAILED: {reason}"),
    }
}

pub fn print_uninstall(report: &UninstallReport) {
    println!();
    println!("{}", "setup-zsh uninstall summary".bold().underline());
    println!("  {:<WIDTH$} {}", "framework", removal_label(&report.framework));
    println!("  {:<WIDTH$} {}", "shell resource file", restore_label(&report.resource_file));
    if report.exit_code() == 0 {
        println!("{}", "Result: success".green().bold());
    } else {
        println!("{}", "Result: finished with failures".red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_distinguish_the_three_outcomes() {
        assert_eq!(label(&StepStatus::Skipped(String::new())), "already present");
        assert_eq!(label(&StepStatus::Performed(String::new())), "done");
        assert_eq!(label(&StepStatus::Failed(String::new())), "FAILED");
    }

    #[test]
    fn aborted_outcome_names_step_and_reason() {
        let line = outcome_line(&RunOutcome::Aborted {
            step: "plugin installation".into(),
            reason: "plugin b/y: fetch failed".into(),
        });
        assert_eq!(line, "Result: aborted during plugin installation: plugin b/y: fetch failed");
    }

    #[test]
    fn uninstall_labels() {
        assert_eq!(removal_label(&RemovalResult::NothingToRemove), "nothing to remove");
        assert_eq!(restore_label(&RestoreResult::Failed("denied".into())), "FAILED: denied");
    }
}
