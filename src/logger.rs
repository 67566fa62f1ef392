// Logging for `setup-zsh`.
// Every line goes to stderr with a colored level tag, so stdout stays free for
// the final summary. Debug lines are only printed once `init(true)` ran.

use colored::*;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

// `log_info!` for progress the user should see on every run.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", "[INFO]".bright_green(), format!($($arg)*)));
}

// `log_warn!` for recorded, non-fatal problems (e.g. the auxiliary tool could not be installed).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", "[WARN]".bright_yellow(), format!($($arg)*)));
}

// `log_error!` for fatal problems; the run stops right after these.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", "[ERROR]".bright_red(), format!($($arg)*)));
}

// `log_debug!` for command lines, probe results and other internals.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", "[DEBUG]".dimmed(), format!($($arg)*));
        }
    };
}

static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Sets the global debug flag. Call once, right after argument parsing.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    log_debug!("Logger initialized in DEBUG mode");
}

/// Whether `log_debug!` lines are printed. `false` until `init` is called.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}

/// The three ways a step can end, each with its own log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    Skipped,
    Performed,
    Failed,
}

/// Prints the single outcome line of an orchestrator step.
///
/// `section` is the bracketed tag (`[Plugins]`), `detail` the human readable part.
pub fn step_line(section: &str, mark: StepMark, detail: &str) {
    match mark {
        StepMark::Skipped => log_info!(
            "{} {} {}",
            section.bold(),
            "skipped (already present):".dimmed(),
            detail
        ),
        StepMark::Performed => log_info!("{} {} {}", section.bold(), "performed:".green(), detail),
        StepMark::Failed => log_error!("{} {} {}", section.bold(), "failed:".red(), detail.red()),
    }
}
