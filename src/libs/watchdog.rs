// Whole-run wall-clock limit. There is no per-step cancellation: when the
// limit is hit the process exits, whatever step it is in.

use std::process;
use std::thread;
use std::time::Duration;

use colored::Colorize;

use crate::{log_debug, log_error};

/// Exit status used when the time limit is reached (same as coreutils `timeout`).
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Starts a detached thread that terminates the process after `limit`.
pub fn arm(limit: Duration) {
    log_debug!("[Timeout] Run limited to {}s", limit.as_secs());
    let spawned = thread::Builder::new()
        .name("setup-zsh-watchdog".to_string())
        .spawn(move || {
            thread::sleep(limit);
            log_error!(
                "[Timeout] {} after {}s, terminating.",
                "Time limit reached".red().bold(),
                limit.as_secs()
            );
            process::exit(TIMEOUT_EXIT_CODE);
        });
    if let Err(e) = spawned {
        log_error!("[Timeout] Could not start the watchdog: {}", e);
    }
}
