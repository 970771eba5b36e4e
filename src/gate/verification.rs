//! Bounded execution of per-track verification commands
//!
//! Commands come from track records and run through the shell. Each run is
//! wall-clock bounded; a command that overruns its budget is killed and
//! reported as timed out rather than failed.

use anyhow::{Context, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;
use wait_timeout::ChildExt;

/// How many trailing output lines to keep from a failing command.
const TAIL_LINES: usize = 10;

/// Terminal result of one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Passed,
    Failed { exit_code: Option<i32>, tail: String },
    TimedOut { timeout: Duration },
    /// The process could not be spawned at all. Reported distinctly from
    /// `Failed` because it usually means a broken environment, not a broken
    /// track.
    LaunchFailed { reason: String },
}

/// Run a shell command with a wall-clock bound.
///
/// Stdout and stderr are drained on background threads so a chatty command
/// cannot deadlock on a full pipe before the timeout fires.
pub fn run_verification(command: &str, timeout: Duration) -> VerificationOutcome {
    debug!(command, timeout_secs = timeout.as_secs(), "Running verification command");

    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            return VerificationOutcome::LaunchFailed {
                reason: e.to_string(),
            }
        }
    };

    let stdout_handle = drain_pipe(child.stdout.take());
    let stderr_handle = drain_pipe(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            kill_and_reap(&mut child);
            return VerificationOutcome::TimedOut { timeout };
        }
        Err(e) => {
            kill_and_reap(&mut child);
            return VerificationOutcome::LaunchFailed {
                reason: format!("wait failed: {e}"),
            };
        }
    };

    let stdout = join_pipe(stdout_handle);
    let stderr = join_pipe(stderr_handle);

    if status.success() {
        VerificationOutcome::Passed
    } else {
        VerificationOutcome::Failed {
            exit_code: status.code(),
            tail: output_tail(&stdout, &stderr),
        }
    }
}

fn drain_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut r| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = r.read_to_string(&mut buf);
            buf
        })
    })
}

fn join_pipe(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Last few lines of combined output, stderr preferred when both exist.
fn output_tail(stdout: &str, stderr: &str) -> String {
    let source = if stderr.trim().is_empty() { stdout } else { stderr };
    let lines: Vec<&str> = source.lines().collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
}

/// Parse a human-supplied timeout in seconds into a bounded duration.
pub fn parse_timeout(seconds: u64) -> Result<Duration> {
    if seconds == 0 {
        anyhow::bail!("Verification timeout must be at least 1 second");
    }
    // Arbitrary upper bound to catch unit mistakes (ms pasted as seconds).
    if seconds > 24 * 60 * 60 {
        anyhow::bail!("Verification timeout of {seconds}s exceeds the 24h ceiling");
    }
    Duration::try_from_secs_f64(seconds as f64)
        .with_context(|| format!("Invalid timeout: {seconds}s"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_command() {
        let outcome = run_verification("true", Duration::from_secs(5));
        assert_eq!(outcome, VerificationOutcome::Passed);
    }

    #[test]
    fn test_failing_command_captures_exit_code_and_tail() {
        let outcome = run_verification("echo boom >&2; exit 3", Duration::from_secs(5));

        match outcome {
            VerificationOutcome::Failed { exit_code, tail } => {
                assert_eq!(exit_code, Some(3));
                assert!(tail.contains("boom"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_kills_process() {
        let outcome = run_verification("sleep 10", Duration::from_millis(200));
        assert!(matches!(outcome, VerificationOutcome::TimedOut { .. }));
    }

    #[test]
    fn test_tail_keeps_last_lines_only() {
        let stdout: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let tail = output_tail(&stdout, "");

        assert!(tail.starts_with("line 20"));
        assert!(tail.ends_with("line 29"));
    }

    #[test]
    fn test_parse_timeout_bounds() {
        assert!(parse_timeout(0).is_err());
        assert!(parse_timeout(90_000_000).is_err());
        assert_eq!(parse_timeout(300).unwrap(), Duration::from_secs(300));
    }
}
