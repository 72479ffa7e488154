//! External process execution
//!
//! Runs the native packaging tools as blocking child processes with piped
//! output and an optional deadline.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::InvokeError;

/// Outcome of a finished child process
#[derive(Debug)]
pub struct ProcessResult {
    /// Exit code (-1 when terminated by a signal)
    pub code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessResult {
    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout followed by stderr, for logs and error reports
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// Human-readable command line for logs and error messages
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.contains(' ') {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}

/// Run a command to completion, capturing its output
///
/// Both pipes are drained on separate threads so a chatty tool cannot fill
/// them and stall. When a timeout is given and expires, the child is killed
/// and the run reports [`InvokeError::Timeout`]. A non-zero exit is returned
/// as a plain result; interpretation is the caller's job.
pub fn run_command(
    program: &str,
    args: &[String],
    cwd: &Path,
    envs: &[(String, String)],
    timeout: Option<Duration>,
) -> Result<ProcessResult, InvokeError> {
    let display = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().map_err(|e| InvokeError::Spawn {
        command: display.clone(),
        error: e.to_string(),
    })?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_handle = std::thread::spawn(move || read_pipe(stdout_pipe));
    let stderr_handle = std::thread::spawn(move || read_pipe(stderr_pipe));

    let status = match timeout {
        Some(limit) => match child.wait_timeout(limit) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_handle.join();
                let _ = stderr_handle.join();
                return Err(InvokeError::Timeout {
                    command: display,
                    seconds: limit.as_secs(),
                });
            }
            Err(e) => {
                return Err(InvokeError::Wait {
                    command: display,
                    error: e.to_string(),
                });
            }
        },
        None => child.wait().map_err(|e| InvokeError::Wait {
            command: display.clone(),
            error: e.to_string(),
        })?,
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(ProcessResult {
        code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

fn read_pipe<R: Read>(pipe: Option<R>) -> String {
    let mut bytes = Vec::new();
    if let Some(mut pipe) = pipe {
        if pipe.read_to_end(&mut bytes).is_err() {
            return String::new();
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
