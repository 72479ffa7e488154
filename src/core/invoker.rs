//! External builder invocation
//!
//! Thin policy layer over [`crate::infra::process`]: logs the command,
//! applies the configured environment and timeout, and turns a non-zero
//! exit into an error carrying the tool's output.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::format::BuildCommand;
use crate::error::InvokeError;
use crate::infra::process::{self, ProcessResult};

/// Runs the format's packaging tool over a prepared staging tree
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    envs: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra environment the tool sees on top of the inherited one
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.envs.extend(vars);
        self
    }

    /// Kill the tool when it runs longer than this
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Run the command, failing on spawn errors, timeouts and non-zero exits
    pub fn run(&self, command: &BuildCommand) -> Result<ProcessResult, InvokeError> {
        info!("Running {}", command.display());
        debug!("Working directory: {}", command.cwd.display());

        let result = process::run_command(
            &command.program,
            &command.args,
            &command.cwd,
            &self.envs,
            self.timeout,
        )?;

        if !result.success() {
            return Err(InvokeError::NonZeroExit {
                command: command.display(),
                code: result.code,
                output: result.combined_output(),
            });
        }

        Ok(result)
    }
}
