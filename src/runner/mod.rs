//! External process execution.
//!
//! Every git and ssh invocation goes through a [CommandRunner]. The real
//! implementation, [SystemRunner], spawns the process and echoes what it
//! does; [mock::RecordingRunner] records invocations for tests.

pub mod mock;

pub use mock::RecordingRunner;

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{MexReleaseError, Result};
use crate::ui;

/// Runs an external program with a fixed argument list.
pub trait CommandRunner {
    /// Run `program` with `args` and return its trimmed standard output.
    ///
    /// # Returns
    /// * `Ok(String)` - Trimmed stdout when the process exits with code 0
    /// * `Err(CommandExecution)` - Non-zero exit, carrying the command line and stderr
    ///   (stdout when stderr is empty)
    /// * `Err(CommandSpawn)` - The process could not be started at all
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).run(program, args)
    }
}

/// Executes commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
}

impl SystemRunner {
    /// Runner that executes in the current working directory
    pub fn new() -> Self {
        SystemRunner { working_dir: None }
    }

    /// Runner that executes every command inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        SystemRunner {
            working_dir: Some(dir.as_ref().to_path_buf()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command_line = ui::format_command_line(program, args);
        ui::display_command(&command_line);
        debug!(command = %command_line, dir = ?self.working_dir, "running command");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| MexReleaseError::CommandSpawn {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                // git commit reports "nothing to commit" on stdout
                stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            debug!(
                command = %command_line,
                code = ?output.status.code(),
                "command exited unsuccessfully"
            );
            return Err(MexReleaseError::CommandExecution {
                command: command_line,
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        ui::display_output(&stdout);
        Ok(stdout.trim().to_string())
    }
}
