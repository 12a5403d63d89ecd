use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{MexReleaseError, Result};
use crate::runner::CommandRunner;
use crate::ui::format_command_line;

/// Command runner that never spawns anything.
///
/// Every invocation is recorded as its command line. Output is looked up by
/// exact command line and defaults to the empty string.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<String>>,
    outputs: HashMap<String, String>,
    failures: HashMap<String, String>,
}

impl RecordingRunner {
    /// Create a runner with no canned outputs
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `stdout` whenever `command_line` is run
    pub fn with_output(mut self, command_line: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.outputs.insert(command_line.into(), stdout.into());
        self
    }

    /// Fail `command_line` with `stderr`
    pub fn with_failure(mut self, command_line: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.failures.insert(command_line.into(), stderr.into());
        self
    }

    /// All command lines run so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command_line = format_command_line(program, args);
        self.invocations.borrow_mut().push(command_line.clone());

        if let Some(stderr) = self.failures.get(&command_line) {
            return Err(MexReleaseError::CommandExecution {
                command: command_line,
                stderr: stderr.clone(),
            });
        }

        Ok(self
            .outputs
            .get(&command_line)
            .map(|out| out.trim().to_string())
            .unwrap_or_default())
    }
}
