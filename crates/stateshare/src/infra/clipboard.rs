//! Clipboard integration utilities.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::errors::ShareError;
use crate::domain::model::ClipboardCommand;

/// Executes a clipboard command with `input` piped to its stdin.
pub trait CommandRunner {
    fn pipe(&mut self, command: &ClipboardCommand, input: &[u8]) -> Result<(), ShareError>;
}

/// Runs clipboard commands as child processes with an explicit argument list.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn pipe(&mut self, command: &ClipboardCommand, input: &[u8]) -> Result<(), ShareError> {
        debug!(%command, bytes = input.len(), "spawning clipboard command");

        let unavailable = |source: io::Error| ShareError::CommandUnavailable {
            program: command.program.to_owned(),
            source,
        };

        let mut child = Command::new(command.program)
            .args(command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(unavailable)?;

        // stdin is dropped after the write so the child sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(input),
            None => Ok(()),
        };

        // always reap; an early exit surfaces as a broken pipe on write
        let status = child.wait().map_err(unavailable)?;
        if !status.success() {
            return Err(ShareError::CommandFailed {
                program: command.program.to_owned(),
                status,
            });
        }
        written.map_err(unavailable)
    }
}
