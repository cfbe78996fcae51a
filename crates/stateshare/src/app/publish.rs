//! Hands a collected document to the OS clipboard.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::errors::ShareError;
use crate::domain::model::ClipboardTarget;
use crate::infra::clipboard::{CommandRunner, ProcessRunner};

/// Lifecycle of a single publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    NotPublished,
    Published,
    Failed,
}

/// One-shot clipboard publisher; a second attempt is refused.
pub struct Publisher<R = ProcessRunner> {
    target: ClipboardTarget,
    runner: R,
    state: PublishState,
}

impl Publisher<ProcessRunner> {
    /// Publisher for the running host using real child processes.
    pub fn new() -> Self {
        Self::with_runner(ClipboardTarget::detect(), ProcessRunner)
    }
}

impl Default for Publisher<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Publisher<R> {
    pub fn with_runner(target: ClipboardTarget, runner: R) -> Self {
        Self {
            target,
            runner,
            state: PublishState::NotPublished,
        }
    }

    pub fn target(&self) -> &ClipboardTarget {
        &self.target
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Copy the full contents of `source_path` to the clipboard.
    pub fn publish(&mut self, source_path: &Path) -> Result<(), ShareError> {
        if self.state != PublishState::NotPublished {
            return Err(ShareError::AlreadyAttempted);
        }

        let result = self.dispatch(source_path);
        self.state = match result {
            Ok(()) => PublishState::Published,
            Err(_) => PublishState::Failed,
        };
        result
    }

    fn dispatch(&mut self, source_path: &Path) -> Result<(), ShareError> {
        let command = self.target.command()?;

        let data = fs::read(source_path).map_err(|source| ShareError::Io {
            path: source_path.to_path_buf(),
            source,
        })?;
        debug!(%command, path = %source_path.display(), "publishing to clipboard");

        self.runner.pipe(&command, &data)?;
        info!(bytes = data.len(), %command, "copied to clipboard");
        Ok(())
    }
}

/// Publish `source_path` on the running host.
pub fn publish(source_path: &Path) -> Result<(), ShareError> {
    Publisher::new().publish(source_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ClipboardCommand;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Vec<(ClipboardCommand, Vec<u8>)>,
        fail: bool,
    }

    impl CommandRunner for RecordingRunner {
        fn pipe(&mut self, command: &ClipboardCommand, input: &[u8]) -> Result<(), ShareError> {
            self.calls.push((command.clone(), input.to_vec()));
            if self.fail {
                return Err(ShareError::CommandUnavailable {
                    program: command.program.to_owned(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(())
        }
    }

    fn source_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state.txt");
        fs::write(&path, contents).unwrap();
        (temp, path)
    }

    #[test]
    fn macos_pipes_to_pbcopy() {
        let (_temp, path) = source_file("--- a.txt ---\n```\nhello\n```\n\n");
        let mut publisher =
            Publisher::with_runner(ClipboardTarget::MacOs, RecordingRunner::default());

        publisher.publish(&path).unwrap();

        let calls = &publisher.runner().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.program, "pbcopy");
        assert!(calls[0].0.args.is_empty());
        assert_eq!(calls[0].1, b"--- a.txt ---\n```\nhello\n```\n\n");
        assert_eq!(publisher.state(), PublishState::Published);
    }

    #[test]
    fn linux_uses_clipboard_selection() {
        let (_temp, path) = source_file("payload");
        let mut publisher =
            Publisher::with_runner(ClipboardTarget::Linux, RecordingRunner::default());

        publisher.publish(&path).unwrap();

        let (command, input) = &publisher.runner().calls[0];
        assert_eq!(command.program, "xclip");
        assert_eq!(command.args, ["-selection", "clipboard"]);
        assert!(!command.args.contains(&"primary"));
        assert_eq!(input, b"payload");
    }

    #[test]
    fn unsupported_host_never_invokes_a_command() {
        let (_temp, path) = source_file("payload");
        let mut publisher = Publisher::with_runner(
            ClipboardTarget::Unsupported("windows".into()),
            RecordingRunner::default(),
        );

        let err = publisher.publish(&path).unwrap_err();

        assert!(matches!(err, ShareError::UnsupportedPlatform { ref os } if os == "windows"));
        assert!(publisher.runner().calls.is_empty());
        assert_eq!(publisher.state(), PublishState::Failed);
    }

    #[test]
    fn unreadable_source_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut publisher =
            Publisher::with_runner(ClipboardTarget::Linux, RecordingRunner::default());

        let err = publisher.publish(&temp.path().join("absent.txt")).unwrap_err();

        assert!(matches!(err, ShareError::Io { .. }));
        assert!(publisher.runner().calls.is_empty());
    }

    #[test]
    fn command_failure_is_terminal() {
        let (_temp, path) = source_file("payload");
        let runner = RecordingRunner {
            fail: true,
            ..RecordingRunner::default()
        };
        let mut publisher = Publisher::with_runner(ClipboardTarget::Linux, runner);

        let err = publisher.publish(&path).unwrap_err();
        assert!(matches!(err, ShareError::CommandUnavailable { .. }));
        assert_eq!(publisher.state(), PublishState::Failed);

        let retry = publisher.publish(&path).unwrap_err();
        assert!(matches!(retry, ShareError::AlreadyAttempted));
        assert_eq!(publisher.runner().calls.len(), 1);
    }
}
