//! Domain-specific errors.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("manifest must list at least one file")]
    EmptyManifest,

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("clipboard is not supported on platform '{os}'")]
    UnsupportedPlatform { os: String },

    #[error("clipboard command '{program}' is unavailable: {source}")]
    CommandUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("clipboard command '{program}' exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("clipboard publish was already attempted")]
    AlreadyAttempted,
}

impl ShareError {
    /// Classify a read failure for `path`, separating missing files from other IO errors.
    pub fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            ShareError::FileNotFound { path }
        } else {
            ShareError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_classified_as_not_found() {
        let err = ShareError::from_read("gone.rs", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ShareError::FileNotFound { ref path } if path.ends_with("gone.rs")));
        assert_eq!(err.to_string(), "file not found: gone.rs");
    }

    #[test]
    fn other_read_failures_stay_io() {
        let err = ShareError::from_read(
            "locked.rs",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ShareError::Io { .. }));
    }
}
