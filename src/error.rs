use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for mex-release operations
#[derive(Error, Debug)]
pub enum MexReleaseError {
    #[error("Working tree is dirty. Can only release clean working tree.")]
    DirtyTree,

    #[error("Not on default branch. Can only release on default branch (current: {current}, default: {default}).")]
    WrongBranch { current: String, default: String },

    #[error("Could not determine the default branch of remote '{remote}'")]
    RemoteHeadUnknown { remote: String },

    #[error("Current version string '{0}' does not match expected format.")]
    InvalidVersionFormat(String),

    #[error("Unexpected bump value '{0}' (expected major, minor or patch).")]
    InvalidBumpKind(String),

    #[error("Error running command `{command}`: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Failed to start command `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Release failed: {0}")]
    Release(#[source] Box<MexReleaseError>),

    #[error("No pyproject.toml found in {} or any parent directory", .0.display())]
    ProjectRootNotFound(PathBuf),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Emoji error: {0}")]
    Emoji(String),

    #[error("Signing setup error: {0}")]
    Signing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlEdit(#[from] toml_edit::TomlError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base64 key material: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Convenience type alias for Results in mex-release
pub type Result<T> = std::result::Result<T, MexReleaseError>;

impl MexReleaseError {
    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        MexReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MexReleaseError::Config(msg.into())
    }

    /// Create an emoji error with context
    pub fn emoji(msg: impl Into<String>) -> Self {
        MexReleaseError::Emoji(msg.into())
    }

    /// Create a signing error with context
    pub fn signing(msg: impl Into<String>) -> Self {
        MexReleaseError::Signing(msg.into())
    }

    /// Wrap an error as a release failure. Already wrapped errors are kept as they are.
    pub fn release(inner: MexReleaseError) -> Self {
        match inner {
            MexReleaseError::Release(_) => inner,
            other => MexReleaseError::Release(Box::new(other)),
        }
    }

    /// The innermost error, looking through the release wrapper
    pub fn root_cause(&self) -> &MexReleaseError {
        match self {
            MexReleaseError::Release(inner) => inner.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MexReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MexReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_gate_messages() {
        assert!(MexReleaseError::DirtyTree
            .to_string()
            .contains("Working tree is dirty"));

        let err = MexReleaseError::WrongBranch {
            current: "feature".to_string(),
            default: "main".to_string(),
        };
        assert!(err.to_string().contains("Not on default branch"));
        assert!(err.to_string().contains("feature"));

        assert!(MexReleaseError::InvalidVersionFormat("invalid".to_string())
            .to_string()
            .contains("does not match expected format"));
        assert!(MexReleaseError::InvalidBumpKind("huge".to_string())
            .to_string()
            .contains("Unexpected bump value"));
    }

    #[test]
    fn test_command_execution_carries_command_and_stderr() {
        let err = MexReleaseError::CommandExecution {
            command: "git push".to_string(),
            stderr: "rejected".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git push"));
        assert!(msg.contains("rejected"));
    }

    #[test]
    fn test_release_wraps_once() {
        let err = MexReleaseError::release(MexReleaseError::DirtyTree);
        assert!(err.to_string().starts_with("Release failed"));

        let twice = MexReleaseError::release(err);
        assert!(matches!(twice.root_cause(), MexReleaseError::DirtyTree));
        match twice {
            MexReleaseError::Release(inner) => {
                assert!(matches!(*inner, MexReleaseError::DirtyTree))
            }
            other => panic!("expected release error, got {other:?}"),
        }
    }

    #[test]
    fn test_release_keeps_source() {
        use std::error::Error;

        let err = MexReleaseError::release(MexReleaseError::InvalidBumpKind("x".to_string()));
        let source = err.source().expect("release error should expose its cause");
        assert!(source.to_string().contains("Unexpected bump value"));
    }
}
