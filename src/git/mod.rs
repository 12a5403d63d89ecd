//! Git operations abstraction layer
//!
//! The releaser talks to version control only through the [Repository]
//! trait. Two implementations exist:
//!
//! - [repository::CliRepository]: runs the `git` command line through a
//!   [CommandRunner](crate::runner::CommandRunner)
//! - [mock::MockRepository]: canned answers plus a call log, for tests
//!
//! The trait deliberately hands back raw command output where the releaser
//! interprets it (`status`, `describe_remote`), so the textual contracts of
//! git stay in one place.

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use repository::CliRepository;

use crate::error::Result;

/// Version control operations needed to cut a release
pub trait Repository {
    /// Short working tree status (`git status --short`).
    ///
    /// Empty output means the working tree is clean.
    fn status(&self) -> Result<String>;

    /// Name of the checked-out branch (`git rev-parse --abbrev-ref HEAD`)
    fn current_branch(&self) -> Result<String>;

    /// Human-readable description of a remote (`git remote show <remote>`).
    ///
    /// The output contains a line `HEAD branch: <name>` naming the remote's
    /// default branch.
    fn describe_remote(&self, remote: &str) -> Result<String>;

    /// Commit the given paths with a message
    fn commit(&self, message: &str, paths: &[&str]) -> Result<()>;

    /// Create a lightweight tag on HEAD
    fn tag(&self, name: &str) -> Result<()>;

    /// Push the current branch to `remote` (`git push <remote> HEAD`)
    fn push(&self, remote: &str) -> Result<()>;

    /// Push all local tags to `remote`
    fn push_tags(&self, remote: &str) -> Result<()>;

    /// Set a repository-local config value (`git config --local <key> <value>`)
    fn set_local_config(&self, key: &str, value: &str) -> Result<()>;
}
