use std::cell::RefCell;

use crate::error::{MexReleaseError, Result};
use crate::git::Repository;

/// One recorded call against a [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Status,
    CurrentBranch,
    DescribeRemote(String),
    Commit { message: String, paths: Vec<String> },
    Tag(String),
    Push(String),
    PushTags(String),
    SetLocalConfig { key: String, value: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    status: String,
    branch: String,
    remote_description: String,
    fail_push: bool,
    calls: RefCell<Vec<GitCall>>,
}

impl MockRepository {
    /// A clean repository on `main`, whose origin also defaults to `main`
    pub fn new() -> Self {
        MockRepository {
            status: String::new(),
            branch: "main".to_string(),
            remote_description: "* remote origin\n  HEAD branch: main\n".to_string(),
            fail_push: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Set the `status --short` output
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the checked-out branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the full `remote show` output
    pub fn with_remote_description(mut self, description: impl Into<String>) -> Self {
        self.remote_description = description.into();
        self
    }

    /// Make `push` fail as if the remote rejected it
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    /// Calls that change history or configuration (commit, tag, push, config)
    pub fn mutating_calls(&self) -> Vec<GitCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                !matches!(
                    call,
                    GitCall::Status | GitCall::CurrentBranch | GitCall::DescribeRemote(_)
                )
            })
            .cloned()
            .collect()
    }

    fn record(&self, call: GitCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn status(&self) -> Result<String> {
        self.record(GitCall::Status);
        Ok(self.status.trim().to_string())
    }

    fn current_branch(&self) -> Result<String> {
        self.record(GitCall::CurrentBranch);
        Ok(self.branch.clone())
    }

    fn describe_remote(&self, remote: &str) -> Result<String> {
        self.record(GitCall::DescribeRemote(remote.to_string()));
        Ok(self.remote_description.trim().to_string())
    }

    fn commit(&self, message: &str, paths: &[&str]) -> Result<()> {
        self.record(GitCall::Commit {
            message: message.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        });
        Ok(())
    }

    fn tag(&self, name: &str) -> Result<()> {
        self.record(GitCall::Tag(name.to_string()));
        Ok(())
    }

    fn push(&self, remote: &str) -> Result<()> {
        self.record(GitCall::Push(remote.to_string()));
        if self.fail_push {
            return Err(MexReleaseError::CommandExecution {
                command: format!("git push {} HEAD", remote),
                stderr: "! [rejected] (fetch first)".to_string(),
            });
        }
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        self.record(GitCall::PushTags(remote.to_string()));
        Ok(())
    }

    fn set_local_config(&self, key: &str, value: &str) -> Result<()> {
        self.record(GitCall::SetLocalConfig {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_defaults() {
        let repo = MockRepository::default();
        assert_eq!(repo.status().unwrap(), "");
        assert_eq!(repo.current_branch().unwrap(), "main");
        assert!(repo
            .describe_remote("origin")
            .unwrap()
            .contains("HEAD branch: main"));
        assert!(repo.mutating_calls().is_empty());
    }

    #[test]
    fn test_mock_repository_records_calls() {
        let repo = MockRepository::new();
        repo.tag("1.0.0").unwrap();
        repo.push("origin").unwrap();

        assert_eq!(
            repo.calls(),
            vec![GitCall::Tag("1.0.0".to_string()), GitCall::Push("origin".to_string())]
        );
    }

    #[test]
    fn test_mock_repository_failing_push() {
        let repo = MockRepository::new().failing_push();
        assert!(repo.push("origin").is_err());
        assert_eq!(repo.calls(), vec![GitCall::Push("origin".to_string())]);
    }
}
