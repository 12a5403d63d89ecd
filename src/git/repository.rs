use crate::error::Result;
use crate::runner::CommandRunner;

/// [Repository](super::Repository) backed by the `git` command line
pub struct CliRepository<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> CliRepository<R> {
    /// Wrap a command runner; the runner decides the working directory
    pub fn new(runner: R) -> Self {
        CliRepository { runner }
    }

    /// Access the underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        self.runner.run("git", args)
    }
}

impl<R: CommandRunner> super::Repository for CliRepository<R> {
    fn status(&self) -> Result<String> {
        self.git(&["status", "--short"])
    }

    fn current_branch(&self) -> Result<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn describe_remote(&self, remote: &str) -> Result<String> {
        self.git(&["remote", "show", remote])
    }

    fn commit(&self, message: &str, paths: &[&str]) -> Result<()> {
        let mut args = vec!["commit", "-m", message];
        args.extend_from_slice(paths);
        self.git(&args)?;
        Ok(())
    }

    fn tag(&self, name: &str) -> Result<()> {
        self.git(&["tag", name])?;
        Ok(())
    }

    fn push(&self, remote: &str) -> Result<()> {
        self.git(&["push", remote, "HEAD"])?;
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        self.git(&["push", remote, "--tags"])?;
        Ok(())
    }

    fn set_local_config(&self, key: &str, value: &str) -> Result<()> {
        self.git(&["config", "--local", key, value])?;
        Ok(())
    }
}
