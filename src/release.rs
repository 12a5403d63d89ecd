//! Release orchestration.
//!
//! A release runs three read-only gates (clean tree, default branch,
//! well-formed version), then bumps the manifest, rolls the changelog over,
//! and only after both files are on disk commits, tags and pushes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use tracing::{debug, info};

use crate::changelog;
use crate::config::ReleaseConfig;
use crate::error::{MexReleaseError, Result};
use crate::git::Repository;
use crate::project::{Manifest, MANIFEST_FILE};
use crate::ui;
use crate::version::{BumpKind, Version};

static REMOTE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HEAD branch: (\S+)").expect("remote head pattern is valid"));

/// Extracts the default branch from `git remote show` output.
pub fn parse_remote_head(remote_description: &str) -> Option<&str> {
    REMOTE_HEAD
        .captures(remote_description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Cuts a release of one project.
///
/// The releaser owns the in-memory manifest for the duration of a release;
/// git is reached only through the injected [Repository].
pub struct Releaser<G: Repository> {
    root: PathBuf,
    bump: String,
    repo: G,
    options: ReleaseConfig,
    release_date: Option<NaiveDate>,
    manifest: Manifest,
}

impl<G: Repository> Releaser<G> {
    /// Create a releaser for the project at `root`, loading its manifest.
    ///
    /// `bump` is validated only when the release computes the next version,
    /// after the repository gates have passed.
    pub fn new(root: impl Into<PathBuf>, bump: impl Into<String>, repo: G) -> Result<Self> {
        let root = root.into();
        let manifest = Manifest::load(&root)?;
        Ok(Releaser {
            root,
            bump: bump.into(),
            repo,
            options: ReleaseConfig::default(),
            release_date: None,
            manifest,
        })
    }

    /// Use a non-default changelog file or remote
    pub fn with_options(mut self, options: ReleaseConfig) -> Self {
        self.options = options;
        self
    }

    /// Date written into the new changelog heading. Defaults to the UTC
    /// date at the moment the changelog is rolled over.
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repository(&self) -> &G {
        &self.repo
    }

    /// Only continue if the working tree has no uncommitted changes.
    pub fn check_working_tree(&self) -> Result<()> {
        let status = self.repo.status()?;
        if !status.trim().is_empty() {
            debug!(%status, "working tree has changes");
            return Err(MexReleaseError::DirtyTree);
        }
        Ok(())
    }

    /// Only continue if the remote's default branch is checked out.
    pub fn check_default_branch(&self) -> Result<()> {
        let current = self.repo.current_branch()?;
        let remote = &self.options.remote;
        let description = self.repo.describe_remote(remote)?;
        let default = parse_remote_head(&description).ok_or_else(|| {
            MexReleaseError::RemoteHeadUnknown {
                remote: remote.clone(),
            }
        })?;

        if current.trim() != default {
            return Err(MexReleaseError::WrongBranch {
                current: current.trim().to_string(),
                default: default.to_string(),
            });
        }
        Ok(())
    }

    /// The version currently recorded in the manifest, unvalidated.
    pub fn get_current_version(&self) -> Result<String> {
        self.manifest.version()
    }

    /// Only continue if the current version looks like `0.3.14`.
    pub fn check_version_string(&self) -> Result<()> {
        let current = self.get_current_version()?;
        if !Version::is_valid(&current) {
            return Err(MexReleaseError::InvalidVersionFormat(current));
        }
        Ok(())
    }

    /// The version this release will produce.
    pub fn next_version(&self) -> Result<Version> {
        let current = Version::parse(&self.get_current_version()?)?;
        let kind: BumpKind = self.bump.parse()?;
        Ok(current.bump(kind))
    }

    /// Run the whole release.
    ///
    /// Any failure is reported to the user and returned wrapped in
    /// [MexReleaseError::Release] with the original error as its source.
    pub fn release(&mut self) -> Result<Version> {
        self.run_release().map_err(|e| {
            ui::display_error(&format!("Release failed: {}", e));
            MexReleaseError::release(e)
        })
    }

    fn run_release(&mut self) -> Result<Version> {
        self.check_working_tree()?;
        self.check_default_branch()?;
        self.check_version_string()?;

        let new_version = self.next_version()?;
        let tag = new_version.to_string();
        info!(version = %tag, bump = %self.bump, "releasing");

        self.write_manifest(&tag)?;
        self.write_changelog(&tag)?;
        self.publish(&tag)?;

        ui::display_released(&tag);
        Ok(new_version)
    }

    fn write_manifest(&mut self, version: &str) -> Result<()> {
        self.manifest.set_version(version)?;
        self.manifest.save()?;
        ui::display_success(&format!("Version set to {} in {}", version, MANIFEST_FILE));
        Ok(())
    }

    fn write_changelog(&self, version: &str) -> Result<()> {
        let path = self.root.join(&self.options.changelog);
        let text = fs::read_to_string(&path)?;

        let date = self
            .release_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let (rolled, found) = changelog::roll_over(&text, version, date);
        if !found {
            ui::display_warning(&format!(
                "No '## [Unreleased]' section in {}; no version heading added",
                self.options.changelog
            ));
        }

        fs::write(&path, rolled)?;
        debug!(path = %path.display(), "changelog written");
        ui::display_success(&format!("Changes are written to {}.", self.options.changelog));
        Ok(())
    }

    fn publish(&self, version: &str) -> Result<()> {
        let message = format!("bump version to {}", version);
        self.repo
            .commit(&message, &[self.options.changelog.as_str(), MANIFEST_FILE])?;
        self.repo.tag(version)?;
        self.repo.push(&self.options.remote)?;
        self.repo.push_tags(&self.options.remote)?;
        Ok(())
    }
}
