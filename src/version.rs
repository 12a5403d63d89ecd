use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MexReleaseError, Result};

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4})\.(\d{1,4})\.(\d{1,4})$").expect("version pattern is valid")
});

/// A release version: three dotted integers of one to four digits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Creates a new Version with the specified major, minor, and patch components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parses a version string such as `0.3.14`.
    ///
    /// Leading `v` prefixes, pre-release suffixes and extra components are
    /// all rejected.
    ///
    /// # Example
    /// ```
    /// use mex_release::version::Version;
    ///
    /// assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
    /// assert!(Version::parse("1.2.3.4").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || MexReleaseError::InvalidVersionFormat(text.to_string());
        let captures = VERSION_PATTERN.captures(text).ok_or_else(invalid)?;

        // At most four digits per component, so these always fit
        let component = |i: usize| captures[i].parse::<u32>().map_err(|_| invalid());

        Ok(Version::new(component(1)?, component(2)?, component(3)?))
    }

    /// Whether `text` is a well-formed version string
    pub fn is_valid(text: &str) -> bool {
        VERSION_PATTERN.is_match(text)
    }

    /// Increments the selected component and resets the lower ones to zero:
    /// - **Major**: `(major+1).0.0`
    /// - **Minor**: `major.(minor+1).0`
    /// - **Patch**: `major.minor.(patch+1)`
    pub fn bump(&self, kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => Version::new(self.major + 1, 0, 0),
            BumpKind::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpKind::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = MexReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Which version component a release increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl BumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKind {
    type Err = MexReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => Err(MexReleaseError::InvalidBumpKind(other.to_string())),
        }
    }
}
