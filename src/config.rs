use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MexReleaseError, Result};

/// Name of the project-local configuration file
pub const CONFIG_FILE: &str = "mexrelease.toml";

/// Default location of the emoji ordering published by Google Fonts
pub const DEFAULT_EMOJI_METADATA_URL: &str =
    "https://raw.githubusercontent.com/googlefonts/emoji-metadata/main/emoji_15_0_ordering.json";

/// Represents the complete configuration for mex-release.
///
/// Every section is optional; a project without a config file gets the defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub emoji: EmojiConfig,

    #[serde(default)]
    pub signing: SigningConfig,
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_metadata_url() -> String {
    DEFAULT_EMOJI_METADATA_URL.to_string()
}

fn default_key_name() -> String {
    "mex".to_string()
}

/// Settings for the `release` command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Changelog file name, relative to the project root
    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Remote whose default branch releases must be cut from
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog: default_changelog(),
            remote: default_remote(),
        }
    }
}

/// Settings for the `get-version-emoji` command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmojiConfig {
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        EmojiConfig {
            metadata_url: default_metadata_url(),
        }
    }
}

/// Settings for the `setup-commit-signing` command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SigningConfig {
    /// Key files are written as `<ssh_dir>/<key_name>` and `<ssh_dir>/<key_name>.pub`
    #[serde(default = "default_key_name")]
    pub key_name: String,

    /// Defaults to `~/.ssh`
    #[serde(default)]
    pub ssh_dir: Option<PathBuf>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        SigningConfig {
            key_name: default_key_name(),
            ssh_dir: None,
        }
    }
}

impl SigningConfig {
    /// The configured ssh directory, or `~/.ssh`
    pub fn resolve_ssh_dir(&self) -> Result<PathBuf> {
        match &self.ssh_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".ssh"))
                .ok_or_else(|| MexReleaseError::config("Cannot determine home directory")),
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| MexReleaseError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `mexrelease.toml` in the project root
/// 3. `.mexrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or the custom path is missing
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = project_root.join(CONFIG_FILE);
            if local.is_file() {
                Some(local)
            } else {
                dirs::config_dir()
                    .map(|dir| dir.join(format!(".{}", CONFIG_FILE)))
                    .filter(|path| path.is_file())
            }
        }
    };

    let Some(path) = path else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), "loading configuration");
    let text = fs::read_to_string(&path).map_err(|e| {
        MexReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.release.changelog, "CHANGELOG.md");
        assert_eq!(config.release.remote, "origin");
        assert_eq!(config.emoji.metadata_url, DEFAULT_EMOJI_METADATA_URL);
        assert_eq!(config.signing.key_name, "mex");
        assert_eq!(config.signing.ssh_dir, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[release]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.release.remote, "upstream");
        assert_eq!(config.release.changelog, "CHANGELOG.md");
        assert_eq!(config.signing, SigningConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_config("[release\n").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_explicit_ssh_dir() {
        let config = parse_config("[signing]\nssh_dir = \"/tmp/keys\"\n").unwrap();
        assert_eq!(
            config.signing.resolve_ssh_dir().unwrap(),
            PathBuf::from("/tmp/keys")
        );
    }
}
