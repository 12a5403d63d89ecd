//! Release emoji: a stable pick from the emoji shortcode list, keyed by
//! project name and version.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{MexReleaseError, Result};

/// One group of the emoji ordering file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmojiGroup {
    #[serde(default)]
    pub emoji: Vec<EmojiEntry>,
}

/// One emoji of a group; only its shortcodes matter here
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmojiEntry {
    #[serde(default)]
    pub shortcodes: Vec<String>,
}

/// Where emoji metadata comes from.
pub trait EmojiSource {
    fn fetch_groups(&self) -> Result<Vec<EmojiGroup>>;
}

/// Downloads the emoji ordering JSON over HTTPS.
pub struct HttpEmojiSource {
    url: String,
}

impl HttpEmojiSource {
    pub fn new(url: impl Into<String>) -> Self {
        HttpEmojiSource { url: url.into() }
    }
}

impl EmojiSource for HttpEmojiSource {
    fn fetch_groups(&self) -> Result<Vec<EmojiGroup>> {
        debug!(url = %self.url, "fetching emoji metadata");
        let groups = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .json::<Vec<EmojiGroup>>()?;
        Ok(groups)
    }
}

/// A fixed list of groups, for tests and offline use.
pub struct StaticEmojiSource(pub Vec<EmojiGroup>);

impl EmojiSource for StaticEmojiSource {
    fn fetch_groups(&self) -> Result<Vec<EmojiGroup>> {
        Ok(self.0.clone())
    }
}

/// All shortcodes of all groups, sorted.
pub fn collect_shortcodes(groups: &[EmojiGroup]) -> Vec<String> {
    let mut shortcodes: Vec<String> = groups
        .iter()
        .flat_map(|group| &group.emoji)
        .flat_map(|emoji| emoji.shortcodes.iter().cloned())
        .collect();
    shortcodes.sort();
    shortcodes
}

/// SHA-256 of `"<name>@<version>"`
pub fn version_digest(name: &str, version: &str) -> [u8; 32] {
    let digest = Sha256::digest(format!("{}@{}", name, version).as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// The digest read as one big-endian integer, reduced modulo `modulus`.
fn digest_mod(digest: &[u8], modulus: u64) -> u64 {
    let modulus = u128::from(modulus);
    let remainder = digest
        .iter()
        .fold(0u128, |acc, &byte| (acc * 256 + u128::from(byte)) % modulus);
    remainder as u64
}

/// Pick the shortcode for `name@version` from a sorted shortcode list.
pub fn pick_emoji<'a>(name: &str, version: &str, shortcodes: &'a [String]) -> Result<&'a str> {
    if shortcodes.is_empty() {
        return Err(MexReleaseError::emoji("Emoji metadata contains no shortcodes"));
    }
    let digest = version_digest(name, version);
    let index = digest_mod(&digest, shortcodes.len() as u64) as usize;
    Ok(shortcodes[index].as_str())
}

/// Fetch the metadata from `source` and pick the emoji for `name@version`.
pub fn version_emoji(source: &dyn EmojiSource, name: &str, version: &str) -> Result<String> {
    let shortcodes = collect_shortcodes(&source.fetch_groups()?);
    debug!(count = shortcodes.len(), "collected shortcodes");
    pick_emoji(name, version, &shortcodes).map(str::to_string)
}
