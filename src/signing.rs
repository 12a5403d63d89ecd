//! Commit signing setup for release bots.
//!
//! Installs an SSH key pair and points the repository's git config at it so
//! release commits are signed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{MexReleaseError, Result};
use crate::git::Repository;
use crate::runner::CommandRunner;
use crate::ui;

/// Identity and key material of the signing bot.
///
/// Both keys are base64 encoded, as they usually arrive through CI secrets.
#[derive(Clone)]
pub struct SigningCredentials {
    pub bot_email: String,
    pub bot_user: String,
    pub signing_key: String,
    pub signing_pub: String,
}

// Keep key material out of debug output
impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("bot_email", &self.bot_email)
            .field("bot_user", &self.bot_user)
            .field("signing_key", &"<redacted>")
            .field("signing_pub", &"<redacted>")
            .finish()
    }
}

/// Where the key pair is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub ssh_dir: PathBuf,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyPaths {
    /// `<ssh_dir>/<key_name>` and `<ssh_dir>/<key_name>.pub`
    pub fn new(ssh_dir: impl Into<PathBuf>, key_name: &str) -> Self {
        let ssh_dir = ssh_dir.into();
        KeyPaths {
            private_key: ssh_dir.join(key_name),
            public_key: ssh_dir.join(format!("{}.pub", key_name)),
            ssh_dir,
        }
    }
}

/// Install the key pair, register it with the ssh agent and configure git
/// to sign commits with it.
///
/// Key material is decoded before anything touches the disk, so bad input
/// leaves no partial state behind.
pub fn setup_commit_signing<G, R>(
    credentials: &SigningCredentials,
    paths: &KeyPaths,
    repo: &G,
    runner: &R,
) -> Result<()>
where
    G: Repository + ?Sized,
    R: CommandRunner + ?Sized,
{
    let private_key = STANDARD.decode(credentials.signing_key.trim())?;
    let public_key = STANDARD.decode(credentials.signing_pub.trim())?;

    create_ssh_dir(&paths.ssh_dir)?;
    write_key(&paths.private_key, &private_key)?;
    write_key(&paths.public_key, &public_key)?;
    ui::display_success(&format!("Signing keys written to {}", paths.ssh_dir.display()));

    let private_key_path = path_str(&paths.private_key)?;
    let public_key_path = path_str(&paths.public_key)?;

    runner.run("ssh-add", &[private_key_path])?;
    repo.set_local_config("user.email", &credentials.bot_email)?;
    repo.set_local_config("user.name", &credentials.bot_user)?;
    repo.set_local_config("gpg.format", "ssh")?;
    repo.set_local_config("user.signingkey", public_key_path)?;
    repo.set_local_config("commit.gpgsign", "true")?;

    ui::display_success("Commit signing configured");
    Ok(())
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        MexReleaseError::signing(format!("Key path is not valid UTF-8: {}", path.display()))
    })
}

#[cfg(unix)]
fn create_ssh_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    debug!(dir = %dir.display(), "created ssh directory");
    Ok(())
}

#[cfg(not(unix))]
fn create_ssh_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

fn write_key(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = open_key_file(path)?;
    file.write_all(contents)?;
    // A file that already existed keeps its old mode through open()
    restrict_permissions(path)?;
    debug!(path = %path.display(), "wrote key file");
    Ok(())
}

#[cfg(unix)]
fn open_key_file(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_key_file(path: &Path) -> Result<fs::File> {
    Ok(fs::File::create(path)?)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_paths() {
        let paths = KeyPaths::new("/home/bot/.ssh", "mex");
        assert_eq!(paths.private_key, PathBuf::from("/home/bot/.ssh/mex"));
        assert_eq!(paths.public_key, PathBuf::from("/home/bot/.ssh/mex.pub"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let credentials = SigningCredentials {
            bot_email: "bot@test.com".to_string(),
            bot_user: "test-bot".to_string(),
            signing_key: "c2VjcmV0".to_string(),
            signing_pub: "cHVibGlj".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("bot@test.com"));
        assert!(!debug.contains("c2VjcmV0"));
        assert!(!debug.contains("cHVibGlj"));
    }

    #[cfg(unix)]
    #[test]
    fn test_new_key_file_is_created_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mex");

        // Checked before any chmod: the mode comes from open() itself
        let file = open_key_file(&path).unwrap();
        let mode = file.metadata().unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
