// tests/config_test.rs
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use mex_release::config::{load_config, Config, CONFIG_FILE};
use tempfile::NamedTempFile;

#[test]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[release]
changelog = "HISTORY.md"
remote = "upstream"

[signing]
key_name = "release-bot"
ssh_dir = "/var/lib/bot/.ssh"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let project = tempfile::tempdir().unwrap();
    let config = load_config(Some(temp_file.path()), project.path()).unwrap();

    assert_eq!(config.release.changelog, "HISTORY.md");
    assert_eq!(config.release.remote, "upstream");
    assert_eq!(config.signing.key_name, "release-bot");
    assert_eq!(
        config.signing.ssh_dir,
        Some(PathBuf::from("/var/lib/bot/.ssh"))
    );
    assert_eq!(config.emoji, Config::default().emoji);
}

#[test]
fn test_project_file_is_used_without_explicit_path() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        "[emoji]\nmetadata_url = \"https://example.com/emoji.json\"\n",
    )
    .unwrap();

    let config = load_config(None, project.path()).unwrap();
    assert_eq!(config.emoji.metadata_url, "https://example.com/emoji.json");
    assert_eq!(config.release.changelog, "CHANGELOG.md");
}

#[test]
fn test_explicit_path_wins_over_project_file() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        "[release]\nremote = \"from-project\"\n",
    )
    .unwrap();

    let mut explicit = NamedTempFile::new().unwrap();
    explicit
        .write_all(b"[release]\nremote = \"from-flag\"\n")
        .unwrap();
    explicit.flush().unwrap();

    let config = load_config(Some(explicit.path()), project.path()).unwrap();
    assert_eq!(config.release.remote, "from-flag");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let project = tempfile::tempdir().unwrap();
    let missing = project.path().join("nope.toml");

    let err = load_config(Some(&missing), project.path()).unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}

#[test]
fn test_malformed_project_file_is_an_error() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join(CONFIG_FILE), "[release\nremote = 1").unwrap();

    assert!(load_config(None, project.path()).is_err());
}

#[test]
fn test_wrong_value_type_is_an_error() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join(CONFIG_FILE), "[release]\nremote = 42\n").unwrap();

    let err = load_config(None, project.path()).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
