use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mex_release::config::{self, Config};
use mex_release::emoji::{self, HttpEmojiSource};
use mex_release::git::CliRepository;
use mex_release::project::{self, Manifest};
use mex_release::runner::SystemRunner;
use mex_release::signing::{self, KeyPaths, SigningCredentials};
use mex_release::{ui, MexReleaseError, Releaser};

#[derive(Parser)]
#[command(
    name = "mex-release",
    version,
    about = "Bump the project version, roll over the changelog and publish the release"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bump the version, roll over the changelog, commit, tag and push
    Release {
        /// Part of the project version to increment: major, minor or patch
        #[arg(default_value = "patch")]
        bump: String,
    },

    /// Print the emoji shortcode for the current project version
    GetVersionEmoji,

    /// Install signing keys and configure git to sign commits
    SetupCommitSigning {
        #[arg(long, env = "MEX_BOT_EMAIL", help = "Email of the committing bot")]
        bot_email: String,

        #[arg(long, env = "MEX_BOT_USER", help = "Name of the committing bot")]
        bot_user: String,

        #[arg(
            long,
            env = "SIGNING_KEY",
            hide_env_values = true,
            help = "Base64 encoded private key"
        )]
        signing_key: String,

        #[arg(
            long,
            env = "SIGNING_PUB",
            hide_env_values = true,
            help = "Base64 encoded public key"
        )]
        signing_pub: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Release failures already printed their notice
            let already_reported = matches!(
                e.downcast_ref::<MexReleaseError>(),
                Some(MexReleaseError::Release(_))
            );
            if !already_reported {
                ui::display_error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot read current directory")?;
    let root = project::find_project_root(&cwd)
        .context("Cannot find project root (no pyproject.toml)")?;
    let config = config::load_config(args.config.as_deref(), &root)?;

    match args.command {
        Commands::Release { bump } => release(&root, &bump, &config),
        Commands::GetVersionEmoji => print_version_emoji(&root, &config),
        Commands::SetupCommitSigning {
            bot_email,
            bot_user,
            signing_key,
            signing_pub,
        } => {
            let credentials = SigningCredentials {
                bot_email,
                bot_user,
                signing_key,
                signing_pub,
            };
            setup_signing(&root, &credentials, &config)
        }
    }
}

fn release(root: &Path, bump: &str, config: &Config) -> Result<()> {
    let repo = CliRepository::new(SystemRunner::in_dir(root));
    let mut releaser =
        Releaser::new(root, bump, repo)?.with_options(config.release.clone());
    releaser.release()?;
    Ok(())
}

fn print_version_emoji(root: &Path, config: &Config) -> Result<()> {
    let manifest = Manifest::load(root)?;
    let source = HttpEmojiSource::new(&config.emoji.metadata_url);
    let shortcode = emoji::version_emoji(&source, &manifest.name()?, &manifest.version()?)
        .context("Cannot pick a version emoji")?;
    println!("{}", shortcode);
    Ok(())
}

fn setup_signing(root: &Path, credentials: &SigningCredentials, config: &Config) -> Result<()> {
    let ssh_dir = config.signing.resolve_ssh_dir()?;
    let paths = KeyPaths::new(ssh_dir, &config.signing.key_name);
    let runner = SystemRunner::in_dir(root);
    let repo = CliRepository::new(SystemRunner::in_dir(root));
    signing::setup_commit_signing(credentials, &paths, &repo, &runner)?;
    Ok(())
}
