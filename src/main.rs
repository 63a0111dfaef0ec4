//! llamit - CLI entry point.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::process::Command;
use tracing::debug;

use llamit::config::{
    self, KEY_COMMIT_FORMAT, KEY_CUSTOM_FORMAT, KEY_MODEL, KEY_OLLAMA_URL, load_settings,
};
use llamit::orchestrator::{self, Invocation, Outcome};
use llamit::{BackendLocator, Settings, logging};

/// Name of the backend executable when installed alongside `llamit`.
const BACKEND_NAME: &str = "llamit-backend";

/// Draft a commit message from pending changes using a local Ollama model.
#[derive(Parser, Debug)]
#[command(name = "llamit")]
#[command(about = "Draft a commit message from pending changes using a local Ollama model")]
#[command(version)]
struct Cli {
    /// Repository to read changes from (defaults to the enclosing repository)
    #[arg(short = 'C', long)]
    repo: Option<PathBuf>,

    /// Path to the git executable
    #[arg(long)]
    git: Option<PathBuf>,

    /// Backend executable to run (overrides platform lookup)
    #[arg(long)]
    backend: Option<PathBuf>,

    /// Install directory holding bin/llamit-<os>-<arch> backends
    #[arg(long, conflicts_with = "backend")]
    install_dir: Option<PathBuf>,

    /// Ollama generate endpoint
    #[arg(long)]
    ollama_url: Option<String>,

    /// Ollama model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Commit message format (conventional, angular, gitmoji, karma, semantic, google, custom)
    #[arg(short, long)]
    format: Option<String>,

    /// Template text used when the format is 'custom'
    #[arg(long)]
    custom_template: Option<String>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line overrides as the topmost settings layer.
    fn overrides(&self) -> Settings {
        let mut settings = Settings::new();
        let pairs = [
            (KEY_OLLAMA_URL, &self.ollama_url),
            (KEY_MODEL, &self.model),
            (KEY_COMMIT_FORMAT, &self.format),
            (KEY_CUSTOM_FORMAT, &self.custom_template),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                settings.set(key, value.clone());
            }
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(if cli.verbose { "debug" } else { "warn" });

    // Step 1: Locate tools and repository
    let git = cli.git.clone().unwrap_or_else(find_git);
    let repository_root = match &cli.repo {
        Some(path) => path.clone(),
        None => find_repository_root(&git).await?,
    };
    debug!("Repository root: {}", repository_root.display());

    // Step 2: Gather settings
    let mut settings = load_settings(Some(&repository_root));
    settings.merge(cli.overrides());

    if cli.print_config {
        println!("{}", render_config(&settings)?);
        return Ok(ExitCode::SUCCESS);
    }

    let invocation = Invocation {
        tool: git,
        repository_root,
        backend: backend_locator(&cli)?,
        settings,
    };

    // Step 3: Run the pipeline
    let outcome = orchestrator::run(&invocation).await;

    match &outcome {
        Outcome::Generated(message) => {
            println!("{}", message);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::NothingToCommit => {
            eprintln!("{}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Error { kind, .. } => {
            eprintln!("{}", outcome);
            debug!("Failure kind: {}", kind);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prefer the git on PATH; fall back to the bare name.
fn find_git() -> PathBuf {
    which::which("git").unwrap_or_else(|_| PathBuf::from("git"))
}

/// Ask git for the top-level directory; use the current directory if that fails
/// so the diff step reports the real problem.
async fn find_repository_root(git: &Path) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to read current directory")?;

    let output = Command::new(git)
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(&cwd)
        .output()
        .await;

    match output {
        Ok(out) if out.status.success() => {
            let root = String::from_utf8_lossy(&out.stdout).trim().to_string();
            Ok(PathBuf::from(root))
        }
        _ => Ok(cwd),
    }
}

/// Resolved configuration as pretty JSON, for `--print-config`.
fn render_config(settings: &Settings) -> Result<String> {
    serde_json::to_string_pretty(&config::resolve(settings))
        .context("Failed to serialize configuration")
}

/// Decide where the backend executable comes from.
fn backend_locator(cli: &Cli) -> Result<BackendLocator> {
    let exe = env::current_exe().context("Failed to locate the llamit executable")?;
    let exe_dir = exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(choose_backend(cli, &exe_dir, |name| which::which(name).ok()))
}

/// Order: `--backend`, `--install-dir`, a `llamit-backend` in `exe_dir`,
/// `llamit-backend` on PATH, and finally the platform-specific binary under
/// `exe_dir`.
fn choose_backend<F>(cli: &Cli, exe_dir: &Path, on_path: F) -> BackendLocator
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(path) = &cli.backend {
        return BackendLocator::Explicit(path.clone());
    }
    if let Some(dir) = &cli.install_dir {
        return BackendLocator::InstallDir(dir.clone());
    }

    let sibling = exe_dir.join(format!("{}{}", BACKEND_NAME, env::consts::EXE_SUFFIX));
    if sibling.exists() {
        return BackendLocator::Explicit(sibling);
    }

    if let Some(path) = on_path(BACKEND_NAME) {
        return BackendLocator::Explicit(path);
    }

    BackendLocator::InstallDir(exe_dir.to_path_buf())
}
