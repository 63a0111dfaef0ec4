//! Pipeline sequencing: settings + diff → backend → user-facing outcome.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{self, Settings};
use crate::diff::{self, CASCADE, DefaultRunner, DiffRunner};
use crate::error::ErrorKind;
use crate::generator::{self, BackendExecutor, DefaultExecutor};
use crate::platform::BackendLocator;

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Version-control tool (usually `git`).
    pub tool: PathBuf,
    pub repository_root: PathBuf,
    pub backend: BackendLocator,
    pub settings: Settings,
}

/// Final state of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated(String),
    /// No staged or unstaged changes. Informational, not an error.
    NothingToCommit,
    Error { kind: ErrorKind, detail: String },
}

impl Outcome {
    fn error(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Outcome::Error {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Generated(message) => f.write_str(message),
            Outcome::NothingToCommit => f.write_str("No changes to commit."),
            Outcome::Error { detail, .. } => {
                write!(f, "Error generating commit message: {detail}")
            }
        }
    }
}

/// Run the full pipeline with the real subprocesses.
pub async fn run(invocation: &Invocation) -> Outcome {
    run_with(invocation, &DefaultRunner, &DefaultExecutor).await
}

/// Pipeline implementation that accepts any diff runner and backend executor.
///
/// Never fails: every error is classified into [`Outcome::Error`].
pub async fn run_with<R, E>(invocation: &Invocation, runner: &R, executor: &E) -> Outcome
where
    R: DiffRunner + ?Sized,
    E: BackendExecutor + ?Sized,
{
    info!("Generating commit message for {}", invocation.repository_root.display());

    let (config, diff) = tokio::join!(
        async { config::resolve(&invocation.settings) },
        diff::get_diff_with_runner(
            &invocation.tool,
            &invocation.repository_root,
            runner,
            &CASCADE,
        ),
    );

    let diff = match diff {
        Ok(diff) => diff,
        Err(e) => {
            warn!("Diff acquisition failed: {}", e);
            return Outcome::error(e.kind(), e.detail());
        }
    };

    if diff.is_empty {
        info!("Nothing to commit");
        return Outcome::NothingToCommit;
    }

    let executable = match invocation.backend.locate() {
        Ok(path) => path,
        Err(e) => {
            warn!("No backend executable: {}", e);
            return Outcome::error(e.kind(), e.to_string());
        }
    };
    debug!("Resolved configuration: {:?}", config);

    match generator::generate_with_executor(&executable, &config, &diff.content, executor).await {
        Ok(message) => {
            info!("Generated commit message ({} chars)", message.len());
            Outcome::Generated(message)
        }
        Err(e) => {
            warn!("Backend failed: {}", e);
            Outcome::error(e.kind(), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffStep;
    use crate::diff::runner::MockDiffRunner;
    use crate::error::{BackendError, DiffError};
    use crate::generator::subprocess::MockBackendExecutor;
    use mockall::predicate::{always, eq};

    fn invocation() -> Invocation {
        Invocation {
            tool: PathBuf::from("git"),
            repository_root: PathBuf::from("/repo"),
            backend: BackendLocator::Explicit(PathBuf::from("/opt/llamit-backend")),
            settings: Settings::new(),
        }
    }

    #[tokio::test]
    async fn test_staged_diff_generates_message() {
        let mut runner = MockDiffRunner::new();
        runner
            .expect_run()
            .with(always(), always(), eq(DiffStep::Staged))
            .times(1)
            .returning(|_, _, _| Ok("diff --git a/x b/x\n+hello".to_string()));

        let mut executor = MockBackendExecutor::new();
        executor
            .expect_run()
            .withf(|_, _, input| input == "diff --git a/x b/x\n+hello")
            .times(1)
            .returning(|_, _, _| Ok("feat: say hello\n".to_string()));

        let outcome = run_with(&invocation(), &runner, &executor).await;
        assert_eq!(outcome, Outcome::Generated("feat: say hello".to_string()));
    }

    #[tokio::test]
    async fn test_empty_diffs_never_invoke_backend() {
        let mut runner = MockDiffRunner::new();
        runner.expect_run().times(2).returning(|_, _, _| Ok(String::new()));

        let mut executor = MockBackendExecutor::new();
        executor.expect_run().times(0);

        let outcome = run_with(&invocation(), &runner, &executor).await;
        assert_eq!(outcome, Outcome::NothingToCommit);
        assert!(!outcome.is_error());
    }

    #[tokio::test]
    async fn test_diff_failure_is_source_unavailable() {
        let mut runner = MockDiffRunner::new();
        runner.expect_run().times(1).returning(|_, _, _| {
            Err(DiffError::SourceUnavailable(
                "fatal: not a git repository".to_string(),
            ))
        });

        let mut executor = MockBackendExecutor::new();
        executor.expect_run().times(0);

        let outcome = run_with(&invocation(), &runner, &executor).await;
        assert_eq!(
            outcome,
            Outcome::Error {
                kind: ErrorKind::SourceUnavailable,
                detail: "fatal: not a git repository".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_backend_failure_is_backend_error() {
        let mut runner = MockDiffRunner::new();
        runner
            .expect_run()
            .returning(|_, _, _| Ok("diff --git a/x b/x\n+hello".to_string()));

        let mut executor = MockBackendExecutor::new();
        executor.expect_run().times(1).returning(|_, _, _| {
            Err(BackendError::NonZeroExit {
                code: 1,
                stderr: "model not found".to_string(),
            })
        });

        let outcome = run_with(&invocation(), &runner, &executor).await;
        assert_eq!(
            outcome,
            Outcome::Error {
                kind: ErrorKind::BackendError,
                detail: "model not found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_backend_is_unsupported_environment() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = invocation();
        inv.backend = BackendLocator::InstallDir(dir.path().to_path_buf());

        let mut runner = MockDiffRunner::new();
        runner
            .expect_run()
            .returning(|_, _, _| Ok("diff --git a/x b/x\n+hello".to_string()));

        let mut executor = MockBackendExecutor::new();
        executor.expect_run().times(0);

        let outcome = run_with(&inv, &runner, &executor).await;
        assert!(matches!(
            outcome,
            Outcome::Error {
                kind: ErrorKind::UnsupportedEnvironment,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_settings_flow_into_backend_args() {
        let mut inv = invocation();
        inv.settings = Settings::from_pairs([
            (config::KEY_MODEL, "llama2:13b"),
            (config::KEY_COMMIT_FORMAT, "custom"),
            (config::KEY_CUSTOM_FORMAT, "One line only"),
        ]);

        let mut runner = MockDiffRunner::new();
        runner.expect_run().returning(|_, _, _| Ok("+x".to_string()));

        let mut executor = MockBackendExecutor::new();
        executor
            .expect_run()
            .withf(|_, args, _| {
                args.windows(2).any(|w| w[0] == "-model" && w[1] == "llama2:13b")
                    && args.windows(2).any(|w| w[0] == "-custom-template" && w[1] == "One line only")
            })
            .times(1)
            .returning(|_, _, _| Ok("chore: x".to_string()));

        let outcome = run_with(&inv, &runner, &executor).await;
        assert_eq!(outcome, Outcome::Generated("chore: x".to_string()));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::NothingToCommit.to_string(), "No changes to commit.");
        let err = Outcome::Error {
            kind: ErrorKind::BackendError,
            detail: "model not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error generating commit message: model not found"
        );
    }
}
