//! Diff subprocess spawning.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::DiffError;

use super::cascade::DiffStep;

/// Trait for running one diff step against a repository.
///
/// This abstraction allows mocking the version-control subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiffRunner: Send + Sync {
    /// Run `<tool> <step args>` in `repository_root` and return its stdout.
    async fn run(
        &self,
        tool: &Path,
        repository_root: &Path,
        step: DiffStep,
    ) -> Result<String, DiffError>;
}

/// Default runner that spawns the real tool.
pub struct DefaultRunner;

#[async_trait]
impl DiffRunner for DefaultRunner {
    async fn run(
        &self,
        tool: &Path,
        repository_root: &Path,
        step: DiffStep,
    ) -> Result<String, DiffError> {
        let output = Command::new(tool)
            .args(step.args())
            .current_dir(repository_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                DiffError::SourceUnavailable(format!(
                    "Failed to run {} {}: {}",
                    tool.display(),
                    step.args().join(" "),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if output.status.success() {
            return Ok(stdout);
        }

        // Diff tools may exit non-zero while still printing a usable diff.
        if !stdout.is_empty() {
            debug!(
                "{} exited with {} but produced output; using it",
                step, output.status
            );
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            return Err(DiffError::SourceUnavailable(stderr));
        }

        Err(DiffError::SourceUnavailable(format!(
            "{} {} failed with {}",
            tool.display(),
            step.args().join(" "),
            output.status
        )))
    }
}
