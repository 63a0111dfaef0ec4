//! Backend executable spawning.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::BackendError;

/// Trait for executing the backend with the diff on stdin.
///
/// This abstraction allows mocking the backend subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendExecutor: Send + Sync {
    /// Run `executable` with `args`, feed `input` to stdin, return stdout.
    async fn run(
        &self,
        executable: &Path,
        args: Vec<String>,
        input: &str,
    ) -> Result<String, BackendError>;
}

/// Default executor that spawns the real backend process.
pub struct DefaultExecutor;

#[async_trait]
impl BackendExecutor for DefaultExecutor {
    async fn run(
        &self,
        executable: &Path,
        args: Vec<String>,
        input: &str,
    ) -> Result<String, BackendError> {
        run_backend(executable, &args, input).await
    }
}

/// Spawn the backend, write `input` to its stdin in one write, close stdin,
/// and collect its output.
///
/// A backend that exits successfully without reading all of `input` still
/// succeeds.
///
/// The child is killed if this future is dropped before it exits.
pub async fn run_backend(
    executable: &Path,
    args: &[String],
    input: &str,
) -> Result<String, BackendError> {
    let mut child = Command::new(executable)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BackendError::SpawnFailed {
            path: executable.display().to_string(),
            source,
        })?;

    let mut stdin = child.stdin.take();
    let write = async move {
        match stdin.as_mut() {
            Some(pipe) => pipe.write_all(input.as_bytes()).await,
            None => Ok(()),
        }
        // stdin is dropped here, signalling end of input
    };

    // Stdin is written while output is drained so a chatty child cannot
    // deadlock on a full pipe.
    let (write_result, output) = tokio::join!(write, child.wait_with_output());

    let output = output.map_err(|source| BackendError::SpawnFailed {
        path: executable.display().to_string(),
        source,
    })?;

    // A backend may answer without consuming all of stdin; only its exit
    // status decides the outcome.
    if let Err(e) = &write_result {
        debug!("Backend exited before reading all input: {}", e);
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        warn!("Backend exited with code {}", code);

        let stderr = if stderr.is_empty() {
            format!(
                "Failed to run backend {}: exited with {}",
                executable.display(),
                output.status
            )
        } else {
            stderr
        };
        return Err(BackendError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
