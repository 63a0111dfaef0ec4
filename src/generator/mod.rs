//! Commit message generation through the backend executable.

pub mod subprocess;

use std::path::Path;

use tracing::{debug, info};

use crate::config::{CommitFormat, Configuration};
use crate::error::BackendError;

pub use subprocess::{BackendExecutor, DefaultExecutor};

/// Flag carrying the Ollama endpoint.
pub const FLAG_OLLAMA_URL: &str = "-ollama-url";
/// Flag carrying the model identifier.
pub const FLAG_MODEL: &str = "-model";
/// Flag carrying the format name.
pub const FLAG_FORMAT: &str = "-format";
/// Flag carrying the custom template text.
pub const FLAG_CUSTOM_TEMPLATE: &str = "-custom-template";

/// Build the backend argument list for `config`.
///
/// `-custom-template` is only passed when the format is `custom` and the
/// template is non-empty.
pub fn build_args(config: &Configuration) -> Vec<String> {
    let mut args = vec![
        FLAG_OLLAMA_URL.to_string(),
        config.backend_url.clone(),
        FLAG_MODEL.to_string(),
        config.model.clone(),
        FLAG_FORMAT.to_string(),
        config.commit_format.to_string(),
    ];

    if let Some(template) = config.effective_custom_template() {
        args.push(FLAG_CUSTOM_TEMPLATE.to_string());
        args.push(template.to_string());
    }

    args
}

/// Generate a commit message for `diff` using the backend at `executable`.
///
/// Single attempt, no timeout. Dropping the returned future kills the
/// backend process.
pub async fn generate(
    executable: &Path,
    config: &Configuration,
    diff: &str,
) -> Result<String, BackendError> {
    generate_with_executor(executable, config, diff, &DefaultExecutor).await
}

/// Internal implementation that accepts any executor (for testing).
pub async fn generate_with_executor<E: BackendExecutor + ?Sized>(
    executable: &Path,
    config: &Configuration,
    diff: &str,
    executor: &E,
) -> Result<String, BackendError> {
    let args = build_args(config);

    info!(
        "Generating commit message with model {} ({} format)",
        config.model, config.commit_format
    );
    debug!("Backend: {} ({} diff bytes)", executable.display(), diff.len());

    if config.commit_format == CommitFormat::Custom && config.custom_template.is_empty() {
        debug!("Custom format selected without a template; backend default applies");
    }

    let output = executor.run(executable, args, diff).await?;
    Ok(output.trim().to_string())
}
