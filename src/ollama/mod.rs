//! The generation backend: prompt templates plus the Ollama HTTP call.
//!
//! This is what `llamit-backend` runs. It reads a diff on stdin, wraps it in
//! the template for the requested format and prints the model's reply.

pub mod client;
pub mod retry;
pub mod templates;

use std::io::Write;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};

use crate::error::OllamaError;

pub use client::OllamaClient;
pub use retry::RetryPolicy;
pub use templates::build_prompt;

/// Long flags the backend accepts with a single leading dash.
pub const SINGLE_DASH_FLAGS: [&str; 4] = ["ollama-url", "model", "format", "custom-template"];

/// Rewrite single-dash long flags (`-model x`, `-model=x`) to their
/// double-dash form so both spellings parse.
///
/// The argument following a bare flag is its value and is never rewritten,
/// so `-custom-template -format` keeps `-format` as template text.
pub fn normalize_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut normalized = Vec::new();
    let mut expects_value = false;

    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 || std::mem::take(&mut expects_value) {
            normalized.push(arg);
            continue;
        }

        let (dashes, rest) = match arg.strip_prefix("--") {
            Some(rest) => ("--", rest),
            None => match arg.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => {
                    normalized.push(arg);
                    continue;
                }
            },
        };

        let (name, inline_value) = match rest.split_once('=') {
            Some((name, _)) => (name, true),
            None => (rest, false),
        };
        if !SINGLE_DASH_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        expects_value = !inline_value;
        if dashes == "-" {
            normalized.push(format!("-{arg}"));
        } else {
            normalized.push(arg);
        }
    }

    normalized
}

/// Write the generated message to `out` without a trailing newline and flush.
pub fn write_message<W: Write>(out: &mut W, message: &str) -> Result<(), OllamaError> {
    out.write_all(message.as_bytes())
        .and_then(|_| out.flush())
        .map_err(OllamaError::WriteOutput)
}

/// One backend request as parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    pub ollama_url: String,
    pub model: String,
    pub format: String,
    pub custom_template: String,
}

/// Read the diff from `input`, ask Ollama for a message, and return it.
pub async fn run<R>(
    input: &mut R,
    request: &BackendRequest,
    policy: RetryPolicy,
) -> Result<String, OllamaError>
where
    R: AsyncRead + Unpin,
{
    info!(
        "Starting commit generation. Ollama URL: {}, Model: {}, Format: {}",
        request.ollama_url, request.model, request.format
    );

    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .await
        .map_err(OllamaError::ReadInput)?;

    if bytes.is_empty() {
        warn!("Input from stdin is empty. No diff provided.");
        return Err(OllamaError::EmptyInput);
    }
    info!("Read {} bytes of diff from stdin", bytes.len());

    // Diffs of files in legacy encodings are passed along, not rejected.
    let diff = String::from_utf8_lossy(&bytes);

    let prompt = build_prompt(&request.format, &request.custom_template, &diff);
    let client = OllamaClient::with_policy(&request.ollama_url, policy);

    client.generate(&request.model, &prompt).await
}
