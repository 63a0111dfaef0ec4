//! llamit - drafts commit messages from pending git changes with a local model.
//!
//! # Overview
//!
//! llamit reads the staged diff (falling back to unstaged changes), hands it
//! to a backend executable that prompts an Ollama model, and returns the
//! generated commit message. The pipeline is:
//!
//! 1. [`diff`] - staged-then-working-tree diff cascade
//! 2. [`config`] - settings resolved into a [`Configuration`]
//! 3. [`generator`] - backend subprocess with the diff on stdin
//! 4. [`orchestrator`] - sequencing and outcome classification
//!
//! The backend itself lives in [`ollama`] and ships as `llamit-backend`.

pub mod config;
pub mod diff;
pub mod error;
pub mod generator;
pub mod logging;
pub mod ollama;
pub mod orchestrator;
pub mod platform;

// Re-export commonly used types
pub use config::{CommitFormat, Configuration, Settings};
pub use diff::DiffResult;
pub use error::{BackendError, DiffError, ErrorKind, OllamaError, PlatformError, SettingsError};
pub use orchestrator::{Invocation, Outcome};
pub use platform::BackendLocator;
