//! Error types for llamit modules using thiserror.

use std::fmt;

use thiserror::Error;

/// Classification of every failure the pipeline can report.
///
/// Each error enum below maps onto exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The version-control tool could not be run or failed without output.
    SourceUnavailable,
    /// The backend executable failed to launch or exited with an error.
    BackendError,
    /// No backend executable exists for this platform/architecture.
    UnsupportedEnvironment,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SourceUnavailable => "SourceUnavailable",
            ErrorKind::BackendError => "BackendError",
            ErrorKind::UnsupportedEnvironment => "UnsupportedEnvironment",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from diff acquisition.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("{0}")]
    SourceUnavailable(String),
}

impl DiffError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SourceUnavailable
    }

    /// The underlying diagnostic text, verbatim.
    pub fn detail(&self) -> &str {
        match self {
            DiffError::SourceUnavailable(detail) => detail,
        }
    }
}

/// Errors from running the backend executable.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to launch backend {path}: {source}")]
    SpawnFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BackendError
    }
}

/// Errors from backend executable selection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Unsupported platform: {os}-{arch}")]
    Unsupported { os: String, arch: String },

    #[error("Backend executable not found: {0}")]
    NotFound(String),
}

impl PlatformError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UnsupportedEnvironment
    }
}

/// Errors from reading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from the Ollama HTTP backend.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("input from stdin is empty")]
    EmptyInput,

    #[error("error reading from stdin: {0}")]
    ReadInput(#[source] std::io::Error),

    #[error("error making request to Ollama after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("error from Ollama API (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("error decoding Ollama response: {0}")]
    InvalidResponse(String),

    #[error("error writing to stdout: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl OllamaError {
    /// Whether another attempt could succeed.
    ///
    /// Transport failures and server-side statuses are retried; client errors
    /// (4xx) and local input problems are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            OllamaError::Transport { .. } => true,
            OllamaError::Status { status, .. } => !(400..500).contains(status),
            OllamaError::EmptyInput
            | OllamaError::ReadInput(_)
            | OllamaError::InvalidResponse(_)
            | OllamaError::WriteOutput(_) => false,
        }
    }
}
