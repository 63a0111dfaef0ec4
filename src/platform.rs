//! Backend executable selection for the host platform.

use std::env::consts::{ARCH, OS};
use std::path::{Path, PathBuf};

use crate::error::PlatformError;

/// Supported `(os, arch)` pairs and the backend executable built for each.
///
/// Names follow Rust's `std::env::consts` spelling for the key.
pub const BACKEND_BINARIES: [((&str, &str), &str); 5] = [
    (("windows", "x86_64"), "llamit-windows-amd64.exe"),
    (("macos", "x86_64"), "llamit-darwin-amd64"),
    (("macos", "aarch64"), "llamit-darwin-arm64"),
    (("linux", "x86_64"), "llamit-linux-amd64"),
    (("linux", "aarch64"), "llamit-linux-arm64"),
];

/// Directory under the install root that holds the backend executables.
pub const BIN_DIR: &str = "bin";

/// Look up the backend executable name for `os`/`arch`.
pub fn binary_name(os: &str, arch: &str) -> Result<&'static str, PlatformError> {
    BACKEND_BINARIES
        .iter()
        .find(|((o, a), _)| *o == os && *a == arch)
        .map(|(_, name)| *name)
        .ok_or_else(|| PlatformError::Unsupported {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

/// Path of the backend executable for `os`/`arch` under `install_dir`.
pub fn binary_path_for(install_dir: &Path, os: &str, arch: &str) -> Result<PathBuf, PlatformError> {
    Ok(install_dir.join(BIN_DIR).join(binary_name(os, arch)?))
}

/// Path of the backend executable for the running host under `install_dir`.
pub fn binary_path(install_dir: &Path) -> Result<PathBuf, PlatformError> {
    binary_path_for(install_dir, OS, ARCH)
}

/// How the front end finds the backend executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendLocator {
    /// Use this executable as-is.
    Explicit(PathBuf),
    /// Pick the platform-specific executable under this install directory.
    InstallDir(PathBuf),
}

impl BackendLocator {
    /// Resolve to a concrete executable path for the running host.
    pub fn locate(&self) -> Result<PathBuf, PlatformError> {
        match self {
            BackendLocator::Explicit(path) => Ok(path.clone()),
            BackendLocator::InstallDir(dir) => {
                let path = binary_path(dir)?;
                if path.exists() {
                    Ok(path)
                } else {
                    Err(PlatformError::NotFound(path.display().to_string()))
                }
            }
        }
    }
}
