//! Ordered fallback over diff sources: staged changes first, then the
//! working tree.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::DiffError;

use super::runner::{DefaultRunner, DiffRunner};

/// One candidate source of pending changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStep {
    /// `diff --cached`: changes already in the index.
    Staged,
    /// `diff`: unstaged working-tree changes.
    Working,
}

impl DiffStep {
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            DiffStep::Staged => &["diff", "--cached"],
            DiffStep::Working => &["diff"],
        }
    }
}

impl fmt::Display for DiffStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffStep::Staged => write!(f, "staged diff"),
            DiffStep::Working => write!(f, "working-tree diff"),
        }
    }
}

/// Steps tried in order until one yields a non-empty diff.
pub const CASCADE: [DiffStep; 2] = [DiffStep::Staged, DiffStep::Working];

/// Diff text for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub content: String,
    /// True iff `content` is blank after trimming.
    pub is_empty: bool,
}

impl DiffResult {
    pub fn new(content: String) -> Self {
        let is_empty = content.trim().is_empty();
        Self { content, is_empty }
    }

    pub fn empty() -> Self {
        Self {
            content: String::new(),
            is_empty: true,
        }
    }
}

/// Get the most relevant pending diff for the repository at `repository_root`.
///
/// Tries staged changes first and falls back to working-tree changes, so a
/// user who forgot to stage still gets a diff. Both empty is a normal result
/// (`DiffResult::empty()`), not an error.
pub async fn get_diff(tool: &Path, repository_root: &Path) -> Result<DiffResult, DiffError> {
    get_diff_with_runner(tool, repository_root, &DefaultRunner, &CASCADE).await
}

/// Cascade implementation that accepts any runner and step order.
pub async fn get_diff_with_runner<R: DiffRunner + ?Sized>(
    tool: &Path,
    repository_root: &Path,
    runner: &R,
    steps: &[DiffStep],
) -> Result<DiffResult, DiffError> {
    for &step in steps {
        let content = runner.run(tool, repository_root, step).await?;
        let result = DiffResult::new(content);

        if !result.is_empty {
            debug!("Using {} ({} bytes)", step, result.content.len());
            return Ok(result);
        }

        debug!("{} is empty", step);
    }

    Ok(DiffResult::empty())
}
