//! Workspace file discovery.
//!
//! Two enumeration strategies produce candidate `file://` URIs: a glob
//! pattern match rooted at the workspace, and a recursive, symlink-
//! following walk filtered by a regex on the full path. Both run on the
//! shared worker alongside other protocol requests, so they yield back
//! to the scheduler after every visited filesystem entry; a large scan
//! never starves concurrent work.
//!
//! Cancellation is observed only at those checkpoints, never mid
//! filesystem call, and a cancelled request produces an error rather
//! than a truncated result list. Filesystem failures (nonexistent root,
//! unreadable subtree) abort the whole operation on first error; callers
//! never receive a partial set that silently skipped subtrees.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_lsp::lsp_types::Url;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("invalid path filter: {0}")]
    Regex(#[from] regex::Error),
    #[error("failed to read matched entry: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("path {0:?} cannot be converted to a file URI")]
    InvalidUri(PathBuf),
    #[error("discovery was cancelled")]
    Cancelled,
}

/// Enumerates files below a workspace root.
#[derive(Debug, Clone)]
pub struct FileSystemFilesFinder {
    workspace_root: PathBuf,
}

impl FileSystemFilesFinder {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// All files in the workspace matching a glob pattern.
    ///
    /// Entries that are directories are excluded even when their names
    /// match the pattern. Checks the token and yields to the scheduler
    /// after every visited entry.
    pub async fn find_by_pattern(
        &self,
        pattern: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Url>, DiscoveryError> {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!("{}/{}", self.workspace_root.display(), pattern)
        };

        let mut uris = Vec::new();
        for entry in glob::glob(&full_pattern)? {
            if cancel.is_cancelled() {
                return Err(DiscoveryError::Cancelled);
            }

            let path = entry?;
            if !path.is_dir() {
                uris.push(path_to_uri(&path)?);
            }

            tokio::task::yield_now().await;
        }
        Ok(uris)
    }

    /// All files below `root_path` whose full path matches `regex`.
    ///
    /// The walk is depth-first with parents visited before children,
    /// follows symbolic links, and never yields `.` / `..` pseudo
    /// entries. Directories are excluded from the result even when
    /// their paths match. Checks the token and yields to the scheduler
    /// after every visited entry.
    pub async fn find_by_regex(
        &self,
        root_path: &Path,
        regex: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Url>, DiscoveryError> {
        let filter = regex::Regex::new(regex)?;

        let mut uris = Vec::new();
        for entry in walkdir::WalkDir::new(root_path).follow_links(true) {
            if cancel.is_cancelled() {
                return Err(DiscoveryError::Cancelled);
            }

            let entry = entry?;
            if filter.is_match(&entry.path().to_string_lossy()) && !entry.file_type().is_dir() {
                uris.push(path_to_uri(entry.path())?);
            }

            tokio::task::yield_now().await;
        }
        Ok(uris)
    }
}

fn path_to_uri(path: &Path) -> Result<Url, DiscoveryError> {
    Url::from_file_path(path).map_err(|()| DiscoveryError::InvalidUri(path.to_path_buf()))
}
