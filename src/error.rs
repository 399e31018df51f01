//! Error types shared by the walker, the remote builder and the CLI

use std::io;
use std::path::PathBuf;

/// Errors surfaced to callers.
///
/// Access failures in the middle of a walk are not represented here: they
/// degrade the output (skipped subtree, sentinel descriptor) instead of
/// aborting the traversal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access '{}': No such file or directory", path.display())]
    NotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("invalid {kind} filter '{spec}': {reason}")]
    FilterSpec {
        kind: &'static str,
        spec: String,
        reason: String,
    },

    #[error("invalid GitHub repository URL '{0}'")]
    InvalidRepoUrl(String),

    #[error("request to {url} failed: {reason}")]
    Remote { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot write to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn filter_spec(
        kind: &'static str,
        spec: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::FilterSpec {
            kind,
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
