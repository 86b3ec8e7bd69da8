//! Error kinds surfaced by a rename run.
//!
//! Configuration and conflict errors are raised while planning, before
//! anything on disk is touched. I/O errors carry the offending path so an
//! operator can fix permissions or missing files and rerun.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = RenameError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RenameError {
    /// Missing or invalid path prefix, redirects file, or config key.
    #[error("{message}")]
    Config { message: String },

    /// Two renames collide, or a redirect URL matches more than one rename.
    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("I/O error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{}`", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rewrite pattern")]
    Pattern(#[from] regex::Error),
}

impl RenameError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attaches a path to `std::io::Result` errors.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| RenameError::io(path, source))
    }
}
