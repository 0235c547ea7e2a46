use std::path::PathBuf;

use logseq_config::ConfigError;
use logseq_content::{EmitError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("Failed to write {path}: {source}")]
    Emit { path: PathBuf, source: EmitError },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid date format {format:?}: {reason}")]
    DateFormat { format: String, reason: String },

    #[error("Indexing is not enabled")]
    IndexDisabled,

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),

    #[error("Page at {0} no longer exists")]
    Vanished(PathBuf),

    #[error("Page at {0} has been modified since it was opened")]
    Modified(PathBuf),

    #[error("Page at {0} is a directory")]
    NotAFile(PathBuf),

    #[error("Block not found")]
    BlockNotFound,
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Maps an IO error to [`GraphError::Io`] for `path`.
pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> GraphError {
    let path = path.into();
    move |source| GraphError::Io { path, source }
}
