use std::io;
use thiserror::Error;

/// Errors surfaced by the note store
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Content too large ({size} bytes, limit is {limit})")]
    ContentTooLarge { size: usize, limit: usize },

    #[error("Invalid note name")]
    InvalidName,

    #[error("Invalid note path")]
    PathEscape,

    #[error("Note not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),
}
