//! Notes system — flat directory of plain-text notes, one file per name.
//!
//! Names are validated into [`NoteName`] before they reach the store, paths
//! are re-checked against the storage root, and writes to a single note are
//! serialized by a per-name lock.

pub mod error;
pub mod file_ops;
pub mod name;
pub mod path;
pub mod store;

pub use error::NoteError;
pub use name::NoteName;
pub use store::{NoteStore, SaveOutcome, MAX_NOTE_BYTES};
