//! Shared types for the notepad backend and its API clients.

use serde::{Deserialize, Serialize};

/// Message returned after a successful `?text=` save.
pub const SAVED_MESSAGE: &str = "Note saved successfully.";

// =====================================================
// Response Types
// =====================================================

/// Response to `GET /?new&text=...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNoteResponse {
    /// Absolute URL of the freshly created note
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Status acknowledgment for JSON write paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatus {
    pub status: Status,
    pub message: String,
}

impl SaveStatus {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: SAVED_MESSAGE.to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: msg.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
