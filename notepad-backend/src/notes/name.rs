//! Note name grammar and random name generation

use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use std::path::Path;

use super::NoteError;

/// Longest accepted note name
pub const MAX_NAME_LEN: usize = 64;

/// Bytes of randomness in a generated name (2 bytes -> 4 hex chars)
pub const RANDOM_NAME_BYTES: usize = 2;

/// Generate a random note name: hex of [`RANDOM_NAME_BYTES`] bytes from the OS RNG
pub fn generate_random_name() -> String {
    let mut bytes = [0u8; RANDOM_NAME_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// True iff `name` matches `^[A-Za-z0-9_-]{1,64}$`
pub fn validate(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Strip any directory component, keeping only the final path segment.
///
/// Returns an empty string when there is no usable segment (`..`, `/`, `.`).
pub fn sanitize(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
}

/// Strip the ASCII whitespace and NUL bytes that surround a submitted name.
///
/// Other characters, including Unicode spaces, are left for [`validate`] to reject.
pub fn trim_name(raw: &str) -> &str {
    raw.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

/// A note name that has passed [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteName(String);

impl NoteName {
    /// Trim and validate an incoming name
    pub fn parse(raw: &str) -> Result<Self, NoteError> {
        let trimmed = trim_name(raw);
        if validate(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(NoteError::InvalidName)
        }
    }

    pub fn random() -> Self {
        Self(generate_random_name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
