use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    /// Directory holding one file per note. Keep it outside any served document root.
    pub const NOTES_DIR: &str = "NOTES_DIR";
    /// Explicit override for the externally-reachable base URL (e.g. "https://notes.example.com").
    /// Used to build the `url` returned by `/?new&text=...`.
    pub const PUBLIC_URL: &str = "NOTEPAD_PUBLIC_URL";
    /// Set to "false" or "0" to stop treating curl/Wget user agents as raw reads.
    pub const CLI_RAW_SHIM: &str = "CLI_RAW_SHIM";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const NOTES_DIR: &str = "notes";
    pub const CLI_RAW_SHIM: bool = true;
}

/// Returns the absolute path to the notepad-backend directory.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Default notes directory (notepad-backend/notes)
pub fn default_notes_dir() -> PathBuf {
    backend_dir().join(defaults::NOTES_DIR)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub notes_dir: PathBuf,
    pub public_url: Option<String>,
    pub cli_raw_shim: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Invalid {}={:?}, using {}", env_vars::PORT, raw, defaults::PORT);
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        let cli_raw_shim = match env::var(env_vars::CLI_RAW_SHIM) {
            Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
                log::warn!(
                    "Invalid {}={:?}, using {}",
                    env_vars::CLI_RAW_SHIM,
                    raw,
                    defaults::CLI_RAW_SHIM
                );
                defaults::CLI_RAW_SHIM
            }),
            Err(_) => defaults::CLI_RAW_SHIM,
        };

        let notes_dir = env::var(env_vars::NOTES_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_notes_dir());

        Self {
            port,
            bind_address: env::var(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|_| defaults::BIND_ADDRESS.to_string()),
            public_url: env::var(env_vars::PUBLIC_URL)
                .ok()
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            cli_raw_shim,
            ..Self::with_notes_dir(notes_dir)
        }
    }

    /// Config with defaults for everything except the notes directory
    pub fn with_notes_dir(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            notes_dir: notes_dir.into(),
            public_url: None,
            cli_raw_shim: defaults::CLI_RAW_SHIM,
        }
    }
}
