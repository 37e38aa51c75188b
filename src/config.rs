//! Runtime configuration, read from the environment.

use std::path::PathBuf;

const APP_NAME: &str = "directive-tracker";
const DB_FILE: &str = "directives.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file backing the key-value store (from DTRK_DB_PATH).
    pub db_path: Option<PathBuf>,
    /// HTTP port for `serve` (from DTRK_PORT).
    pub port: u16,
    /// Bind address for `serve` (from DTRK_BIND).
    pub bind: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("DTRK_DB_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_db_path);

        let port = std::env::var("DTRK_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let bind = std::env::var("DTRK_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());

        Self {
            db_path,
            port,
            bind,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `<platform data dir>/directive-tracker/directives.db`.
pub fn default_db_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Some(dirs.data_dir().join(DB_FILE))
}
