//! Store path and log level resolution.

use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "test.db";
pub const DB_PATH_ENV: &str = "STORE_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: LevelFilter,
}

impl StoreConfig {
    /// Precedence: explicit path, then `STORE_DB_PATH`, then `test.db`.
    /// An empty env value counts as unset.
    pub fn resolve<F>(cli_db_path: Option<PathBuf>, verbosity: u8, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = cli_db_path
            .or_else(|| {
                env(DB_PATH_ENV)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Self {
            db_path,
            log_level: level_for_verbosity(verbosity),
        }
    }

    pub fn from_env(cli_db_path: Option<PathBuf>, verbosity: u8) -> Self {
        Self::resolve(cli_db_path, verbosity, |key| std::env::var(key).ok())
    }
}

fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}
