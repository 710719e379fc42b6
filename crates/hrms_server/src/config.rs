//! Server configuration from environment variables.
//!
//! # Responsibility
//! - Read all runtime knobs once at startup.
//! - Fall back to sensible defaults for local development.

use hrms_core::default_log_level;
use log::{info, warn};
use std::path::PathBuf;
use std::{env, fmt::Display, str::FromStr};

pub struct Config {
    pub port: u16,
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// When set, logs go to rolling files in this directory; otherwise to
    /// stderr.
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("HRMS_PORT", "5000"),
            db_path: PathBuf::from(
                env::var("HRMS_DB").unwrap_or_else(|_| "hrms.sqlite3".to_string()),
            ),
            log_dir: env::var("HRMS_LOG_DIR")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            log_level: env::var("HRMS_LOG_LEVEL")
                .unwrap_or_else(|_| default_log_level().to_string()),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|err| {
            warn!("Invalid {key} value: {err}");
        })
        .expect("Environment misconfigured!")
}
