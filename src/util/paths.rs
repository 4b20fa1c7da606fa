//! Path utilities for debug archive directories

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// Get the base data directory (~/.debug-archive)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".debug-archive"))
        .unwrap_or_else(|| PathBuf::from(".debug-archive"))
}

/// Get the default archive directory (~/.debug-archive/debug)
pub fn debug_dir() -> PathBuf {
    data_dir().join("debug")
}

/// Get the config file path (~/.debug-archive/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Session name for an archive started at `at`, e.g.
/// `debug-2024-05-01-13-04-05.123456789`.
pub fn session_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("debug-{}", at.format("%Y-%m-%d-%H-%M-%S%.9f"))
}

/// Archive file for a session inside `dir`.
pub fn archive_path(dir: &Path, session: &str) -> PathBuf {
    dir.join(format!("{session}.tar.gz"))
}
