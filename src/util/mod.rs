//! Utility modules

pub mod paths;

pub use paths::{archive_path, config_path, data_dir, debug_dir, session_name};
