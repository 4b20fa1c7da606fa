//! Integration tests for enabling the recorder from configuration

use std::fs::File;
use std::path::PathBuf;

use debug_archive::config::{ENV_DEBUG, ENV_DEBUG_DIR};
use debug_archive::recorder::runtime::{activate, shutdown};
use debug_archive::hook::InstanceInfo;
use debug_archive::{read_archive, DebugConfig, DebugError, DebugHook, EntryKind, Hook};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Serializes tests that touch process environment variables
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn archives_in(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(".tar.gz"))
        .collect();
    found.sort();
    found
}

/// TOML config -> activate -> hooks -> shutdown -> readable archive
#[test]
fn test_toml_config_enables_archive() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("archives");
    let config = DebugConfig::from_toml_str(&format!(
        "[debug]\nenabled = true\noutput_dir = {:?}\n",
        out.to_string_lossy()
    ))
    .unwrap();

    let debug = activate(&config).unwrap();
    assert!(debug.is_enabled());

    debug.set_phase("refresh");
    DebugHook::new(debug.clone())
        .pre_refresh(Some(&InstanceInfo::new("aws_s3_bucket.logs")), None)
        .unwrap();
    shutdown(&debug).unwrap();
    shutdown(&debug).unwrap();

    let archives = archives_in(&out);
    assert_eq!(archives.len(), 1);

    let entries = read_archive(File::open(&archives[0]).unwrap()).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].kind, EntryKind::Directory);
    assert!(entries[0].path.starts_with("debug-"));
    assert!(entries[2].path.ends_with("/0-refresh-hook-PreRefresh"));
    assert_eq!(entries[2].data, b"aws_s3_bucket.logs\n");
}

/// Environment variables drive activation
#[test]
fn test_env_config_enables_archive() {
    let _guard = ENV_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var(ENV_DEBUG, "1");
    std::env::set_var(ENV_DEBUG_DIR, dir.path());
    let config = DebugConfig::from_env();
    std::env::remove_var(ENV_DEBUG);
    std::env::remove_var(ENV_DEBUG_DIR);

    assert!(config.enabled);
    assert_eq!(config.output_dir, dir.path());

    let debug = activate(&config).unwrap();
    debug.write_file("x", b"A").unwrap();
    shutdown(&debug).unwrap();
    assert_eq!(archives_in(dir.path()).len(), 1);
}

/// Without the flag nothing is created
#[test]
fn test_env_without_flag_is_disabled() {
    let _guard = ENV_LOCK.lock();
    std::env::remove_var(ENV_DEBUG);
    assert!(!DebugConfig::from_env().enabled);

    let dir = tempfile::tempdir().unwrap();
    let config = DebugConfig {
        enabled: false,
        output_dir: dir.path().join("unused"),
    };
    let debug = activate(&config).unwrap();
    assert!(!debug.is_enabled());
    debug.write_file("x", b"A").unwrap();
    shutdown(&debug).unwrap();
    assert!(!dir.path().join("unused").exists());
}

/// Initialization failures are returned, never swallowed
#[test]
fn test_activation_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"").unwrap();

    let err = activate(&DebugConfig::enabled_in(&file)).unwrap_err();
    assert!(matches!(err, DebugError::CreateDir { .. }));
    assert!(err.to_string().contains("not-a-dir"));
}
