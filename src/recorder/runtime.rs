//! Turning recording on from configuration and shutting it down.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::DebugConfig;
use crate::error::DebugError;
use crate::recorder::{ArchiveRecorder, DebugInfo};
use crate::util::paths::{archive_path, session_name};

/// Turn a configuration into a recorder handle.
///
/// Disabled configurations yield the no-op handle. Enabled ones create the
/// output directory and a fresh, exclusively created session archive in it;
/// any failure there is returned rather than falling back to disabled.
pub fn activate(config: &DebugConfig) -> Result<DebugInfo, DebugError> {
    if !config.enabled {
        return Ok(DebugInfo::disabled());
    }
    let (debug, path) = open_session_file(&config.output_dir)?;
    tracing::info!(path = %path.display(), "Debug archive enabled");
    Ok(debug)
}

/// Create `<dir>/<session>.tar.gz` and start a session on it.
pub fn open_session_file(dir: &Path) -> Result<(DebugInfo, PathBuf), DebugError> {
    fs::create_dir_all(dir).map_err(|source| DebugError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let name = session_name(&chrono::Local::now());
    let path = archive_path(dir, &name);
    let file = create_exclusive(&path)?;

    let recorder = ArchiveRecorder::new(&name, file)?;
    Ok((DebugInfo::new(recorder), path))
}

fn create_exclusive(path: &Path) -> Result<File, DebugError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| DebugError::CreateArchive {
            path: path.to_path_buf(),
            source,
        })
}

/// Finalize the archive behind `debug`. Later calls are no-ops.
pub fn shutdown(debug: &DebugInfo) -> Result<(), DebugError> {
    debug.close().inspect_err(|err| {
        tracing::warn!(error = %err, "Failed to finalize debug archive");
    })
}

fn installed_cell() -> &'static OnceLock<DebugInfo> {
    static CELL: OnceLock<DebugInfo> = OnceLock::new();
    &CELL
}

/// Make `debug` the process-wide recorder. Only the first install wins;
/// returns whether this call installed it.
pub fn install(debug: DebugInfo) -> bool {
    let installed = installed_cell().set(debug).is_ok();
    if !installed {
        tracing::debug!("Debug recorder already installed");
    }
    installed
}

/// The process-wide recorder, or a disabled one if none was installed.
pub fn current() -> DebugInfo {
    installed_cell().get().cloned().unwrap_or_default()
}

/// Activate from `config` and install the result process-wide.
pub fn install_from_config(config: &DebugConfig) -> Result<DebugInfo, DebugError> {
    let debug = activate(config)?;
    install(debug.clone());
    Ok(debug)
}

/// Finalize the process-wide recorder.
pub fn shutdown_current() -> Result<(), DebugError> {
    shutdown(&current())
}
