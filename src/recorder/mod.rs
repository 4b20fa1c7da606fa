//! The debug recorder and the handle passed to every component that can emit
//! debug entries.
//!
//! There are two recorder variants, chosen once at startup:
//! - [`ArchiveRecorder`] writes an ordered, flushed-per-entry archive
//! - [`NoopRecorder`] accepts every call and does nothing
//!
//! Call sites only ever see a [`DebugInfo`], so they never check whether
//! recording is enabled before calling it.

pub mod runtime;
pub mod session;

use std::fmt;
use std::sync::Arc;

use crate::archive::sink::Sink;
use crate::error::DebugError;
use crate::graph::GraphSnapshot;

pub use session::{entry_path, graph_path, ArchiveRecorder};

/// Write surface shared by the active and disabled recorders.
pub trait Recorder: Send + Sync {
    /// Label embedded in the paths of every following entry.
    fn set_phase(&self, phase: &str);

    fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DebugError>;

    /// Record a snapshot as a raw entry plus a DOT entry under `graphs/`.
    /// `None` records nothing.
    fn write_graph(&self, graph: Option<&dyn GraphSnapshot>) -> Result<(), DebugError>;

    /// Finalize the archive. Safe to call more than once.
    fn close(&self) -> Result<(), DebugError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Recorder used when debug archiving is off. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl Recorder for NoopRecorder {
    fn set_phase(&self, _phase: &str) {}

    fn write_file(&self, _name: &str, _data: &[u8]) -> Result<(), DebugError> {
        Ok(())
    }

    fn write_graph(&self, _graph: Option<&dyn GraphSnapshot>) -> Result<(), DebugError> {
        Ok(())
    }

    fn close(&self) -> Result<(), DebugError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Cheaply cloneable handle to the recorder for one run.
#[derive(Clone)]
pub struct DebugInfo {
    inner: Arc<dyn Recorder>,
}

impl DebugInfo {
    pub fn new(recorder: impl Recorder + 'static) -> Self {
        Self {
            inner: Arc::new(recorder),
        }
    }

    pub fn disabled() -> Self {
        Self::new(NoopRecorder)
    }

    /// Start an archive session named `name` on `sink`.
    pub fn open<S: Sink + 'static>(name: &str, sink: S) -> Result<Self, DebugError> {
        Ok(Self::new(ArchiveRecorder::new(name, sink)?))
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn set_phase(&self, phase: &str) {
        self.inner.set_phase(phase)
    }

    pub fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DebugError> {
        self.inner.write_file(name, data)
    }

    pub fn write_graph(&self, graph: Option<&dyn GraphSnapshot>) -> Result<(), DebugError> {
        self.inner.write_graph(graph)
    }

    pub fn close(&self) -> Result<(), DebugError> {
        self.inner.close()
    }
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugInfo")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
