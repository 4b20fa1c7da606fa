//! One recording session: the archive plus its step and phase, behind a lock.

use parking_lot::Mutex;

use crate::archive::sink::Sink;
use crate::archive::writer::{ArchiveWriter, GRAPHS_DIR};
use crate::error::DebugError;
use crate::graph::GraphSnapshot;
use crate::recorder::Recorder;

/// Path of a plain entry: `<session>/<step>-<phase>-<name>`.
pub fn entry_path(session: &str, step: u64, phase: &str, name: &str) -> String {
    format!("{session}/{step}-{phase}-{name}")
}

/// Path of a graph rendering: `<session>/graphs/<step>-<phase>-<graph>.dot`.
pub fn graph_path(session: &str, step: u64, phase: &str, graph: &str) -> String {
    format!("{session}/{GRAPHS_DIR}/{step}-{phase}-{graph}.dot")
}

/// The active recorder: one session bound to one archive for its lifetime.
///
/// A single lock guards phase, step, and the writer, and is held across
/// "assign step, append, flush", so step order equals physical archive order
/// no matter how many threads write concurrently.
pub struct ArchiveRecorder<S: Sink> {
    session: Mutex<Session<S>>,
}

struct Session<S: Sink> {
    name: String,
    phase: String,
    step: u64,
    closed: bool,
    writer: ArchiveWriter<S>,
}

impl<S: Sink> ArchiveRecorder<S> {
    /// Start a session named `name` writing to `sink`.
    pub fn new(name: &str, sink: S) -> Result<Self, DebugError> {
        let writer = ArchiveWriter::open(sink, name)?;
        Ok(Self {
            session: Mutex::new(Session {
                name: name.to_string(),
                phase: String::new(),
                step: 0,
                closed: false,
                writer,
            }),
        })
    }

    pub fn name(&self) -> String {
        self.session.lock().name.clone()
    }

    pub fn phase(&self) -> String {
        self.session.lock().phase.clone()
    }

    /// Step the next entry will be assigned.
    pub fn step(&self) -> u64 {
        self.session.lock().step
    }

    pub fn is_closed(&self) -> bool {
        self.session.lock().closed
    }
}

impl<S: Sink> Session<S> {
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), DebugError> {
        if self.closed {
            return Err(DebugError::Closed);
        }

        let path = entry_path(&self.name, self.step, &self.phase, name);
        // A step is consumed even if the append fails, so numbers are never reused.
        self.step += 1;

        let written = self.writer.append_entry(&path, data);
        let flushed = self.writer.flush();
        written?;
        flushed?;

        tracing::trace!(path = %path, bytes = data.len(), "debug entry written");
        Ok(())
    }

    fn write_graph(&mut self, graph: &dyn GraphSnapshot) -> Result<(), DebugError> {
        if self.closed {
            return Err(DebugError::Closed);
        }

        // Both renderings describe one event and share one step.
        let step = self.step;
        self.step += 1;

        let raw_path = entry_path(&self.name, step, &self.phase, graph.name());
        let dot_path = graph_path(&self.name, step, &self.phase, graph.name());

        let written = self
            .writer
            .append_entry(&raw_path, &graph.raw_bytes())
            .and_then(|()| self.writer.append_entry(&dot_path, &graph.dot_bytes()));
        let flushed = self.writer.flush();
        written?;
        flushed?;

        tracing::trace!(path = %dot_path, "debug graph written");
        Ok(())
    }

    fn close(&mut self) -> Result<(), DebugError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.close()
    }
}

impl<S: Sink> Recorder for ArchiveRecorder<S> {
    fn set_phase(&self, phase: &str) {
        self.session.lock().phase = phase.to_string();
    }

    fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DebugError> {
        self.session.lock().write_file(name, data)
    }

    fn write_graph(&self, graph: Option<&dyn GraphSnapshot>) -> Result<(), DebugError> {
        let Some(graph) = graph else {
            return Ok(());
        };
        self.session.lock().write_graph(graph)
    }

    fn close(&self) -> Result<(), DebugError> {
        self.session.lock().close()
    }
}
