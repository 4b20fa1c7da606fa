pub mod archive;
pub mod config;
pub mod error;
pub mod graph;
pub mod hook;
pub mod recorder;
pub mod util;

pub use archive::{read_archive, recover_archive, ArchiveEntry, ArchiveWriter, EntryKind, Sink};
pub use config::DebugConfig;
pub use error::DebugError;
pub use graph::{DebugGraph, GraphSnapshot};
pub use hook::{advisory, DebugHook, Hook, HookAction, HookSet};
pub use recorder::{ArchiveRecorder, DebugInfo, NoopRecorder, Recorder};
