//! Gzip-compressed tar output for the debug recorder.
//!
//! The writer is a three-layer pipeline (sink, compressor, framer) that is
//! flushed after every entry, so an archive cut short by a crash can still be
//! read back with [`recover_archive`] up to the last completed entry.

pub mod reader;
pub mod sink;
pub mod writer;

pub use reader::{read_archive, recover_archive, ArchiveEntry, EntryKind, RecoveredArchive};
pub use sink::{SharedBuffer, Sink};
pub use writer::{ArchiveWriter, GRAPHS_DIR};
