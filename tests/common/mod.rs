//! Shared test utilities
//!
//! - Archive readers that drop the directory markers
//! - A sink that can be switched into a failing state


use debug_archive::{read_archive, ArchiveEntry, EntryKind};

/// Every regular file entry of a finalized archive, in physical order.
pub fn file_entries(bytes: &[u8]) -> Vec<ArchiveEntry> {
    read_archive(bytes)
        .expect("archive should be readable")
        .into_iter()
        .filter(|e| e.kind == EntryKind::File)
        .collect()
}

/// `(path, contents)` pairs for comparison against expected layouts.
pub fn paths_and_data(entries: &[ArchiveEntry]) -> Vec<(String, Vec<u8>)> {
    entries
        .iter()
        .map(|e| (e.path.clone(), e.data.clone()))
        .collect()
}
