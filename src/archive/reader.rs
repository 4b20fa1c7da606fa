//! Reading debug archives back, including ones whose writer never finished.

use std::io::{self, Read};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::DebugError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry as stored in the archive. Directory paths end with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: EntryKind,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// File name below the session (or `graphs/`) directory.
    pub fn file_name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Step number encoded at the front of a content entry's file name.
    pub fn step(&self) -> Option<u64> {
        if self.kind != EntryKind::File {
            return None;
        }
        let (step, _) = self.file_name().split_once('-')?;
        step.parse().ok()
    }

    pub fn is_graph(&self) -> bool {
        self.kind == EntryKind::File && self.path.contains("/graphs/")
    }
}

/// Result of a tolerant read.
#[derive(Debug, Clone, Default)]
pub struct RecoveredArchive {
    /// Every entry whose header and full payload could be decoded.
    pub entries: Vec<ArchiveEntry>,
    /// The stream ended with valid tar and gzip trailers.
    pub complete: bool,
}

/// Read a finalized archive. Truncation or corruption is an error.
pub fn read_archive<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, DebugError> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut entries = Vec::new();

    for entry in archive.entries()? {
        entries.push(decode_entry(entry?)?);
    }

    // Drain the remaining padding so the gzip trailer is verified.
    io::copy(&mut archive.into_inner(), &mut io::sink())?;
    Ok(entries)
}

/// Read as much as possible from an archive that may have been cut off
/// mid-run. Stops at the first entry that cannot be fully decoded.
pub fn recover_archive<R: Read>(reader: R) -> RecoveredArchive {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut recovered = RecoveredArchive::default();

    let entries = match archive.entries() {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(error = %err, "debug archive unreadable");
            return recovered;
        }
    };

    for entry in entries {
        match entry.map_err(DebugError::from).and_then(decode_entry) {
            Ok(entry) => recovered.entries.push(entry),
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    recovered = recovered.entries.len(),
                    "debug archive truncated"
                );
                return recovered;
            }
        }
    }

    recovered.complete = io::copy(&mut archive.into_inner(), &mut io::sink()).is_ok();
    recovered
}

fn decode_entry<R: Read>(mut entry: tar::Entry<'_, R>) -> Result<ArchiveEntry, DebugError> {
    let kind = if entry.header().entry_type().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    let mut path = entry.path()?.to_string_lossy().into_owned();
    if kind == EntryKind::Directory && !path.ends_with('/') {
        path.push('/');
    }

    let size = entry.size();
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;
    if data.len() as u64 != size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("entry {path} cut off after {} of {size} bytes", data.len()),
        )
        .into());
    }

    Ok(ArchiveEntry { path, kind, data })
}
