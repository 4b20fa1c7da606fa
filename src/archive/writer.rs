//! Layered archive output: sink -> gzip compressor -> tar framer.

use std::io::{self, Read, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, EntryType, Header};

use crate::archive::sink::Sink;
use crate::error::DebugError;

/// Subdirectory holding DOT renderings of graph snapshots.
pub const GRAPHS_DIR: &str = "graphs";

const DIR_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;
const LONG_LINK: &[u8] = b"././@LongLink";

/// Appends named byte blobs to a single gzip-compressed tar stream.
///
/// The framer is dropped on `close`, so every later append fails with
/// [`DebugError::Closed`] instead of touching the finalized stream.
pub struct ArchiveWriter<S: Sink> {
    top_level: String,
    builder: Option<Builder<GzEncoder<S>>>,
}

impl<S: Sink> ArchiveWriter<S> {
    /// Start a new archive on `sink`, writing the `<top_level>/` and
    /// `<top_level>/graphs/` directory markers before anything else.
    pub fn open(sink: S, top_level: &str) -> Result<Self, DebugError> {
        let encoder = GzEncoder::new(sink, Compression::default());
        let mut writer = Self {
            top_level: top_level.to_string(),
            builder: Some(Builder::new(encoder)),
        };

        writer.append_dir(&format!("{top_level}/"))?;
        writer.append_dir(&format!("{top_level}/{GRAPHS_DIR}/"))?;
        writer.flush()?;

        Ok(writer)
    }

    pub fn top_level(&self) -> &str {
        &self.top_level
    }

    pub fn is_closed(&self) -> bool {
        self.builder.is_none()
    }

    /// Write one regular file entry with the exact length of `data`.
    pub fn append_entry(&mut self, path: &str, data: &[u8]) -> Result<(), DebugError> {
        let builder = self.builder.as_mut().ok_or(DebugError::Closed)?;

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(FILE_MODE);
        header.set_size(data.len() as u64);
        header.set_mtime(now_secs());
        append_named(builder, header, path, data)
    }

    fn append_dir(&mut self, path: &str) -> Result<(), DebugError> {
        let builder = self.builder.as_mut().ok_or(DebugError::Closed)?;

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(DIR_MODE);
        header.set_size(0);
        header.set_mtime(now_secs());
        append_named(builder, header, path, io::empty())
    }

    /// Flush framer, then compressor, then ask the sink for a durability sync.
    ///
    /// After this returns `Ok`, every entry appended so far can be decoded from
    /// the bytes already in the sink even if `close` never runs.
    pub fn flush(&mut self) -> Result<(), DebugError> {
        let builder = self.builder.as_mut().ok_or(DebugError::Closed)?;

        // tar::Builder writes straight through, so the framer has nothing buffered.
        let encoder = builder.get_mut();
        encoder.flush()?;
        encoder.get_mut().sync()?;
        Ok(())
    }

    /// Write the tar and gzip trailers and close the sink.
    ///
    /// A second call finds no framer and returns `Ok(())` without doing anything.
    pub fn close(&mut self) -> Result<(), DebugError> {
        let Some(builder) = self.builder.take() else {
            return Ok(());
        };

        let encoder = builder.into_inner()?;
        let mut sink = encoder.finish()?;
        sink.close()?;
        Ok(())
    }
}

/// Append `header` under `path` exactly as given.
///
/// Labels are caller-chosen and never validated, so the name goes into the
/// header bytes directly instead of through `Header::set_path`, which rejects
/// `..` components. Names that overflow the header field are preceded by a
/// GNU long-name entry.
fn append_named<W: Write, R: Read>(
    builder: &mut Builder<W>,
    mut header: Header,
    path: &str,
    data: R,
) -> Result<(), DebugError> {
    let name = path.as_bytes();
    let field_len = header.as_old().name.len();

    if name.len() > field_len {
        let mut long = Header::new_gnu();
        set_name(&mut long, LONG_LINK);
        long.set_entry_type(EntryType::GNULongName);
        long.set_mode(FILE_MODE);
        long.set_mtime(0);
        long.set_size(name.len() as u64 + 1);
        long.set_cksum();

        let mut body = name.to_vec();
        body.push(0);
        builder.append(&long, body.as_slice())?;
    }

    set_name(&mut header, &name[..name.len().min(field_len)]);
    header.set_cksum();
    builder.append(&header, data)?;
    Ok(())
}

fn set_name(header: &mut Header, name: &[u8]) {
    let field = &mut header.as_old_mut().name;
    field.fill(0);
    field[..name.len()].copy_from_slice(name);
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
