//! Byte sinks the archive writer can sit on top of.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for the compressed archive stream.
///
/// `sync` and `close` are optional capabilities: the defaults do nothing, so
/// any plain writer can be used as a sink.
pub trait Sink: Write + Send {
    /// Push written bytes to durable storage.
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Release the sink after the archive trailers have been written.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn close(&mut self) -> io::Result<()> {
        // The descriptor itself is released on drop.
        self.sync_all()
    }
}

impl Sink for Vec<u8> {}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// In-memory sink whose contents stay readable after the writer that owns a
/// clone of it has been finalized.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for SharedBuffer {}
