//! Byte sources that ORC streams decode from.
use std::fmt;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::sync::Arc;

use bytes::Bytes;

use crate::errors::{OrcError, Result};

/// Identifies where stream bytes came from. Only used for error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrcDataSourceId(Arc<str>);

impl OrcDataSourceId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        OrcDataSourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcDataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque position in a byte source.
///
/// Only meaningful to the source that issued it. Tokens from the same source
/// compare equal exactly when they name the same byte position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InputStreamCheckpoint(u64);

impl InputStreamCheckpoint {
    pub const fn new(position: u64) -> Self {
        InputStreamCheckpoint(position)
    }

    pub const fn position(&self) -> u64 {
        self.0
    }
}

/// A seekable source of raw stream bytes.
pub trait OrcInputStream: fmt::Debug {
    /// Read a single byte, returning `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Capture the current position.
    fn checkpoint(&self) -> InputStreamCheckpoint;

    /// Reposition to a checkpoint previously returned by `checkpoint`.
    fn seek_to_checkpoint(&mut self, checkpoint: InputStreamCheckpoint) -> Result<()>;

    fn data_source_id(&self) -> &OrcDataSourceId;
}

impl<S> OrcInputStream for Box<S>
where
    S: OrcInputStream + ?Sized,
{
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.as_mut().read_byte()
    }

    fn checkpoint(&self) -> InputStreamCheckpoint {
        self.as_ref().checkpoint()
    }

    fn seek_to_checkpoint(&mut self, checkpoint: InputStreamCheckpoint) -> Result<()> {
        self.as_mut().seek_to_checkpoint(checkpoint)
    }

    fn data_source_id(&self) -> &OrcDataSourceId {
        self.as_ref().data_source_id()
    }
}

/// Stream over bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemoryInputStream {
    data_source: OrcDataSourceId,
    data: Bytes,
    pos: usize,
}

impl MemoryInputStream {
    pub fn new(data_source: OrcDataSourceId, data: impl Into<Bytes>) -> Self {
        MemoryInputStream {
            data_source,
            data: data.into(),
            pos: 0,
        }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl OrcInputStream for MemoryInputStream {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn checkpoint(&self) -> InputStreamCheckpoint {
        InputStreamCheckpoint::new(self.pos as u64)
    }

    fn seek_to_checkpoint(&mut self, checkpoint: InputStreamCheckpoint) -> Result<()> {
        let pos = checkpoint.position();
        if pos > self.data.len() as u64 {
            return Err(OrcError::corruption(
                &self.data_source,
                format!(
                    "Seek to checkpoint at byte {pos} is past end of stream ({} bytes)",
                    self.data.len()
                ),
            ));
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn data_source_id(&self) -> &OrcDataSourceId {
        &self.data_source
    }
}

/// Stream over any seekable reader, e.g. a file.
///
/// Checkpoints are byte offsets relative to where the reader was positioned
/// when the stream was created.
#[derive(Debug)]
pub struct ReaderInputStream<R> {
    data_source: OrcDataSourceId,
    reader: BufReader<R>,
    pos: u64,
}

impl<R> ReaderInputStream<R>
where
    R: Read + Seek,
{
    pub fn new(data_source: OrcDataSourceId, reader: R) -> Self {
        ReaderInputStream {
            data_source,
            reader: BufReader::new(reader),
            pos: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R> OrcInputStream for ReaderInputStream<R>
where
    R: Read + Seek + fmt::Debug,
{
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn checkpoint(&self) -> InputStreamCheckpoint {
        InputStreamCheckpoint::new(self.pos)
    }

    fn seek_to_checkpoint(&mut self, checkpoint: InputStreamCheckpoint) -> Result<()> {
        let target = checkpoint.position();
        let offset = i64::try_from(target).map_err(|_| {
            OrcError::corruption(
                &self.data_source,
                format!("Checkpoint at byte {target} is not addressable"),
            )
        })? - self.pos as i64;
        // Keeps the buffered bytes when the target is already buffered.
        self.reader.seek_relative(offset)?;
        self.pos = target;
        Ok(())
    }

    fn data_source_id(&self) -> &OrcDataSourceId {
        &self.data_source
    }
}
