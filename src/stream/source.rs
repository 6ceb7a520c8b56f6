//! Byte sources feeding a [`FrameStream`](super::FrameStream).

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::protocol::Result;

/// Pull-based supplier of raw bytes.
pub trait ByteSource {
    /// Read up to `max_len` bytes. An empty chunk means the source is
    /// exhausted.
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes>;
}

/// Adapter over any [`Read`] implementation (files, stdin, tty devices).
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    scratch: Vec<u8>,
}

impl<R: Read> ReadSource<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            scratch: Vec::new(),
        }
    }

    /// Recover the wrapped reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes> {
        self.scratch.resize(max_len, 0);
        loop {
            match self.reader.read(&mut self.scratch) {
                Ok(n) => return Ok(Bytes::copy_from_slice(&self.scratch[..n])),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// In-memory source replaying pre-split chunks.
///
/// Each stored chunk is handed out in order and split further when it is
/// larger than the requested read size.
#[derive(Debug, Clone, Default)]
pub struct ChunkSource {
    chunks: VecDeque<Bytes>,
}

impl ChunkSource {
    /// Source replaying `chunks` in order
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let chunks = chunks
            .into_iter()
            .map(Into::into)
            .filter(|chunk: &Bytes| !chunk.is_empty())
            .collect();
        Self { chunks }
    }

    /// Source replaying one contiguous buffer
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::new([bytes.into()])
    }

    /// Bytes not yet handed out
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }
}

impl ByteSource for ChunkSource {
    fn read_chunk(&mut self, max_len: usize) -> Result<Bytes> {
        let Some(front) = self.chunks.front_mut() else {
            return Ok(Bytes::new());
        };

        if front.len() <= max_len {
            return Ok(self.chunks.pop_front().unwrap_or_default());
        }
        Ok(front.split_to(max_len))
    }
}
