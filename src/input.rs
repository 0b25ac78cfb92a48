//! Reading RESP values off a byte stream.

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::resp::{RespError, RespValue};

/// Most bytes a client may have buffered without forming a complete request
/// (1 GiB, the default Redis query buffer limit).
pub const MAX_QUERY_BUFFER_LENGTH: usize = 1024 * 1024 * 1024;

/// Errors that can occur while reading a request from a client.
#[derive(Error, Debug)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("connection closed in the middle of a request")]
    ConnectionClosed,
    #[error("RESP parse error: {0}")]
    RespParseError(#[from] RespError),
    #[error("query buffer exceeded {0} bytes")]
    QueryBufferLimit(usize),
}

/// Buffered reader that yields one complete [`RespValue`] at a time.
#[derive(Debug)]
pub struct RespReader<R> {
    reader: R,
    buffer: BytesMut,
    buffer_limit: usize,
}

impl<R: AsyncRead + Unpin> RespReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_buffer_limit(reader, MAX_QUERY_BUFFER_LENGTH)
    }

    pub fn with_buffer_limit(reader: R, buffer_limit: usize) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(4096.min(buffer_limit)),
            buffer_limit,
        }
    }

    /// Returns the next value, or `None` once the peer has closed the
    /// connection cleanly between requests.
    ///
    /// Bytes that follow the value stay buffered for the next call, so
    /// pipelined requests are served one by one.
    pub async fn read_value(&mut self) -> Result<Option<RespValue>, CommandReadError> {
        loop {
            if let Some((value, consumed)) = RespValue::decode(&self.buffer)? {
                self.buffer.advance(consumed);
                return Ok(Some(value));
            }

            if self.read_more().await? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                return Err(CommandReadError::ConnectionClosed);
            }
        }
    }

    /// Reads whatever is available into the buffer. Returns `0` on EOF.
    ///
    /// Cancel safe: dropping the future before it completes loses no data,
    /// which lets a blocked command watch the socket for a disconnect.
    /// Fails once the buffer holds more than the configured limit.
    pub async fn read_more(&mut self) -> Result<usize, CommandReadError> {
        let read = self.reader.read_buf(&mut self.buffer).await?;

        if self.buffer.len() > self.buffer_limit {
            return Err(CommandReadError::QueryBufferLimit(self.buffer_limit));
        }

        Ok(read)
    }
}
