//! Redis Serialization Protocol (RESP) values.
//!
//! Values are decoded straight from a byte buffer with a type-prefix driven
//! recursive grammar and encoded back into their wire representation.

use thiserror::Error;

const CRLF: &[u8] = b"\r\n";

/// Largest bulk string payload accepted from a client (512 MiB, as in Redis).
pub const MAX_BULK_LENGTH: usize = 512 * 1024 * 1024;

/// Longest type line (simple string, error, integer or length prefix).
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Deepest array nesting accepted. Requests are flat, so this only has to
/// leave room for replies decoded by clients.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Errors produced while decoding RESP input. Every variant is fatal for the
/// connection that sent the bytes.
#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type '{0}'")]
    UnknownRespType(char),
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk length")]
    InvalidBulkLength,
    #[error("invalid multibulk length")]
    InvalidMultibulkLength,
    #[error("expected CRLF terminator")]
    MissingTerminator,
    #[error("too big inline request")]
    LineTooLong,
    #[error("arrays nested too deeply")]
    NestingTooDeep,
}

impl RespError {
    /// Error value sent back to the client before the connection is closed.
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error(format!("ERR Protocol error: {}", self))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RespValue {
    SimpleString(String),
    BulkString(String),
    NullBulkString,
    Error(String),
    Integer(i64),
    Array(Vec<RespValue>),
    NullArray,
}

impl RespValue {
    /// Decodes a single value from the start of `bytes`.
    ///
    /// Returns `Ok(None)` when `bytes` holds only a prefix of a value, so the
    /// caller can read more data and try again. On success the number of bytes
    /// consumed is returned alongside the value.
    pub fn decode(bytes: &[u8]) -> Result<Option<(RespValue, usize)>, RespError> {
        let mut cursor = 0;

        match Self::decode_at(bytes, &mut cursor, 0)? {
            Some(value) => Ok(Some((value, cursor))),
            None => Ok(None),
        }
    }

    fn decode_at(
        bytes: &[u8],
        cursor: &mut usize,
        depth: usize,
    ) -> Result<Option<RespValue>, RespError> {
        let Some(&marker) = bytes.get(*cursor) else {
            return Ok(None);
        };

        let Some(line) = read_line(bytes, *cursor + 1)? else {
            return Ok(None);
        };
        let line_end = *cursor + 1 + line.len() + CRLF.len();

        match marker {
            b'+' => {
                *cursor = line_end;
                Ok(Some(RespValue::SimpleString(to_string(line)?)))
            }
            b'-' => {
                *cursor = line_end;
                Ok(Some(RespValue::Error(to_string(line)?)))
            }
            b':' => {
                *cursor = line_end;
                Ok(Some(RespValue::Integer(parse_integer(line)?)))
            }
            b'$' => {
                let length = parse_integer(line).map_err(|_| RespError::InvalidBulkLength)?;

                if length == -1 {
                    *cursor = line_end;
                    return Ok(Some(RespValue::NullBulkString));
                }

                let length = usize::try_from(length).map_err(|_| RespError::InvalidBulkLength)?;

                if length > MAX_BULK_LENGTH {
                    return Err(RespError::InvalidBulkLength);
                }

                let data_end = line_end + length;

                if bytes.len() < data_end + CRLF.len() {
                    return Ok(None);
                }

                if &bytes[data_end..data_end + CRLF.len()] != CRLF {
                    return Err(RespError::MissingTerminator);
                }

                let content = to_string(&bytes[line_end..data_end])?;
                *cursor = data_end + CRLF.len();

                Ok(Some(RespValue::BulkString(content)))
            }
            b'*' => {
                let count = parse_integer(line).map_err(|_| RespError::InvalidMultibulkLength)?;

                if count == -1 {
                    *cursor = line_end;
                    return Ok(Some(RespValue::NullArray));
                }

                let count =
                    usize::try_from(count).map_err(|_| RespError::InvalidMultibulkLength)?;

                if count > 0 && depth >= MAX_NESTING_DEPTH {
                    return Err(RespError::NestingTooDeep);
                }

                let mut position = line_end;
                let mut elements = Vec::with_capacity(count.min(1024));

                for _ in 0..count {
                    match Self::decode_at(bytes, &mut position, depth + 1)? {
                        Some(element) => elements.push(element),
                        None => return Ok(None),
                    }
                }

                *cursor = position;
                Ok(Some(RespValue::Array(elements)))
            }
            other => Err(RespError::UnknownRespType(other as char)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::NullBulkString => "$-1\r\n".to_string(),
            RespValue::Error(s) => format!("-{}\r\n", s),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());

                for element in elements {
                    encoded.push_str(&element.encode());
                }

                encoded
            }
            RespValue::NullArray => "*-1\r\n".to_string(),
        }
    }

    /// Builds an array of bulk strings.
    pub fn bulk_string_array<I, S>(items: I) -> RespValue
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RespValue::Array(
            items
                .into_iter()
                .map(|item| RespValue::BulkString(item.into()))
                .collect(),
        )
    }

    pub fn ok() -> RespValue {
        RespValue::SimpleString("OK".to_string())
    }
}

/// Returns the bytes between `start` and the next CRLF, or `None` when the
/// terminator has not arrived yet. Lines longer than [`MAX_LINE_LENGTH`] are
/// rejected whether or not their terminator has arrived.
fn read_line(bytes: &[u8], start: usize) -> Result<Option<&[u8]>, RespError> {
    if start > bytes.len() {
        return Ok(None);
    }

    let window = &bytes[start..bytes.len().min(start + MAX_LINE_LENGTH + 1)];

    let Some(position) = window.iter().position(|b| *b == b'\r') else {
        if window.len() > MAX_LINE_LENGTH {
            return Err(RespError::LineTooLong);
        }

        return Ok(None);
    };

    let line_end = start + position;

    match bytes.get(line_end + 1) {
        Some(b'\n') => Ok(Some(&bytes[start..line_end])),
        Some(_) => Err(RespError::MissingTerminator),
        None => Ok(None),
    }
}

fn to_string(bytes: &[u8]) -> Result<String, RespError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| RespError::InvalidUtf8)
}

fn parse_integer(bytes: &[u8]) -> Result<i64, RespError> {
    std::str::from_utf8(bytes)
        .map_err(|_| RespError::InvalidUtf8)?
        .parse::<i64>()
        .map_err(|_| RespError::FailedToParseInteger)
}
