use thiserror::Error;

use crate::key_value_store::Snapshot;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of snapshot data")]
    UnexpectedEof,
    #[error("invalid magic string")]
    InvalidMagicString,
    #[error("unsupported RDB version {0}")]
    UnsupportedVersion(String),
    #[error("invalid length encoding 0x{0:02X}")]
    InvalidLengthEncoding(u8),
    #[error("compressed strings are not supported")]
    CompressedString,
    #[error("invalid UTF-8 in snapshot string")]
    InvalidUtf8,
    #[error("unknown opcode 0x{0:02X}")]
    UnknownOpcode(u8),
    #[error("unsupported value type 0x{0:02X}")]
    UnsupportedValueType(u8),
    #[error("invalid expiration timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("invalid stream id {0:?}")]
    InvalidStreamId(String),
}

/// Saves and restores the keyspace.
///
/// Implementations decide the format. Callers only hand over a [`Snapshot`]
/// and get one back.
pub trait Persistence {
    fn persist(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;

    /// Reads the last persisted snapshot. Nothing persisted yet is an empty
    /// snapshot, not an error.
    fn load(&self) -> Result<Snapshot, PersistenceError>;
}
