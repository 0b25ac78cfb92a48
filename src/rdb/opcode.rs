use jiff::Timestamp;

use crate::{
    key_value_store::DataType,
    rdb::{
        encoding::{parse_length, parse_list, parse_stream, parse_value},
        get_slice::{get_buffer_array, get_buffer_slice},
        PersistenceError,
    },
};

pub const MAGIC_STRING: &[u8] = b"REDIS";
pub const RDB_VERSION: &str = "0011";

pub const METADATA_OPCODE: u8 = 0xFA;
pub const RESIZE_DB_OPCODE: u8 = 0xFB;
pub const EXPIRATION_MILLISECONDS_OPCODE: u8 = 0xFC;
pub const EXPIRATION_SECONDS_OPCODE: u8 = 0xFD;
pub const DATABASE_OPCODE: u8 = 0xFE;
pub const END_OF_FILE_OPCODE: u8 = 0xFF;
pub const STRING_VALUE_TYPE: u8 = 0x00;
pub const LIST_VALUE_TYPE: u8 = 0x01;
/// Streams are written as plain entry lists under a type Redis does not use.
pub const STREAM_VALUE_TYPE: u8 = 0x3F;

#[derive(Debug, PartialEq)]
pub enum OpCodeResponse {
    Metadata {
        key: String,
        value: String,
    },
    ResizeDb {
        db_hash_table_size: usize,
        expiry_hash_table_size: usize,
    },
    Database {
        database_number: usize,
    },
    KeyValuePair {
        key: String,
        value: DataType,
        expires_at: Option<Timestamp>,
    },
    EndOfFile {
        crc64_checksum: [u8; 8],
    },
}

fn parse_key_value_pair(
    bytes: &[u8],
    cursor: usize,
    expires_at: Option<Timestamp>,
) -> Result<(OpCodeResponse, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let [value_type] = get_buffer_array::<1>(bytes, temp_cursor)?;
    temp_cursor += 1;

    let (key, key_cursor) = parse_value(bytes, temp_cursor)?;
    temp_cursor += key_cursor;

    let (value, value_cursor) = match value_type {
        STRING_VALUE_TYPE => {
            let (value, value_cursor) = parse_value(bytes, temp_cursor)?;
            (DataType::String(value), value_cursor)
        }
        LIST_VALUE_TYPE => {
            let (list, list_cursor) = parse_list(bytes, temp_cursor)?;
            (DataType::List(list), list_cursor)
        }
        STREAM_VALUE_TYPE => {
            let (stream, stream_cursor) = parse_stream(bytes, temp_cursor)?;
            (DataType::Stream(stream), stream_cursor)
        }
        other => return Err(PersistenceError::UnsupportedValueType(other)),
    };
    temp_cursor += value_cursor;

    Ok((
        OpCodeResponse::KeyValuePair {
            key,
            value,
            expires_at,
        },
        temp_cursor - cursor,
    ))
}

/// Parses one section of the file body starting at `cursor`.
///
/// Returns the section and the number of bytes it took up. An expiry opcode
/// is returned together with the key-value pair that follows it.
pub fn parse_opcode(
    bytes: &[u8],
    cursor: usize,
) -> Result<(OpCodeResponse, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let [opcode] = get_buffer_array::<1>(bytes, temp_cursor)?;

    let response = match opcode {
        METADATA_OPCODE => {
            temp_cursor += 1;
            let (key, key_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += key_cursor;
            let (value, value_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += value_cursor;

            OpCodeResponse::Metadata { key, value }
        }
        RESIZE_DB_OPCODE => {
            temp_cursor += 1;
            let (db_hash_table_size, db_cursor) = parse_length(bytes, temp_cursor)?;
            temp_cursor += db_cursor;
            let (expiry_hash_table_size, expiry_cursor) = parse_length(bytes, temp_cursor)?;
            temp_cursor += expiry_cursor;

            OpCodeResponse::ResizeDb {
                db_hash_table_size,
                expiry_hash_table_size,
            }
        }
        DATABASE_OPCODE => {
            temp_cursor += 1;
            let (database_number, database_cursor) = parse_length(bytes, temp_cursor)?;
            temp_cursor += database_cursor;

            OpCodeResponse::Database { database_number }
        }
        EXPIRATION_SECONDS_OPCODE => {
            temp_cursor += 1;
            let seconds = u32::from_le_bytes(get_buffer_array::<4>(bytes, temp_cursor)?);
            temp_cursor += 4;

            let expires_at = Timestamp::from_second(i64::from(seconds))
                .map_err(|e| PersistenceError::InvalidTimestamp(e.to_string()))?;

            let (response, pair_cursor) = parse_key_value_pair(bytes, temp_cursor, Some(expires_at))?;
            temp_cursor += pair_cursor;

            response
        }
        EXPIRATION_MILLISECONDS_OPCODE => {
            temp_cursor += 1;
            let milliseconds = u64::from_le_bytes(get_buffer_array::<8>(bytes, temp_cursor)?);
            temp_cursor += 8;

            let milliseconds = i64::try_from(milliseconds)
                .map_err(|e| PersistenceError::InvalidTimestamp(e.to_string()))?;
            let expires_at = Timestamp::from_millisecond(milliseconds)
                .map_err(|e| PersistenceError::InvalidTimestamp(e.to_string()))?;

            let (response, pair_cursor) = parse_key_value_pair(bytes, temp_cursor, Some(expires_at))?;
            temp_cursor += pair_cursor;

            response
        }
        END_OF_FILE_OPCODE => {
            temp_cursor += 1;
            let crc64_checksum = get_buffer_array::<8>(bytes, temp_cursor)?;
            temp_cursor += 8;

            OpCodeResponse::EndOfFile { crc64_checksum }
        }
        STRING_VALUE_TYPE | LIST_VALUE_TYPE | STREAM_VALUE_TYPE => {
            let (response, pair_cursor) = parse_key_value_pair(bytes, temp_cursor, None)?;
            temp_cursor += pair_cursor;

            response
        }
        0x02..=0x0F => return Err(PersistenceError::UnsupportedValueType(opcode)),
        opcode => return Err(PersistenceError::UnknownOpcode(opcode)),
    };

    Ok((response, temp_cursor - cursor))
}

/// Checks the `REDIS` magic string and the four digit version that follows.
/// Returns the version.
pub fn parse_magic_string(bytes: &[u8]) -> Result<String, PersistenceError> {
    if get_buffer_slice(bytes, 0, MAGIC_STRING.len())? != MAGIC_STRING {
        return Err(PersistenceError::InvalidMagicString);
    }

    let version = get_buffer_slice(bytes, MAGIC_STRING.len(), 4)?;
    let version = String::from_utf8(version.to_vec()).map_err(|_| PersistenceError::InvalidUtf8)?;

    match version.parse::<u32>() {
        Ok(1..=12) => Ok(version),
        _ => Err(PersistenceError::UnsupportedVersion(version)),
    }
}
