use jiff::Timestamp;

use crate::{
    key_value_store::{DataType, Snapshot},
    rdb::{
        encoding::{write_length, write_list, write_stream, write_value},
        opcode::{
            DATABASE_OPCODE, END_OF_FILE_OPCODE, EXPIRATION_MILLISECONDS_OPCODE,
            LIST_VALUE_TYPE, MAGIC_STRING, METADATA_OPCODE, RDB_VERSION, RESIZE_DB_OPCODE,
            STREAM_VALUE_TYPE, STRING_VALUE_TYPE,
        },
    },
};

/// Serializes `snapshot` into database 0 of an RDB file.
///
/// The checksum is written as eight zero bytes, which readers take to mean
/// that no checksum was computed.
pub fn encode_snapshot(snapshot: &Snapshot) -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.extend_from_slice(MAGIC_STRING);
    buffer.extend_from_slice(RDB_VERSION.as_bytes());

    let metadata = [
        ("respkv-ver", env!("CARGO_PKG_VERSION").to_string()),
        ("redis-bits", (usize::BITS).to_string()),
        ("ctime", Timestamp::now().as_second().to_string()),
    ];

    for (key, value) in metadata {
        buffer.push(METADATA_OPCODE);
        write_value(&mut buffer, key);
        write_value(&mut buffer, &value);
    }

    buffer.push(DATABASE_OPCODE);
    write_length(&mut buffer, 0);

    let expiring = snapshot
        .entries
        .iter()
        .filter(|entry| entry.expires_at.is_some())
        .count();

    buffer.push(RESIZE_DB_OPCODE);
    write_length(&mut buffer, snapshot.entries.len());
    write_length(&mut buffer, expiring);

    for entry in &snapshot.entries {
        if let Some(expires_at) = entry.expires_at {
            buffer.push(EXPIRATION_MILLISECONDS_OPCODE);
            let milliseconds = u64::try_from(expires_at.as_millisecond()).unwrap_or(0);
            buffer.extend_from_slice(&milliseconds.to_le_bytes());
        }

        match &entry.value {
            DataType::String(value) => {
                buffer.push(STRING_VALUE_TYPE);
                write_value(&mut buffer, &entry.key);
                write_value(&mut buffer, value);
            }
            DataType::List(list) => {
                buffer.push(LIST_VALUE_TYPE);
                write_value(&mut buffer, &entry.key);
                write_list(&mut buffer, list);
            }
            DataType::Stream(stream) => {
                buffer.push(STREAM_VALUE_TYPE);
                write_value(&mut buffer, &entry.key);
                write_stream(&mut buffer, stream);
            }
        }
    }

    buffer.push(END_OF_FILE_OPCODE);
    buffer.extend_from_slice(&[0; 8]);

    buffer
}
