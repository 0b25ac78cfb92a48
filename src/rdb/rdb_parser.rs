use std::collections::HashMap;

use crate::{
    key_value_store::{Snapshot, SnapshotEntry},
    rdb::{
        opcode::{parse_magic_string, parse_opcode, OpCodeResponse, MAGIC_STRING},
        PersistenceError,
    },
};

/// Parses a whole RDB file into a [`Snapshot`].
///
/// Only the sections the writer produces are understood, plus
/// second-precision expiry and integer-encoded strings. Values may be
/// strings, plain lists or streams. Anything after the
/// end-of-file marker is ignored.
#[derive(Debug, Default)]
pub struct RdbParser {
    cursor: usize,
    pub redis_version: Option<String>,
    pub metadata: HashMap<String, String>,
    pub db_number: Option<usize>,
    pub hash_table_size: Option<usize>,
    pub expiry_hash_table_size: Option<usize>,
    pub entries: Vec<SnapshotEntry>,
    pub crc64_checksum: Option<[u8; 8]>,
}

impl RdbParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, buffer: &[u8]) -> Result<(), PersistenceError> {
        self.redis_version = Some(parse_magic_string(buffer)?);
        self.cursor = MAGIC_STRING.len() + 4;

        while self.crc64_checksum.is_none() {
            let (result, bytes_read) = parse_opcode(buffer, self.cursor)?;
            self.cursor += bytes_read;

            match result {
                OpCodeResponse::Metadata { key, value } => {
                    self.metadata.insert(key, value);
                }
                OpCodeResponse::ResizeDb {
                    db_hash_table_size,
                    expiry_hash_table_size,
                } => {
                    self.hash_table_size = Some(db_hash_table_size);
                    self.expiry_hash_table_size = Some(expiry_hash_table_size);
                }
                OpCodeResponse::Database { database_number } => {
                    self.db_number = Some(database_number);
                }
                OpCodeResponse::KeyValuePair {
                    key,
                    value,
                    expires_at,
                } => {
                    self.entries.push(SnapshotEntry {
                        key,
                        value,
                        expires_at,
                    });
                }
                OpCodeResponse::EndOfFile { crc64_checksum } => {
                    self.crc64_checksum = Some(crc64_checksum);
                }
            }
        }

        Ok(())
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            entries: self.entries,
        }
    }
}
