mod encoding;
mod get_slice;
mod opcode;
mod persistence;
mod rdb_file;
mod rdb_parser;
mod rdb_writer;

pub use persistence::{Persistence, PersistenceError};
pub use rdb_file::RdbFile;
pub use rdb_parser::RdbParser;
