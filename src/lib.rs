//! An in-memory key-value store speaking the Redis serialization protocol.
//!
//! Supported:
//!
//! - Strings with optional expiry (SET, GET, INCR, DEL, KEYS, TYPE)
//! - Lists (LPUSH, RPUSH, LPOP, RPOP, LLEN, LRANGE)
//! - Streams (XADD, XLEN, XRANGE, XREAD with BLOCK)
//! - Transactions (MULTI, EXEC, DISCARD)
//! - Snapshots in the RDB format (SAVE, loading at startup) and CONFIG GET/SET
//!
//! Every client runs on its own tokio task. All of them share one
//! [`key_value_store::KeyValueStore`] behind a mutex.

pub mod commands;
pub mod connection;
pub mod input;
pub mod key_value_store;
pub mod rdb;
pub mod resp;
pub mod server;
pub mod stream;
pub mod stream_waiters;
pub mod transaction;
