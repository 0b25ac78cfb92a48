use thiserror::Error;

use crate::{key_value_store::StoreError, resp::RespValue, stream::InvalidStreamId};

/// Errors a command can reply with. The `Display` text is exactly what the
/// client receives. Only `InvalidCommand` also closes the connection.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("ERR Protocol error: expected an array of bulk strings")]
    InvalidCommand,
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("ERR syntax error")]
    SyntaxError,
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("ERR value is out of range, must be positive")]
    OutOfRange,
    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(String),
    #[error("ERR timeout is not an integer or out of range")]
    InvalidTimeout,
    #[error(transparent)]
    InvalidStreamId(#[from] InvalidStreamId),
    #[error("ERR Unbalanced '{0}' list of streams: for each stream key an ID or '$' must be specified.")]
    UnbalancedStreams(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("ERR unknown subcommand '{0}'. Try CONFIG HELP.")]
    UnknownConfigSubcommand(String),
    #[error("ERR Unknown option or number of arguments for CONFIG SET - '{0}'")]
    UnsupportedConfigParameter(String),
    #[error("ERR CONFIG SET failed (possibly related to argument '{0}') - argument couldn't be parsed into an integer")]
    InvalidConfigValue(String),
    #[error("ERR {0}")]
    Persistence(String),
}

impl CommandError {
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error(self.to_string())
    }
}
