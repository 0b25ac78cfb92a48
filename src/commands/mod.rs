mod command_dispatcher;
mod command_error;
mod command_handler;
mod config;
mod del;
mod echo;
mod get;
mod incr;
mod info;
mod keys;
mod llen;
mod lpop;
mod lrange;
mod ping;
mod rpush_and_lpush;
mod save;
mod set;
mod stream_utils;
mod type_command;
mod xadd;
mod xlen;
mod xrange;
mod xread;

pub use command_dispatcher::{CommandDispatcher, DispatchError, DispatchResult};
pub use command_error::CommandError;
pub use command_handler::{CommandContext, CommandHandler, CommandResult};
pub use xread::BlockedRead;
