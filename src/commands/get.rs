use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Handles the GET command.
///
/// Replies with the string stored at the key, or a null bulk string when the
/// key is missing or expired. A key of another type is a WRONGTYPE error.
pub fn get(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [key] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("get".to_string()));
    };

    let response = match context.store.get(key)? {
        Some(value) => RespValue::BulkString(value),
        None => RespValue::NullBulkString,
    };

    Ok(CommandResult::Response(response))
}
