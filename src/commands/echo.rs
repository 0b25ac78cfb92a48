use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Handles the ECHO command.
///
/// Returns the single argument unchanged as a bulk string.
///
/// # Examples
///
/// ```ignore
/// // ECHO "hello world"
/// // Returns: "$11\r\nhello world\r\n"
/// ```
pub fn echo(
    _context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [message] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("echo".to_string()));
    };

    Ok(CommandResult::Response(RespValue::BulkString(
        message.clone(),
    )))
}
