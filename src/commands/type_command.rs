use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Handles the TYPE command.
///
/// Replies with `string`, `list` or `stream`, or `none` for a missing key.
pub fn type_command(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [key] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("type".to_string()));
    };

    let type_name = context.store.type_of(key).unwrap_or("none");

    Ok(CommandResult::Response(RespValue::SimpleString(
        type_name.to_string(),
    )))
}
