use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Removes every given key and replies with how many existed.
pub fn del(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let deleted = arguments
        .iter()
        .filter(|key| context.store.delete(key))
        .count();

    Ok(CommandResult::Response(RespValue::Integer(deleted as i64)))
}
