use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

pub fn xlen(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [key] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("xlen".to_string()));
    };

    let len = context.store.stream_len(key)?;

    Ok(CommandResult::Response(RespValue::Integer(len as i64)))
}
