use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

pub fn llen(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [key] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("llen".to_string()));
    };

    let len = context.store.list_len(key)?;

    Ok(CommandResult::Response(RespValue::Integer(len as i64)))
}
