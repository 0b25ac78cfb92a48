use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Handles the INCR command.
///
/// Increments the integer stored at the key by one, starting from 0 for a
/// missing key, and replies with the new value.
///
/// # Returns
///
/// * `Ok(CommandResult)` - The incremented value as a RESP integer
/// * `Err(CommandError::Store(StoreError::NotAnInteger))` - If the value is not a 64 bit integer or would overflow
/// * `Err(CommandError::Store(StoreError::WrongType))` - If the key holds a list or a stream
pub fn incr(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [key] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("incr".to_string()));
    };

    let value = context.store.incr(key)?;

    Ok(CommandResult::Response(RespValue::Integer(value)))
}
