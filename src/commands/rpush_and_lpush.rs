use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    key_value_store::ListSide,
    resp::RespValue,
};

pub struct PushArrayOperations {
    key: String,
    values: Vec<String>,
}

impl PushArrayOperations {
    pub fn parse(name: &str, arguments: &[String]) -> Result<Self, CommandError> {
        let [key, values @ ..] = arguments else {
            return Err(CommandError::WrongNumberOfArguments(name.to_string()));
        };

        if values.is_empty() {
            return Err(CommandError::WrongNumberOfArguments(name.to_string()));
        }

        Ok(Self {
            key: key.clone(),
            values: values.to_vec(),
        })
    }
}

fn push(
    context: &mut CommandContext<'_>,
    name: &str,
    side: ListSide,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let push_arguments = PushArrayOperations::parse(name, arguments)?;

    let len = context
        .store
        .list_push(&push_arguments.key, side, &push_arguments.values)?;

    Ok(CommandResult::Response(RespValue::Integer(len as i64)))
}

/// Handles the LPUSH command.
///
/// Inserts each value at the head of the list in argument order, so
/// `LPUSH list a b c` leaves `c b a` at the front. Replies with the new
/// length of the list.
pub fn lpush(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    push(context, "lpush", ListSide::Left, arguments)
}

/// Handles the RPUSH command. Appends the values at the tail of the list.
pub fn rpush(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    push(context, "rpush", ListSide::Right, arguments)
}
