use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    key_value_store::ListSide,
    resp::RespValue,
};

/// Represents the parsed arguments for LPOP and RPOP.
#[derive(Debug, PartialEq)]
pub struct PopArguments {
    key: String,
    /// `None` when no count was given, which changes the reply shape
    count: Option<usize>,
}

impl PopArguments {
    pub fn parse(name: &str, arguments: &[String]) -> Result<Self, CommandError> {
        match arguments {
            [key] => Ok(Self {
                key: key.clone(),
                count: None,
            }),
            [key, count] => {
                let count = count
                    .parse::<i64>()
                    .map_err(|_| CommandError::NotAnInteger)?;
                let count = usize::try_from(count).map_err(|_| CommandError::OutOfRange)?;

                Ok(Self {
                    key: key.clone(),
                    count: Some(count),
                })
            }
            _ => Err(CommandError::WrongNumberOfArguments(name.to_string())),
        }
    }
}

/// Removes and returns elements from one end of a list.
///
/// Without a count the reply is a single bulk string, or a null bulk string
/// when the key is missing. With a count the reply is an array of up to that
/// many elements, or a null array when the key is missing.
fn pop(
    context: &mut CommandContext<'_>,
    name: &str,
    side: ListSide,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let pop_arguments = PopArguments::parse(name, arguments)?;

    let popped = context.store.list_pop(
        &pop_arguments.key,
        side,
        pop_arguments.count.unwrap_or(1),
    )?;

    let response = match (popped, pop_arguments.count) {
        (None, None) => RespValue::NullBulkString,
        (None, Some(_)) => RespValue::NullArray,
        (Some(mut elements), None) => match elements.pop() {
            Some(element) => RespValue::BulkString(element),
            None => RespValue::NullBulkString,
        },
        (Some(elements), Some(_)) => RespValue::bulk_string_array(elements),
    };

    Ok(CommandResult::Response(response))
}

pub fn lpop(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    pop(context, "lpop", ListSide::Left, arguments)
}

pub fn rpop(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    pop(context, "rpop", ListSide::Right, arguments)
}
