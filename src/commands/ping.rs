use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

pub struct PingArguments {
    message: Option<String>,
}

impl PingArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        match arguments {
            [] => Ok(Self { message: None }),
            [message] => Ok(Self {
                message: Some(message.clone()),
            }),
            _ => Err(CommandError::WrongNumberOfArguments("ping".to_string())),
        }
    }
}

/// Replies `PONG`, or echoes the optional message back as a bulk string.
pub fn ping(
    _context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let ping_arguments = PingArguments::parse(arguments)?;

    let response = match ping_arguments.message {
        Some(message) => RespValue::BulkString(message),
        None => RespValue::SimpleString("PONG".to_string()),
    };

    Ok(CommandResult::Response(response))
}
