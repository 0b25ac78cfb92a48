use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

pub struct KeysArguments {
    pub pattern: String,
}

impl KeysArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let [pattern] = arguments else {
            return Err(CommandError::WrongNumberOfArguments("keys".to_string()));
        };

        Ok(KeysArguments {
            pattern: pattern.clone(),
        })
    }
}

/// Handles the KEYS command.
///
/// `*` lists every live key in sorted order. Glob matching is not supported:
/// any other pattern only matches a key with exactly that name.
pub fn keys(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let keys_arguments = KeysArguments::parse(arguments)?;

    let keys = if keys_arguments.pattern == "*" {
        context.store.keys()
    } else if context.store.type_of(&keys_arguments.pattern).is_some() {
        vec![keys_arguments.pattern]
    } else {
        Vec::new()
    };

    Ok(CommandResult::Response(RespValue::bulk_string_array(keys)))
}
