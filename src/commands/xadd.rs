use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
    stream::{StreamFields, StreamIdSpec},
};

#[derive(Debug, PartialEq)]
pub struct XaddArguments {
    key: String,
    id: StreamIdSpec,
    fields: StreamFields,
}

impl XaddArguments {
    /// Parses `key id field value [field value ...]`.
    ///
    /// The id is `*`, `<ms>-*` or `<ms>-<seq>`. A dangling field without a
    /// value is an arity error, the same as Redis reports it.
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let [key, id, pairs @ ..] = arguments else {
            return Err(CommandError::WrongNumberOfArguments("xadd".to_string()));
        };

        if pairs.is_empty() || pairs.len() % 2 != 0 {
            return Err(CommandError::WrongNumberOfArguments("xadd".to_string()));
        }

        let fields = pairs
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        Ok(Self {
            key: key.clone(),
            id: id.parse()?,
            fields,
        })
    }
}

/// Handles the XADD command.
///
/// Appends an entry to the stream at the key, creating the stream when the
/// key is missing, and replies with the id the entry received. Readers
/// blocked on the key are woken by the store.
pub fn xadd(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let xadd_arguments = XaddArguments::parse(arguments)?;

    let id = context.store.stream_append(
        &xadd_arguments.key,
        xadd_arguments.id,
        xadd_arguments.fields,
    )?;

    Ok(CommandResult::Response(RespValue::BulkString(id.to_string())))
}
