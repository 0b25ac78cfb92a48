use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Represents the parsed arguments for the LRANGE command.
///
/// Holds the key and the raw start and end indexes. Normalization against
/// the list length happens in the store, where the length is known.
#[derive(Debug, PartialEq)]
pub struct LrangeArguments {
    /// The key name to retrieve from the store
    key: String,
    /// The starting index for the range (can be negative to count from the end)
    start_index: i64,
    /// The ending index for the range (can be negative to count from the end)
    end_index: i64,
}

impl LrangeArguments {
    /// Parses and validates the arguments for the LRANGE command.
    ///
    /// # Arguments
    ///
    /// * `arguments` - A slice of command arguments: [key, start_index, end_index]
    ///
    /// # Returns
    ///
    /// * `Ok(LrangeArguments)` - If the arguments are valid
    /// * `Err(CommandError::WrongNumberOfArguments)` - If the number of arguments is not exactly 3
    /// * `Err(CommandError::NotAnInteger)` - If start or end index is not a valid integer
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let [key, start_index, end_index] = arguments else {
            return Err(CommandError::WrongNumberOfArguments("lrange".to_string()));
        };

        let Ok(start_index) = start_index.parse::<i64>() else {
            return Err(CommandError::NotAnInteger);
        };

        let Ok(end_index) = end_index.parse::<i64>() else {
            return Err(CommandError::NotAnInteger);
        };

        Ok(Self {
            key: key.clone(),
            start_index,
            end_index,
        })
    }
}

/// Handles the LRANGE command.
///
/// Returns the elements between the two indexes, both inclusive. Out of range
/// indexes are clamped, so the reply is an empty array rather than an error
/// when nothing falls inside the range or the key does not exist.
///
/// # Examples
///
/// ```ignore
/// // RPUSH mylist a b c d e
/// // LRANGE mylist -2 -1
/// // Returns: "*2\r\n$1\r\nd\r\n$1\r\ne\r\n"
/// ```
pub fn lrange(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let lrange_arguments = LrangeArguments::parse(arguments)?;

    let elements = context.store.list_range(
        &lrange_arguments.key,
        lrange_arguments.start_index,
        lrange_arguments.end_index,
    )?;

    Ok(CommandResult::Response(RespValue::bulk_string_array(
        elements,
    )))
}
