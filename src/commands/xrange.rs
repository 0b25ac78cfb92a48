use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
        stream_utils::stream_entries_to_resp,
    },
    stream::StreamId,
};

/// Represents the parsed arguments for the XRANGE command.
///
/// Format: `XRANGE key start end [COUNT n]`
#[derive(Debug, PartialEq)]
pub struct XrangeArguments {
    key: String,
    /// Inclusive lower bound. `-` and a bare `<ms>` resolve to `<ms>-0`.
    start: StreamId,
    /// Inclusive upper bound. `+` and a bare `<ms>` resolve to the last
    /// possible sequence of that millisecond.
    end: StreamId,
    count: Option<usize>,
}

impl XrangeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let [key, start, end, options @ ..] = arguments else {
            return Err(CommandError::WrongNumberOfArguments("xrange".to_string()));
        };

        let count = match options {
            [] => None,
            [option, count] if option.eq_ignore_ascii_case("COUNT") => {
                let count = count
                    .parse::<i64>()
                    .map_err(|_| CommandError::NotAnInteger)?;
                Some(usize::try_from(count).unwrap_or(0))
            }
            _ => return Err(CommandError::SyntaxError),
        };

        Ok(Self {
            key: key.clone(),
            start: StreamId::parse_range_start(start)?,
            end: StreamId::parse_range_end(end)?,
            count,
        })
    }
}

/// Handles the XRANGE command.
///
/// Replies with the entries whose ids fall between start and end, both
/// inclusive, in id order. A missing key gives an empty array.
///
/// # Examples
///
/// ```ignore
/// // XADD s 1-1 a 1
/// // XRANGE s - +
/// // Returns: "*1\r\n*2\r\n$3\r\n1-1\r\n*2\r\n$1\r\na\r\n$1\r\n1\r\n"
/// ```
pub fn xrange(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let xrange_arguments = XrangeArguments::parse(arguments)?;

    let entries = context.store.stream_range(
        &xrange_arguments.key,
        xrange_arguments.start,
        xrange_arguments.end,
        xrange_arguments.count,
    )?;

    Ok(CommandResult::Response(stream_entries_to_resp(entries)))
}
