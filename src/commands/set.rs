use std::time::Duration;

use jiff::Timestamp;

use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

/// Represents the parsed arguments for the SET command.
#[derive(Debug, PartialEq)]
pub struct SetArguments {
    /// The key name to store the value under
    key: String,
    /// The value to be stored under the given key
    value: String,
    /// Time to live of the key value pair
    ttl: Option<Duration>,
}

impl SetArguments {
    /// Parses command arguments into a SetArguments structure.
    ///
    /// # Arguments
    ///
    /// * `arguments` - Either `[key, value]` or `[key, value, PX|EX, amount]`
    ///
    /// # Returns
    ///
    /// * `Ok(SetArguments)` - The key, the value and the optional time to live
    /// * `Err(CommandError::SyntaxError)` - Unknown option, repeated option or missing amount
    /// * `Err(CommandError::NotAnInteger)` - If the amount is not an integer
    /// * `Err(CommandError::InvalidExpireTime)` - If the amount is zero, negative, or
    ///   would put the deadline past the largest representable Unix time in milliseconds
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = SetArguments::parse(&["mykey".into(), "hello".into(), "px".into(), "1000".into()]);
    /// // Returns: Ok(SetArguments { key: "mykey", value: "hello", ttl: Some(1s) })
    /// ```
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let [key, value, options @ ..] = arguments else {
            return Err(CommandError::WrongNumberOfArguments("set".to_string()));
        };

        let ttl = match options {
            [] => None,
            [unit, amount] => {
                let unit_ms: i64 = match unit.to_uppercase().as_str() {
                    "PX" => 1,
                    "EX" => 1000,
                    _ => return Err(CommandError::SyntaxError),
                };

                let amount = amount
                    .parse::<i64>()
                    .map_err(|_| CommandError::NotAnInteger)?;

                let invalid_expire_time = || CommandError::InvalidExpireTime("set".to_string());

                if amount <= 0 {
                    return Err(invalid_expire_time());
                }

                let ttl_ms = amount.checked_mul(unit_ms).ok_or_else(invalid_expire_time)?;

                if ttl_ms > i64::MAX - Timestamp::now().as_millisecond() {
                    return Err(invalid_expire_time());
                }

                Some(Duration::from_millis(ttl_ms as u64))
            }
            _ => return Err(CommandError::SyntaxError),
        };

        Ok(Self {
            key: key.clone(),
            value: value.clone(),
            ttl,
        })
    }
}

/// Handles the SET command.
///
/// Stores a string under a key, replacing whatever value and type the key
/// held before. The TTL is set from the PX/EX option or cleared without one.
pub fn set(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;

    context
        .store
        .set(&set_arguments.key, &set_arguments.value, set_arguments.ttl);

    Ok(CommandResult::Response(RespValue::ok()))
}
