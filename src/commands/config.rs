use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
    server::RedisServer,
};

/// Parameters CONFIG GET and CONFIG SET know about.
const PARAMETERS: [&str; 3] = ["dir", "dbfilename", "port"];

fn get_parameter(server: &RedisServer, parameter: &str) -> Option<String> {
    match parameter {
        "dir" => Some(server.rdb_directory.clone()),
        "dbfilename" => Some(server.rdb_filename.clone()),
        "port" => Some(server.port.to_string()),
        _ => None,
    }
}

fn set_parameter(
    server: &mut RedisServer,
    parameter: &str,
    value: &str,
) -> Result<(), CommandError> {
    match parameter {
        "dir" => server.rdb_directory = value.to_string(),
        "dbfilename" => server.rdb_filename = value.to_string(),
        "port" => {
            server.port = value
                .parse::<u16>()
                .map_err(|_| CommandError::InvalidConfigValue(parameter.to_string()))?
        }
        _ => return Err(CommandError::UnsupportedConfigParameter(parameter.to_string())),
    }

    Ok(())
}

/// Handles `CONFIG GET <parameter>` and `CONFIG SET <parameter> <value>`.
///
/// GET replies with a flat `[name, value]` array, or an empty array for a
/// parameter it does not know. SET changes the value seen by later commands
/// such as SAVE. Changing `port` does not move the listener.
pub fn config(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let [subcommand, rest @ ..] = arguments else {
        return Err(CommandError::WrongNumberOfArguments("config".to_string()));
    };

    match subcommand.to_uppercase().as_str() {
        "GET" => {
            let [parameter] = rest else {
                return Err(CommandError::WrongNumberOfArguments("config|get".to_string()));
            };

            let parameter = parameter.to_lowercase();

            let response = match get_parameter(context.server, &parameter) {
                Some(value) => RespValue::bulk_string_array([parameter, value]),
                None => RespValue::Array(Vec::new()),
            };

            Ok(CommandResult::Response(response))
        }
        "SET" => {
            let [parameter, value] = rest else {
                return Err(CommandError::WrongNumberOfArguments("config|set".to_string()));
            };

            let parameter = parameter.to_lowercase();

            if !PARAMETERS.contains(&parameter.as_str()) {
                return Err(CommandError::UnsupportedConfigParameter(parameter));
            }

            set_parameter(context.server, &parameter, value)?;

            Ok(CommandResult::Response(RespValue::ok()))
        }
        _ => Err(CommandError::UnknownConfigSubcommand(subcommand.clone())),
    }
}
