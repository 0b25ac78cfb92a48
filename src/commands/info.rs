use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    resp::RespValue,
};

#[derive(Debug, PartialEq)]
enum InfoSection {
    Default,
    Server,
    Replication,
    Keyspace,
    Unknown,
}

pub struct InfoArguments {
    section: InfoSection,
}

impl InfoArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let section = match arguments {
            [] => InfoSection::Default,
            [section] => match section.to_lowercase().as_str() {
                "default" | "all" | "everything" => InfoSection::Default,
                "server" => InfoSection::Server,
                "replication" => InfoSection::Replication,
                "keyspace" => InfoSection::Keyspace,
                _ => InfoSection::Unknown,
            },
            _ => return Err(CommandError::WrongNumberOfArguments("info".to_string())),
        };

        Ok(InfoArguments { section })
    }
}

/// Handles the INFO command.
///
/// Replies with a bulk string of `# Section` headers followed by `field:value`
/// lines. An unknown section gives an empty bulk string.
pub fn info(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let info_arguments = InfoArguments::parse(arguments)?;

    let server = vec![
        "# Server".to_string(),
        format!("respkv_version:{}", env!("CARGO_PKG_VERSION")),
        format!("tcp_port:{}", context.server.port),
    ];

    let replication = vec!["# Replication".to_string(), "role:master".to_string()];

    let key_count = context.store.keys().len();
    let mut keyspace = vec!["# Keyspace".to_string()];
    if key_count > 0 {
        keyspace.push(format!("db0:keys={}", key_count));
    }

    let sections = match info_arguments.section {
        InfoSection::Default => vec![server, replication, keyspace],
        InfoSection::Server => vec![server],
        InfoSection::Replication => vec![replication],
        InfoSection::Keyspace => vec![keyspace],
        InfoSection::Unknown => vec![],
    };

    let body = sections
        .into_iter()
        .map(|lines| format!("{}\r\n", lines.join("\r\n")))
        .collect::<Vec<String>>()
        .join("\r\n");

    Ok(CommandResult::Response(RespValue::BulkString(body)))
}
