use std::{collections::HashMap, sync::OnceLock};

use crate::{
    commands::{
        command_error::CommandError,
        config::config,
        del::del,
        echo::echo,
        get::get,
        incr::incr,
        info::info,
        keys::keys,
        llen::llen,
        lpop::{lpop, rpop},
        lrange::lrange,
        ping::ping,
        rpush_and_lpush::{lpush, rpush},
        save::save,
        set::set,
        type_command::type_command,
        xadd::xadd,
        xlen::xlen,
        xrange::xrange,
        xread::{xread, BlockedRead},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
    server::RedisServer,
};

/// What running a command produced.
#[derive(Debug)]
pub enum CommandResult {
    Response(RespValue),
    /// XREAD BLOCK found nothing yet. The caller must release its locks and
    /// wait on the returned registration.
    Blocked(BlockedRead),
}

/// Everything a handler may touch. Built while the caller holds the server
/// config lock and then the store lock.
pub struct CommandContext<'a> {
    pub store: &'a mut KeyValueStore,
    pub server: &'a mut RedisServer,
    /// False inside EXEC, where a blocking read must answer immediately.
    pub blocking_allowed: bool,
}

pub type CommandFn = fn(&mut CommandContext<'_>, &[String]) -> Result<CommandResult, CommandError>;

/// Number of arguments a command accepts, not counting its name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(min, max) => (min..=max).contains(&count),
        }
    }
}

pub struct CommandSpec {
    pub arity: Arity,
    pub handler: CommandFn,
}

static COMMAND_TABLE: OnceLock<HashMap<&'static str, CommandSpec>> = OnceLock::new();

fn command_table() -> &'static HashMap<&'static str, CommandSpec> {
    COMMAND_TABLE.get_or_init(|| {
        let commands: [(&'static str, Arity, CommandFn); 22] = [
            ("PING", Arity::Between(0, 1), ping),
            ("ECHO", Arity::Exact(1), echo),
            ("SET", Arity::AtLeast(2), set),
            ("GET", Arity::Exact(1), get),
            ("DEL", Arity::AtLeast(1), del),
            ("DELETE", Arity::AtLeast(1), del),
            ("KEYS", Arity::Exact(1), keys),
            ("TYPE", Arity::Exact(1), type_command),
            ("INCR", Arity::Exact(1), incr),
            ("LPUSH", Arity::AtLeast(2), lpush),
            ("RPUSH", Arity::AtLeast(2), rpush),
            ("LPOP", Arity::Between(1, 2), lpop),
            ("RPOP", Arity::Between(1, 2), rpop),
            ("LLEN", Arity::Exact(1), llen),
            ("LRANGE", Arity::Exact(3), lrange),
            ("XADD", Arity::AtLeast(4), xadd),
            ("XLEN", Arity::Exact(1), xlen),
            ("XRANGE", Arity::AtLeast(3), xrange),
            ("XREAD", Arity::AtLeast(3), xread),
            ("CONFIG", Arity::AtLeast(1), config),
            ("SAVE", Arity::Exact(0), save),
            ("INFO", Arity::Between(0, 1), info),
        ];

        commands
            .into_iter()
            .map(|(name, arity, handler)| (name, CommandSpec { arity, handler }))
            .collect()
    })
}

/// A request decoded into an upper-cased command name and its arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    /// Builds a command from a decoded request. Only a non-empty array of
    /// bulk strings is a valid request.
    pub fn new(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommand);
        };

        let mut parts = Vec::with_capacity(elements.len());

        for element in elements {
            match element {
                RespValue::BulkString(s) => parts.push(s),
                _ => return Err(CommandError::InvalidCommand),
            }
        }

        if parts.is_empty() {
            return Err(CommandError::InvalidCommand);
        }

        let name = parts.remove(0).to_uppercase();

        Ok(Self {
            name,
            arguments: parts,
        })
    }

    /// Looks the command up, checks its arity and runs it. Nothing is touched
    /// when the lookup or the arity check fails.
    pub fn execute(&self, context: &mut CommandContext<'_>) -> Result<CommandResult, CommandError> {
        let Some(spec) = command_table().get(self.name.as_str()) else {
            return Err(CommandError::UnknownCommand(self.name.to_lowercase()));
        };

        if !spec.arity.accepts(self.arguments.len()) {
            return Err(CommandError::WrongNumberOfArguments(self.name.to_lowercase()));
        }

        (spec.handler)(context, &self.arguments)
    }

    /// Runs the command and renders any error as the reply.
    pub fn execute_to_result(&self, context: &mut CommandContext<'_>) -> CommandResult {
        match self.execute(context) {
            Ok(result) => result,
            Err(e) => CommandResult::Response(e.as_resp()),
        }
    }
}
