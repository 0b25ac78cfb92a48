use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{
    commands::{CommandContext, CommandHandler, CommandResult},
    key_value_store::KeyValueStore,
    resp::RespValue,
    server::RedisServer,
    transaction::TransactionState,
};

/// Errors from misusing MULTI, EXEC and DISCARD.
#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
    #[error("ERR MULTI calls can not be nested")]
    NestedMulti,
    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,
    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,
}

impl DispatchError {
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error(self.to_string())
    }
}

/// Represents the result of dispatching a command.
///
/// This enum distinguishes between immediate responses (such as "OK" or "QUEUED"),
/// execution of a single command, and execution of a batch of commands in a transaction.
#[derive(Debug, PartialEq)]
pub enum DispatchResult {
    /// A reply that needs neither the store nor the server config.
    ImmediateResponse(RespValue),
    /// The commands of a transaction, to be run back to back.
    ExecuteTransactionCommands(Vec<CommandHandler>),
    /// A single command to be executed immediately.
    ExecuteSingleCommand(CommandHandler),
}

impl DispatchResult {
    /// Runs whatever the dispatcher decided on.
    ///
    /// The server config lock is taken before the store lock and both are held
    /// until the command, or the whole transaction, has run. Only a single
    /// command may come back as [`CommandResult::Blocked`]; inside a
    /// transaction blocking is switched off.
    pub async fn handle_dispatch_result(
        self,
        server: &RwLock<RedisServer>,
        store: &Mutex<KeyValueStore>,
    ) -> CommandResult {
        match self {
            DispatchResult::ImmediateResponse(response) => CommandResult::Response(response),
            DispatchResult::ExecuteSingleCommand(command) => {
                let mut server_guard = server.write().await;
                let mut store_guard = store.lock().await;

                let mut context = CommandContext {
                    store: &mut store_guard,
                    server: &mut server_guard,
                    blocking_allowed: true,
                };

                command.execute_to_result(&mut context)
            }
            DispatchResult::ExecuteTransactionCommands(commands) => {
                let mut server_guard = server.write().await;
                let mut store_guard = store.lock().await;

                let mut context = CommandContext {
                    store: &mut store_guard,
                    server: &mut server_guard,
                    blocking_allowed: false,
                };

                let mut responses = Vec::with_capacity(commands.len());

                for command in commands {
                    let response = match command.execute_to_result(&mut context) {
                        CommandResult::Response(response) => response,
                        CommandResult::Blocked(blocked) => {
                            context
                                .store
                                .stream_waiters
                                .unsubscribe(blocked.subscription_id());
                            RespValue::NullArray
                        }
                    };

                    responses.push(response);
                }

                CommandResult::Response(RespValue::Array(responses))
            }
        }
    }
}

/// Routes one connection's commands through its transaction state.
///
/// MULTI, EXEC and DISCARD are handled here and never reach the command
/// table. While a transaction is open every other command is queued without
/// being looked up, so unknown commands and arity errors show up in the EXEC
/// reply.
#[derive(Debug)]
pub struct CommandDispatcher {
    pub client_address: String,
    transaction: TransactionState,
}

impl CommandDispatcher {
    pub fn new(client_address: &str) -> Self {
        CommandDispatcher {
            client_address: client_address.to_string(),
            transaction: TransactionState::Normal,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_queuing()
    }

    /// Decides what to do with a command.
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchResult)` - What the connection must run or reply
    /// * `Err(DispatchError)` - MULTI inside a transaction, or EXEC/DISCARD outside one
    pub fn dispatch_command(
        &mut self,
        command: CommandHandler,
    ) -> Result<DispatchResult, DispatchError> {
        match command.name.as_str() {
            "MULTI" => {
                if !self.transaction.begin() {
                    return Err(DispatchError::NestedMulti);
                }

                debug!(client = %self.client_address, "transaction started");
                Ok(DispatchResult::ImmediateResponse(RespValue::ok()))
            }
            "EXEC" => {
                let Some(queue) = self.transaction.finish() else {
                    return Err(DispatchError::ExecWithoutMulti);
                };

                debug!(client = %self.client_address, commands = queue.len(), "transaction executed");

                if queue.is_empty() {
                    Ok(DispatchResult::ImmediateResponse(RespValue::Array(Vec::new())))
                } else {
                    Ok(DispatchResult::ExecuteTransactionCommands(queue))
                }
            }
            "DISCARD" => {
                if self.transaction.finish().is_none() {
                    return Err(DispatchError::DiscardWithoutMulti);
                }

                Ok(DispatchResult::ImmediateResponse(RespValue::ok()))
            }
            _ => match self.transaction.queue(command) {
                Ok(()) => Ok(DispatchResult::ImmediateResponse(RespValue::SimpleString(
                    "QUEUED".to_string(),
                ))),
                Err(command) => Ok(DispatchResult::ExecuteSingleCommand(command)),
            },
        }
    }
}
