//! Per-connection MULTI/EXEC state.

use crate::commands::CommandHandler;

/// Where a connection is in the MULTI/EXEC lifecycle.
#[derive(Debug, Default, PartialEq)]
pub enum TransactionState {
    #[default]
    Normal,
    /// Commands received after MULTI, kept verbatim until EXEC or DISCARD.
    Queuing(Vec<CommandHandler>),
}

impl TransactionState {
    pub fn is_queuing(&self) -> bool {
        matches!(self, TransactionState::Queuing(_))
    }

    /// Enters queuing mode. Returns false, leaving the queue untouched, when
    /// a transaction is already open.
    pub fn begin(&mut self) -> bool {
        if self.is_queuing() {
            return false;
        }

        *self = TransactionState::Queuing(Vec::new());
        true
    }

    /// Appends a command to the open transaction. Hands the command back
    /// when no transaction is open.
    pub fn queue(&mut self, command: CommandHandler) -> Result<(), CommandHandler> {
        match self {
            TransactionState::Queuing(queue) => {
                queue.push(command);
                Ok(())
            }
            TransactionState::Normal => Err(command),
        }
    }

    /// Leaves queuing mode and returns the queued commands, or `None` when no
    /// transaction was open.
    pub fn finish(&mut self) -> Option<Vec<CommandHandler>> {
        match std::mem::take(self) {
            TransactionState::Queuing(queue) => Some(queue),
            TransactionState::Normal => None,
        }
    }
}
