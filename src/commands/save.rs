use tracing::info;

use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
    },
    rdb::Persistence,
    resp::RespValue,
};

/// Handles the SAVE command.
///
/// Writes a snapshot of the keyspace to `<dir>/<dbfilename>` synchronously,
/// while every other client waits on the store lock.
pub fn save(
    context: &mut CommandContext<'_>,
    _arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let snapshot = context.store.snapshot();
    let persistence = context.server.persistence();

    persistence
        .persist(&snapshot)
        .map_err(|e| CommandError::Persistence(e.to_string()))?;

    info!(
        keys = snapshot.entries.len(),
        path = %persistence.path().display(),
        "snapshot saved"
    );

    Ok(CommandResult::Response(RespValue::ok()))
}
