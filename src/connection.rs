use std::sync::Arc;

use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::{Mutex, RwLock},
};
use tracing::{debug, instrument, warn};

use crate::{
    commands::{BlockedRead, CommandDispatcher, CommandHandler, CommandResult},
    input::{CommandReadError, RespReader},
    key_value_store::KeyValueStore,
    resp::RespValue,
    server::RedisServer,
};

#[instrument(name = "connection", skip(stream, server, store))]
pub async fn handle_client_connection(
    stream: TcpStream,
    client_address: String,
    server: Arc<RwLock<RedisServer>>,
    store: Arc<Mutex<KeyValueStore>>,
) {
    let (reader, writer) = stream.into_split();
    serve_client(reader, writer, &client_address, server, store).await;
}

/// Serves requests one at a time until the client goes away or sends
/// something that is not RESP.
pub async fn serve_client<R, W>(
    reader: R,
    mut writer: W,
    client_address: &str,
    server: Arc<RwLock<RedisServer>>,
    store: Arc<Mutex<KeyValueStore>>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = RespReader::new(reader);
    let mut dispatcher = CommandDispatcher::new(client_address);

    debug!("client connected");

    loop {
        let input = match reader.read_value().await {
            Ok(Some(input)) => input,
            Ok(None) => break,
            Err(CommandReadError::RespParseError(e)) => {
                warn!(error = %e, "protocol error");
                let _ = write_to_stream(&mut writer, &e.as_resp()).await;
                break;
            }
            Err(e @ CommandReadError::QueryBufferLimit(_)) => {
                warn!(error = %e, "closing client");
                break;
            }
            Err(e) => {
                debug!(error = %e, "read failed");
                break;
            }
        };

        let command = match CommandHandler::new(input) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "invalid request");
                let _ = write_to_stream(&mut writer, &e.as_resp()).await;
                break;
            }
        };

        debug!(command = %command.name, arguments = command.arguments.len(), "received command");

        let response = match dispatcher.dispatch_command(command) {
            Ok(dispatch_result) => {
                match dispatch_result.handle_dispatch_result(&server, &store).await {
                    CommandResult::Response(response) => response,
                    CommandResult::Blocked(blocked) => {
                        match wait_for_blocked_read(blocked, &mut reader, &store).await {
                            Some(response) => response,
                            None => break,
                        }
                    }
                }
            }
            Err(e) => e.as_resp(),
        };

        if let Err(e) = write_to_stream(&mut writer, &response).await {
            debug!(error = %e, "write failed");
            break;
        }
    }

    debug!("client disconnected");
}

/// Waits for a blocked XREAD while watching the socket.
///
/// Returns `None` when the client disconnects first, after removing its
/// registration. Bytes the client pipelines meanwhile stay buffered for
/// the next request.
async fn wait_for_blocked_read<R>(
    blocked: BlockedRead,
    reader: &mut RespReader<R>,
    store: &Arc<Mutex<KeyValueStore>>,
) -> Option<RespValue>
where
    R: AsyncRead + Unpin,
{
    let subscription_id = blocked.subscription_id();
    let wait = blocked.wait(Arc::clone(store));
    tokio::pin!(wait);

    loop {
        tokio::select! {
            response = &mut wait => return Some(response),
            read = reader.read_more() => match read {
                Ok(0) | Err(_) => {
                    store.lock().await.stream_waiters.unsubscribe(subscription_id);
                    debug!(subscription = subscription_id, "client left while blocked");
                    return None;
                }
                Ok(_) => continue,
            },
        }
    }
}

async fn write_to_stream<W>(writer: &mut W, response: &RespValue) -> tokio::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(response.encode().as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}
