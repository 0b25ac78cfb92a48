use std::{sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    time::{timeout_at, Instant},
};
use tracing::debug;

use crate::{
    commands::{
        command_error::CommandError,
        command_handler::{CommandContext, CommandResult},
        stream_utils::stream_entries_to_resp,
    },
    key_value_store::{KeyValueStore, StoreError},
    resp::RespValue,
    stream::StreamId,
    stream_waiters::Subscription,
};

/// Represents the parsed arguments for the XREAD command.
///
/// Format: `XREAD [COUNT n] [BLOCK milliseconds] STREAMS key1 key2 ... id1 id2 ...`
#[derive(Debug, PartialEq)]
pub struct XreadArguments {
    /// Maximum number of entries returned per stream.
    count: Option<usize>,
    /// Blocking duration. None for non-blocking operation.
    /// A zero duration means block indefinitely until data is available.
    blocking_duration: Option<Duration>,
    /// Vector of (key, stream_id) pairs where key is the stream name and
    /// stream_id is the raw id after which to start reading. `$` stands for
    /// the last id of the stream when the command runs.
    key_stream_pairs: Vec<(String, String)>,
}

impl XreadArguments {
    /// Parses command arguments into structured XreadArguments.
    ///
    /// # Returns
    ///
    /// * `Ok(XreadArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::SyntaxError)` - If an option is unknown or STREAMS is missing
    /// * `Err(CommandError::NotAnInteger)` - If COUNT is not a number
    /// * `Err(CommandError::InvalidTimeout)` - If BLOCK is not a non-negative number
    /// * `Err(CommandError::UnbalancedStreams)` - If keys and ids do not pair up
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // XREAD BLOCK 1000 STREAMS mystream $
    /// let args = XreadArguments::parse(&["BLOCK".into(), "1000".into(), "STREAMS".into(),
    ///     "mystream".into(), "$".into()])?;
    /// ```
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let mut count = None;
        let mut blocking_duration = None;
        let mut index = 0;

        let streams = loop {
            let Some(option) = arguments.get(index) else {
                return Err(CommandError::SyntaxError);
            };

            match option.to_uppercase().as_str() {
                "COUNT" => {
                    let value = arguments.get(index + 1).ok_or(CommandError::SyntaxError)?;
                    let value = value
                        .parse::<i64>()
                        .map_err(|_| CommandError::NotAnInteger)?;

                    count = Some(usize::try_from(value).unwrap_or(0));
                    index += 2;
                }
                "BLOCK" => {
                    let value = arguments.get(index + 1).ok_or(CommandError::SyntaxError)?;
                    let duration_ms = value
                        .parse::<u64>()
                        .map_err(|_| CommandError::InvalidTimeout)?;

                    blocking_duration = Some(Duration::from_millis(duration_ms));
                    index += 2;
                }
                "STREAMS" => break &arguments[index + 1..],
                _ => return Err(CommandError::SyntaxError),
            }
        };

        if streams.is_empty() || streams.len() % 2 != 0 {
            return Err(CommandError::UnbalancedStreams("xread".to_string()));
        }

        let (keys, ids) = streams.split_at(streams.len() / 2);

        Ok(Self {
            count,
            blocking_duration,
            key_stream_pairs: keys.iter().cloned().zip(ids.iter().cloned()).collect(),
        })
    }
}

/// Handles the XREAD command.
///
/// Replies with the entries after the given id of every stream that has
/// some, as `[[key, [entry, ...]], ...]`, or a null array when none has.
///
/// With BLOCK and nothing to return, the reader is registered on all of its
/// keys while the store lock is still held and [`CommandResult::Blocked`] is
/// returned, so no append can slip in between the check and the
/// registration. Inside a transaction blocking is not allowed and the null
/// array is returned straight away.
pub fn xread(
    context: &mut CommandContext<'_>,
    arguments: &[String],
) -> Result<CommandResult, CommandError> {
    let xread_arguments = XreadArguments::parse(arguments)?;

    let requests = resolve_stream_ids(context.store, xread_arguments.key_stream_pairs)?;

    if let Some(response) = read_streams(context.store, &requests, xread_arguments.count)? {
        return Ok(CommandResult::Response(response));
    }

    let Some(blocking_duration) = xread_arguments.blocking_duration else {
        return Ok(CommandResult::Response(RespValue::NullArray));
    };

    if !context.blocking_allowed {
        return Ok(CommandResult::Response(RespValue::NullArray));
    }

    let keys: Vec<String> = requests.iter().map(|(key, _)| key.clone()).collect();
    let subscription = context.store.stream_waiters.subscribe(&keys);

    let deadline = if blocking_duration.is_zero() {
        None
    } else {
        Some(Instant::now() + blocking_duration)
    };

    debug!(subscription = subscription.id, ?keys, "xread blocked");

    Ok(CommandResult::Blocked(BlockedRead {
        subscription,
        requests,
        count: xread_arguments.count,
        deadline,
    }))
}

/// Parses every id, resolving `$` to the current last id of its stream.
fn resolve_stream_ids(
    store: &mut KeyValueStore,
    key_stream_id_pairs: Vec<(String, String)>,
) -> Result<Vec<(String, StreamId)>, CommandError> {
    let mut requests = Vec::with_capacity(key_stream_id_pairs.len());

    for (key, stream_id) in key_stream_id_pairs {
        let id = if stream_id == "$" {
            store.last_stream_id(&key)?
        } else {
            stream_id.parse::<StreamId>()?
        };

        requests.push((key, id));
    }

    Ok(requests)
}

fn read_streams(
    store: &mut KeyValueStore,
    requests: &[(String, StreamId)],
    count: Option<usize>,
) -> Result<Option<RespValue>, StoreError> {
    let mut streams = Vec::new();

    for (key, id) in requests {
        let entries = store.stream_read_after(key, *id, count)?;

        if !entries.is_empty() {
            streams.push(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                stream_entries_to_resp(entries),
            ]));
        }
    }

    if streams.is_empty() {
        Ok(None)
    } else {
        Ok(Some(RespValue::Array(streams)))
    }
}

/// An XREAD that found nothing and is registered with the store's
/// [`StreamWaiters`](crate::stream_waiters::StreamWaiters).
#[derive(Debug)]
pub struct BlockedRead {
    subscription: Subscription,
    requests: Vec<(String, StreamId)>,
    count: Option<usize>,
    /// `None` blocks until an entry arrives.
    deadline: Option<Instant>,
}

impl BlockedRead {
    pub fn subscription_id(&self) -> u64 {
        self.subscription.id
    }

    /// Waits without holding the store lock until a matching entry arrives
    /// or the deadline passes.
    ///
    /// Every wake re-queries the store: another reader may have been woken
    /// by the same append, and the append may not match this reader's ids.
    /// On timeout the store is checked one last time before replying with a
    /// null array. The registration is removed whichever way this returns.
    pub async fn wait(mut self, store: Arc<Mutex<KeyValueStore>>) -> RespValue {
        loop {
            let signal = match self.deadline {
                Some(deadline) => timeout_at(deadline, self.subscription.receiver.recv())
                    .await
                    .unwrap_or(None),
                None => self.subscription.receiver.recv().await,
            };

            let mut store_guard = store.lock().await;

            let response = match read_streams(&mut store_guard, &self.requests, self.count) {
                Ok(Some(response)) => response,
                Ok(None) if signal.is_some() => continue,
                Ok(None) => RespValue::NullArray,
                Err(e) => CommandError::from(e).as_resp(),
            };

            store_guard.stream_waiters.unsubscribe(self.subscription.id);
            debug!(subscription = self.subscription.id, "xread unblocked");

            return response;
        }
    }
}
