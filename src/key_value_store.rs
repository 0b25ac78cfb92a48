//! The shared keyspace.
//!
//! Every operation resolves lazy expiration first, so an entry whose deadline
//! has passed is indistinguishable from a missing one and is removed on the
//! first access after it expires.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use jiff::Timestamp;
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    stream::{Stream, StreamFields, StreamId, StreamIdSpec},
    stream_waiters::StreamWaiters,
};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("{0}")]
    InvalidStreamId(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(String),
    List(VecDeque<String>),
    Stream(Stream),
}

impl DataType {
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::List(_) => "list",
            DataType::Stream(_) => "stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    pub expiration: Option<Instant>,
}

impl Value {
    fn is_expired(&self, now: Instant) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListSide {
    Left,
    Right,
}

/// A point-in-time copy of every live key, with absolute expiry, handed to
/// the persistence layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: DataType,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: HashMap<String, Value>,
    pub stream_waiters: StreamWaiters,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_entry(&mut self, key: &str) -> Option<&mut Value> {
        let now = Instant::now();

        if self.entries.get(key).is_some_and(|value| value.is_expired(now)) {
            self.entries.remove(key);
            return None;
        }

        self.entries.get_mut(key)
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, value| !value.is_expired(now));
    }

    /// Raw access to an entry after expiry has been resolved.
    pub fn get_value(&mut self, key: &str) -> Option<&Value> {
        self.live_entry(key).map(|value| &*value)
    }

    /// A TTL too large for the monotonic clock leaves the key without a
    /// deadline.
    pub fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) {
        self.entries.insert(
            key.to_string(),
            Value {
                data: DataType::String(value.to_string()),
                expiration: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
            },
        );
    }

    pub fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        match self.live_entry(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::String(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.live_entry(key).is_some() && self.entries.remove(key).is_some()
    }

    /// Increments the integer stored at `key`, creating it with 1 when absent.
    /// An existing TTL is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64, StoreError> {
        let Some(value) = self.live_entry(key) else {
            self.set(key, "1", None);
            return Ok(1);
        };

        let DataType::String(ref mut s) = value.data else {
            return Err(StoreError::WrongType);
        };

        let next = s
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or(StoreError::NotAnInteger)?;

        *s = next.to_string();

        Ok(next)
    }

    fn list_mut(&mut self, key: &str) -> Result<Option<&mut VecDeque<String>>, StoreError> {
        match self.live_entry(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::List(list),
                ..
            }) => Ok(Some(list)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Pushes `values` one at a time, so LPUSH of `a b c` leaves `c b a` at
    /// the head. Returns the new length.
    pub fn list_push(
        &mut self,
        key: &str,
        side: ListSide,
        values: &[String],
    ) -> Result<usize, StoreError> {
        if self.list_mut(key)?.is_none() {
            self.entries.insert(
                key.to_string(),
                Value {
                    data: DataType::List(VecDeque::new()),
                    expiration: None,
                },
            );
        }

        let list = self.list_mut(key)?.ok_or(StoreError::WrongType)?;

        for value in values {
            match side {
                ListSide::Left => list.push_front(value.clone()),
                ListSide::Right => list.push_back(value.clone()),
            }
        }

        Ok(list.len())
    }

    /// Removes up to `count` elements. An emptied list is deleted.
    pub fn list_pop(
        &mut self,
        key: &str,
        side: ListSide,
        count: usize,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let Some(list) = self.list_mut(key)? else {
            return Ok(None);
        };

        let len = list.len();
        let count = count.min(len);
        let popped: Vec<String> = match side {
            ListSide::Left => list.drain(..count).collect(),
            ListSide::Right => {
                let mut popped: Vec<String> = list.drain(len - count..).collect();
                popped.reverse();
                popped
            }
        };

        if list.is_empty() {
            self.entries.remove(key);
        }

        Ok(Some(popped))
    }

    pub fn list_len(&mut self, key: &str) -> Result<usize, StoreError> {
        Ok(self.list_mut(key)?.map_or(0, |list| list.len()))
    }

    /// Elements between `start` and `stop` inclusive. Negative indexes count
    /// from the end and both ends are clamped to the list.
    pub fn list_range(
        &mut self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let Some(list) = self.list_mut(key)? else {
            return Ok(Vec::new());
        };

        let Some((start, stop)) = validate_range_indexes(list.len(), start, stop) else {
            return Ok(Vec::new());
        };

        Ok(list.range(start..=stop).cloned().collect())
    }

    fn stream_ref(&mut self, key: &str) -> Result<Option<&Stream>, StoreError> {
        match self.live_entry(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::Stream(stream),
                ..
            }) => Ok(Some(&*stream)),
            Some(_) => Err(StoreError::WrongType),
        }
    }

    /// Appends an entry and wakes readers blocked on `key`.
    pub fn stream_append(
        &mut self,
        key: &str,
        spec: StreamIdSpec,
        fields: StreamFields,
    ) -> Result<StreamId, StoreError> {
        let now_ms = u64::try_from(Timestamp::now().as_millisecond()).unwrap_or(0);

        let id = match self.live_entry(key) {
            Some(Value {
                data: DataType::Stream(stream),
                ..
            }) => stream
                .append(spec, fields, now_ms)
                .map_err(StoreError::InvalidStreamId)?,
            Some(_) => return Err(StoreError::WrongType),
            None => {
                let mut stream = Stream::new();
                let id = stream
                    .append(spec, fields, now_ms)
                    .map_err(StoreError::InvalidStreamId)?;

                self.entries.insert(
                    key.to_string(),
                    Value {
                        data: DataType::Stream(stream),
                        expiration: None,
                    },
                );

                id
            }
        };

        self.stream_waiters.notify(key);

        Ok(id)
    }

    pub fn stream_range(
        &mut self,
        key: &str,
        start: StreamId,
        end: StreamId,
        count: Option<usize>,
    ) -> Result<Vec<(StreamId, StreamFields)>, StoreError> {
        Ok(self
            .stream_ref(key)?
            .map(|stream| stream.range(start, end, count))
            .unwrap_or_default())
    }

    pub fn stream_read_after(
        &mut self,
        key: &str,
        id: StreamId,
        count: Option<usize>,
    ) -> Result<Vec<(StreamId, StreamFields)>, StoreError> {
        Ok(self
            .stream_ref(key)?
            .map(|stream| stream.read_after(id, count))
            .unwrap_or_default())
    }

    pub fn stream_len(&mut self, key: &str) -> Result<usize, StoreError> {
        Ok(self.stream_ref(key)?.map_or(0, Stream::len))
    }

    /// Last id of the stream at `key`, `0-0` when the key is missing.
    pub fn last_stream_id(&mut self, key: &str) -> Result<StreamId, StoreError> {
        Ok(self
            .stream_ref(key)?
            .map_or(StreamId::MIN, Stream::last_id))
    }

    pub fn type_of(&mut self, key: &str) -> Option<&'static str> {
        self.live_entry(key).map(|value| value.data.type_name())
    }

    pub fn keys(&mut self) -> Vec<String> {
        self.purge_expired();

        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn snapshot(&mut self) -> Snapshot {
        self.purge_expired();

        let now = Instant::now();
        let wall_clock_ms = Timestamp::now().as_millisecond();

        let mut entries: Vec<SnapshotEntry> = self
            .entries
            .iter()
            .map(|(key, value)| SnapshotEntry {
                key: key.clone(),
                value: value.data.clone(),
                expires_at: value
                    .expiration
                    .map(|expiration| absolute_expiry(expiration, now, wall_clock_ms)),
            })
            .collect();

        entries.sort_by(|a, b| a.key.cmp(&b.key));

        Snapshot { entries }
    }

    /// Loads `snapshot` on top of the current keys, skipping entries whose
    /// absolute expiry is already in the past.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let now = Instant::now();
        let wall_clock_ms = Timestamp::now().as_millisecond();

        for entry in snapshot.entries {
            let expiration = match entry.expires_at {
                Some(expires_at) => {
                    let remaining = expires_at.as_millisecond().saturating_sub(wall_clock_ms);

                    if remaining <= 0 {
                        continue;
                    }

                    now.checked_add(Duration::from_millis(remaining as u64))
                }
                None => None,
            };

            self.entries.insert(
                entry.key,
                Value {
                    data: entry.value,
                    expiration,
                },
            );
        }
    }
}

/// Converts a monotonic deadline into wall-clock time. Deadlines past the
/// last representable timestamp are clamped to it.
fn absolute_expiry(expiration: Instant, now: Instant, wall_clock_ms: i64) -> Timestamp {
    let remaining = expiration.saturating_duration_since(now).as_millis();
    let remaining = i64::try_from(remaining).unwrap_or(i64::MAX);

    Timestamp::from_millisecond(wall_clock_ms.saturating_add(remaining)).unwrap_or(Timestamp::MAX)
}

/// Normalizes LRANGE indexes against a list of `len` elements.
///
/// Returns `None` when the resulting range is empty.
pub fn validate_range_indexes(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }

    let len = len as i64;

    let normalize = |index: i64| if index < 0 { len + index } else { index };

    let start = normalize(start).max(0);
    let stop = normalize(stop).min(len - 1);

    if start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}
