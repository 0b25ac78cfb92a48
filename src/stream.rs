//! Append-only stream values and their entry identifiers.

use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

pub const ID_EQUAL_OR_SMALLER: &str =
    "ERR The ID specified in XADD is equal or smaller than the target stream top item";
pub const ID_NOT_GREATER_THAN_ZERO: &str = "ERR The ID specified in XADD must be greater than 0-0";

#[derive(Error, Debug, PartialEq)]
#[error("ERR Invalid stream ID specified as stream command argument")]
pub struct InvalidStreamId;

/// Identifier of a stream entry, ordered by milliseconds then sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }

    /// Parses `ms-seq`, or a bare `ms` whose sequence is filled with `missing_seq`.
    fn parse_with_default(input: &str, missing_seq: u64) -> Result<Self, InvalidStreamId> {
        match input.split_once('-') {
            Some((ms, seq)) => Ok(Self {
                ms: ms.parse().map_err(|_| InvalidStreamId)?,
                seq: seq.parse().map_err(|_| InvalidStreamId)?,
            }),
            None => Ok(Self {
                ms: input.parse().map_err(|_| InvalidStreamId)?,
                seq: missing_seq,
            }),
        }
    }

    /// Inclusive lower bound of a range query. `-` is the smallest id.
    pub fn parse_range_start(input: &str) -> Result<Self, InvalidStreamId> {
        if input == "-" {
            return Ok(Self::MIN);
        }

        Self::parse_with_default(input, 0)
    }

    /// Inclusive upper bound of a range query. `+` is the largest id.
    pub fn parse_range_end(input: &str) -> Result<Self, InvalidStreamId> {
        if input == "+" {
            return Ok(Self::MAX);
        }

        Self::parse_with_default(input, u64::MAX)
    }
}

impl FromStr for StreamId {
    type Err = InvalidStreamId;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default(input, 0)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// The id argument of XADD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamIdSpec {
    /// `*`
    Auto,
    /// `<ms>-*`
    AutoSequence(u64),
    /// `<ms>-<seq>`
    Explicit(StreamId),
}

impl FromStr for StreamIdSpec {
    type Err = InvalidStreamId;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "*" {
            return Ok(StreamIdSpec::Auto);
        }

        if let Some(ms) = input.strip_suffix("-*") {
            let ms = ms.parse::<u64>().map_err(|_| InvalidStreamId)?;
            return Ok(StreamIdSpec::AutoSequence(ms));
        }

        Ok(StreamIdSpec::Explicit(input.parse()?))
    }
}

pub type StreamFields = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stream {
    entries: BTreeMap<StreamId, StreamFields>,
    last_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a stream from its entries. The last id is never below the
    /// id of the last entry.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (StreamId, StreamFields)>,
        last_id: StreamId,
    ) -> Self {
        let entries: BTreeMap<StreamId, StreamFields> = entries.into_iter().collect();
        let last_id = entries
            .last_key_value()
            .map_or(last_id, |(id, _)| last_id.max(*id));

        Self { entries, last_id }
    }

    /// All entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = (&StreamId, &StreamFields)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_id(&self) -> StreamId {
        self.last_id
    }

    /// Resolves the id an append with `spec` would receive.
    ///
    /// `now_ms` is only consulted for `*`. Generated ids never go below the
    /// last id of the stream, even when the wall clock moves backwards.
    pub fn next_id(&self, spec: StreamIdSpec, now_ms: u64) -> Result<StreamId, &'static str> {
        let last = self.last_id;

        let id = match spec {
            StreamIdSpec::Auto => {
                let ms = now_ms.max(last.ms);
                self.next_in_millisecond(ms)?
            }
            StreamIdSpec::AutoSequence(ms) => {
                if ms < last.ms {
                    return Err(ID_EQUAL_OR_SMALLER);
                }
                self.next_in_millisecond(ms)?
            }
            StreamIdSpec::Explicit(id) => id,
        };

        if id == StreamId::MIN {
            return Err(ID_NOT_GREATER_THAN_ZERO);
        }

        if id <= last {
            return Err(ID_EQUAL_OR_SMALLER);
        }

        Ok(id)
    }

    fn next_in_millisecond(&self, ms: u64) -> Result<StreamId, &'static str> {
        if ms == self.last_id.ms {
            let seq = self
                .last_id
                .seq
                .checked_add(1)
                .ok_or(ID_EQUAL_OR_SMALLER)?;
            return Ok(StreamId::new(ms, seq));
        }

        Ok(StreamId::new(ms, if ms == 0 { 1 } else { 0 }))
    }

    pub fn append(
        &mut self,
        spec: StreamIdSpec,
        fields: StreamFields,
        now_ms: u64,
    ) -> Result<StreamId, &'static str> {
        let id = self.next_id(spec, now_ms)?;

        self.entries.insert(id, fields);
        self.last_id = id;

        Ok(id)
    }

    /// Entries with `start <= id <= end`, at most `count` of them.
    pub fn range(
        &self,
        start: StreamId,
        end: StreamId,
        count: Option<usize>,
    ) -> Vec<(StreamId, StreamFields)> {
        if start > end {
            return Vec::new();
        }

        self.entries
            .range(start..=end)
            .take(count.unwrap_or(usize::MAX))
            .map(|(id, fields)| (*id, fields.clone()))
            .collect()
    }

    /// Entries strictly after `id`, at most `count` of them.
    pub fn read_after(&self, id: StreamId, count: Option<usize>) -> Vec<(StreamId, StreamFields)> {
        use std::ops::Bound::{Excluded, Unbounded};

        self.entries
            .range((Excluded(id), Unbounded))
            .take(count.unwrap_or(usize::MAX))
            .map(|(id, fields)| (*id, fields.clone()))
            .collect()
    }
}
