use crate::{
    resp::RespValue,
    stream::{StreamFields, StreamId},
};

/// Converts stream entries to RESP array format.
///
/// Each entry becomes a 2-element array: `[id, [field1, value1, field2, value2, ...]]`,
/// with fields in the order they were added.
///
/// # Examples
///
/// ```ignore
/// let entries = vec![(StreamId::new(1234, 0), vec![("temp".into(), "25".into())])];
/// let result = stream_entries_to_resp(entries);
/// // Encodes to: "*1\r\n*2\r\n$6\r\n1234-0\r\n*2\r\n$4\r\ntemp\r\n$2\r\n25\r\n"
/// ```
pub fn stream_entries_to_resp(entries: Vec<(StreamId, StreamFields)>) -> RespValue {
    RespValue::Array(
        entries
            .into_iter()
            .map(|(id, fields)| {
                let values = fields
                    .into_iter()
                    .flat_map(|(field, value)| [field, value]);

                RespValue::Array(vec![
                    RespValue::BulkString(id.to_string()),
                    RespValue::bulk_string_array(values),
                ])
            })
            .collect(),
    )
}
