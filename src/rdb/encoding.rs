use std::collections::VecDeque;

use crate::{
    rdb::{
        get_slice::{get_buffer_array, get_buffer_slice},
        PersistenceError,
    },
    stream::{Stream, StreamFields, StreamId},
};

#[derive(Debug, PartialEq)]
enum ValueEncoding {
    Length(usize),
    Int8,
    Int16,
    Int32,
    LzfCompressedString,
}

fn parse_length_encoding(
    bytes: &[u8],
    cursor: usize,
) -> Result<(ValueEncoding, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let [byte] = get_buffer_array::<1>(bytes, temp_cursor)?;
    temp_cursor += 1;

    // The two most significant bits select the encoding.
    let value_encoding = match byte >> 6 {
        0b00 => ValueEncoding::Length((byte & 0b0011_1111) as usize),
        0b01 => {
            // 14 bit length: low 6 bits of this byte, then the next byte.
            let [lower_8_bits] = get_buffer_array::<1>(bytes, temp_cursor)?;
            temp_cursor += 1;

            let high_6_bits = ((byte & 0b0011_1111) as usize) << 8;
            ValueEncoding::Length(high_6_bits | lower_8_bits as usize)
        }
        0b10 => match byte {
            0x80 => {
                let length = u32::from_be_bytes(get_buffer_array::<4>(bytes, temp_cursor)?);
                temp_cursor += 4;

                ValueEncoding::Length(length as usize)
            }
            0x81 => {
                let length = u64::from_be_bytes(get_buffer_array::<8>(bytes, temp_cursor)?);
                temp_cursor += 8;

                let length = usize::try_from(length)
                    .map_err(|_| PersistenceError::InvalidLengthEncoding(byte))?;
                ValueEncoding::Length(length)
            }
            _ => return Err(PersistenceError::InvalidLengthEncoding(byte)),
        },
        _ => match byte & 0b0011_1111 {
            0 => ValueEncoding::Int8,
            1 => ValueEncoding::Int16,
            2 => ValueEncoding::Int32,
            3 => ValueEncoding::LzfCompressedString,
            _ => return Err(PersistenceError::InvalidLengthEncoding(byte)),
        },
    };

    Ok((value_encoding, temp_cursor - cursor))
}

/// Parses a length-encoded integer, as used for sizes and database numbers.
pub fn parse_length(bytes: &[u8], cursor: usize) -> Result<(usize, usize), PersistenceError> {
    match parse_length_encoding(bytes, cursor)? {
        (ValueEncoding::Length(length), bytes_read) => Ok((length, bytes_read)),
        _ => {
            let byte = bytes.get(cursor).copied().unwrap_or_default();
            Err(PersistenceError::InvalidLengthEncoding(byte))
        }
    }
}

/// Parses a string, which is either length-prefixed or an integer stored in
/// 1, 2 or 4 little-endian bytes.
pub fn parse_value(bytes: &[u8], cursor: usize) -> Result<(String, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let (value_encoding, length_cursor) = parse_length_encoding(bytes, temp_cursor)?;
    temp_cursor += length_cursor;

    let value = match value_encoding {
        ValueEncoding::Length(length) => {
            let byte_slice = get_buffer_slice(bytes, temp_cursor, length)?;
            temp_cursor += length;

            String::from_utf8(byte_slice.to_vec()).map_err(|_| PersistenceError::InvalidUtf8)?
        }
        ValueEncoding::Int8 => {
            let value = i8::from_le_bytes(get_buffer_array::<1>(bytes, temp_cursor)?);
            temp_cursor += 1;

            value.to_string()
        }
        ValueEncoding::Int16 => {
            let value = i16::from_le_bytes(get_buffer_array::<2>(bytes, temp_cursor)?);
            temp_cursor += 2;

            value.to_string()
        }
        ValueEncoding::Int32 => {
            let value = i32::from_le_bytes(get_buffer_array::<4>(bytes, temp_cursor)?);
            temp_cursor += 4;

            value.to_string()
        }
        ValueEncoding::LzfCompressedString => return Err(PersistenceError::CompressedString),
    };

    Ok((value, temp_cursor - cursor))
}

/// Appends `length` using the shortest length encoding that fits.
pub fn write_length(buffer: &mut Vec<u8>, length: usize) {
    if length < 1 << 6 {
        buffer.push(length as u8);
    } else if length < 1 << 14 {
        buffer.push(0b0100_0000 | (length >> 8) as u8);
        buffer.push((length & 0xFF) as u8);
    } else if let Ok(length) = u32::try_from(length) {
        buffer.push(0x80);
        buffer.extend_from_slice(&length.to_be_bytes());
    } else {
        buffer.push(0x81);
        buffer.extend_from_slice(&(length as u64).to_be_bytes());
    }
}

/// Appends `value` as a length-prefixed string.
pub fn write_value(buffer: &mut Vec<u8>, value: &str) {
    write_length(buffer, value.len());
    buffer.extend_from_slice(value.as_bytes());
}

/// Parses a list: its length, then every element as a string.
pub fn parse_list(
    bytes: &[u8],
    cursor: usize,
) -> Result<(VecDeque<String>, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let (length, length_cursor) = parse_length(bytes, temp_cursor)?;
    temp_cursor += length_cursor;

    let mut list = VecDeque::new();

    for _ in 0..length {
        let (element, element_cursor) = parse_value(bytes, temp_cursor)?;
        temp_cursor += element_cursor;
        list.push_back(element);
    }

    Ok((list, temp_cursor - cursor))
}

pub fn write_list(buffer: &mut Vec<u8>, list: &VecDeque<String>) {
    write_length(buffer, list.len());

    for element in list {
        write_value(buffer, element);
    }
}

fn parse_stream_id(bytes: &[u8], cursor: usize) -> Result<(StreamId, usize), PersistenceError> {
    let (id, id_cursor) = parse_value(bytes, cursor)?;
    let id = id
        .parse::<StreamId>()
        .map_err(|_| PersistenceError::InvalidStreamId(id))?;

    Ok((id, id_cursor))
}

/// Parses a stream: the last id, the number of entries, then each entry as
/// its id, its number of field pairs and the pairs themselves.
pub fn parse_stream(bytes: &[u8], cursor: usize) -> Result<(Stream, usize), PersistenceError> {
    let mut temp_cursor = cursor;
    let (last_id, last_id_cursor) = parse_stream_id(bytes, temp_cursor)?;
    temp_cursor += last_id_cursor;
    let (entry_count, count_cursor) = parse_length(bytes, temp_cursor)?;
    temp_cursor += count_cursor;

    let mut entries = Vec::new();

    for _ in 0..entry_count {
        let (id, id_cursor) = parse_stream_id(bytes, temp_cursor)?;
        temp_cursor += id_cursor;
        let (field_count, field_count_cursor) = parse_length(bytes, temp_cursor)?;
        temp_cursor += field_count_cursor;

        let mut fields: StreamFields = Vec::new();

        for _ in 0..field_count {
            let (field, field_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += field_cursor;
            let (value, value_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += value_cursor;

            fields.push((field, value));
        }

        entries.push((id, fields));
    }

    Ok((Stream::from_entries(entries, last_id), temp_cursor - cursor))
}

pub fn write_stream(buffer: &mut Vec<u8>, stream: &Stream) {
    write_value(buffer, &stream.last_id().to_string());
    write_length(buffer, stream.len());

    for (id, fields) in stream.entries() {
        write_value(buffer, &id.to_string());
        write_length(buffer, fields.len());

        for (field, value) in fields {
            write_value(buffer, field);
            write_value(buffer, value);
        }
    }
}
