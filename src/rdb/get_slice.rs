use crate::rdb::PersistenceError;

pub fn get_buffer_slice(buffer: &[u8], cursor: usize, len: usize) -> Result<&[u8], PersistenceError> {
    let end = cursor
        .checked_add(len)
        .ok_or(PersistenceError::UnexpectedEof)?;

    buffer
        .get(cursor..end)
        .ok_or(PersistenceError::UnexpectedEof)
}

/// Reads exactly `N` bytes starting at `cursor`.
pub fn get_buffer_array<const N: usize>(
    buffer: &[u8],
    cursor: usize,
) -> Result<[u8; N], PersistenceError> {
    get_buffer_slice(buffer, cursor, N)?
        .try_into()
        .map_err(|_| PersistenceError::UnexpectedEof)
}
