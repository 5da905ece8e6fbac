//! Magic value and byte order negotiation.
//!
//! A TeaFile starts with the 64-bit value [`MAGIC_VALUE`] written in the
//! producer's byte order. Reading the first eight bytes as little-endian
//! yields [`MAGIC_VALUE`] for little-endian files and
//! [`MAGIC_VALUE_SWAPPED`] for big-endian files.

use std::io::Read;

use super::section::StreamReader;
use crate::error::{Result, TeaError};
use crate::types::ByteOrder;

/// Size of the magic value in bytes.
pub const MAGIC_LEN: u64 = 8;

/// Magic value as written by a little-endian producer.
pub const MAGIC_VALUE: i64 = 0x0d0e_0a04_0208_0500;

/// Magic value as seen when a big-endian file is read as little-endian.
pub const MAGIC_VALUE_SWAPPED: i64 = 0x0005_0802_040a_0e0d;

/// Determine the byte order from the first eight bytes.
#[must_use]
pub fn detect_byte_order(bytes: [u8; 8]) -> Option<ByteOrder> {
    match i64::from_le_bytes(bytes) {
        MAGIC_VALUE => Some(ByteOrder::Little),
        MAGIC_VALUE_SWAPPED => Some(ByteOrder::Big),
        _ => None,
    }
}

/// The magic value as written in the given byte order.
#[must_use]
pub fn build_magic(order: ByteOrder) -> [u8; 8] {
    order.encode_i64(MAGIC_VALUE)
}

/// Read the magic value and select the byte order for everything after it.
pub(crate) fn read_byte_order<R: Read>(stream: &mut StreamReader<'_, R>) -> Result<ByteOrder> {
    let bytes = stream.read_array::<8>("magic value")?;
    let order = detect_byte_order(bytes).ok_or(TeaError::NotATeaFile {
        magic: u64::from_le_bytes(bytes),
    })?;
    stream.set_order(order);
    Ok(order)
}
