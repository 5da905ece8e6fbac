//! Padding between the last section and the item region.
//!
//! The header declares where items start. After magic value, bounds, section
//! count and all sections, the remaining `item_start - consumed` bytes are
//! filler: skipped when reading, written as zeros when writing.

use std::io::Read;

use super::section::StreamReader;
use crate::error::{Result, TeaError};

/// Number of filler bytes between `consumed` header bytes and `item_start`.
pub fn padding_length(item_start: i64, consumed: u64) -> Result<u64> {
    let consumed_signed = i64::try_from(consumed)
        .map_err(|_| TeaError::format(format!("header length {consumed} is out of range")))?;
    let padding = item_start.checked_sub(consumed_signed).filter(|&p| p >= 0);
    match padding {
        Some(padding) => Ok(padding as u64),
        None => Err(TeaError::format(format!(
            "item start {item_start} lies inside the {consumed}-byte header"
        ))),
    }
}

/// Item region start for a header of `header_len` bytes.
///
/// An explicit start wins; otherwise the header length is rounded up to
/// `alignment`.
pub fn item_start_for(header_len: u64, alignment: u64, explicit: Option<i64>) -> Result<i64> {
    let start = match explicit {
        Some(start) => start,
        None => {
            let aligned = if alignment > 1 {
                header_len.div_ceil(alignment) * alignment
            } else {
                header_len
            };
            i64::try_from(aligned)
                .map_err(|_| TeaError::format(format!("header length {aligned} is out of range")))?
        }
    };
    padding_length(start, header_len)?;
    Ok(start)
}

/// Skip the padding so the stream is positioned at `item_start`.
pub(crate) fn read_padding<R: Read>(stream: &mut StreamReader<'_, R>, item_start: i64) -> Result<u64> {
    let padding = padding_length(item_start, stream.consumed())?;
    stream.skip(padding, "padding")?;
    tracing::debug!(padding, item_start, "Skipped header padding");
    Ok(padding)
}
