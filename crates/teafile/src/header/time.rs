//! Time section: epoch, tick resolution and time field offsets.
//!
//! # Structure (after `NextOffset`)
//!
//! | Field            | Type                     |
//! |------------------|--------------------------|
//! | Epoch            | int64                    |
//! | TicksPerDay      | int64                    |
//! | FieldOffsetCount | int32                    |
//! | Offsets          | FieldOffsetCount × int32 |

use super::section::{SectionBuffer, SectionCursor};
use crate::error::{Result, TeaError};
use crate::types::{ByteOrder, Times};

/// Parse a Time section body.
pub(crate) fn parse_time_section(cursor: &mut SectionCursor<'_>) -> Result<Times> {
    let epoch = cursor.i64("epoch")?;
    let ticks_per_day = cursor.i64("ticks per day")?;
    if ticks_per_day <= 0 {
        return Err(TeaError::format(format!(
            "time section: ticks per day must be positive, got {ticks_per_day}"
        )));
    }

    let count = cursor.count("time field count")?;
    let mut offsets = Vec::with_capacity((count as usize).min(cursor.remaining() / 4));
    for idx in 0..count {
        offsets.push(cursor.count(&format!("time field offset {idx}"))?);
    }

    Ok(Times {
        epoch,
        ticks_per_day,
        offsets,
    })
}

/// Build a Time section body.
pub(crate) fn build_time_section(times: &Times, order: ByteOrder) -> Result<Vec<u8>> {
    if times.ticks_per_day <= 0 {
        return Err(TeaError::format(format!(
            "time section: ticks per day must be positive, got {}",
            times.ticks_per_day
        )));
    }
    let mut buf = SectionBuffer::new(order);
    buf.put_i64(times.epoch);
    buf.put_i64(times.ticks_per_day);
    buf.put_count(times.offsets.len(), "time field count")?;
    for &offset in &times.offsets {
        buf.put_count(offset as usize, "time field offset")?;
    }
    Ok(buf.into_bytes())
}
