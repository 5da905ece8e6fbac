//! NameValue section: typed metadata entries.
//!
//! # Structure (after `NextOffset`)
//!
//! `Count:int32`, then per entry `Name:int32 length + UTF-8`, `Kind:int32`
//! and a value whose shape depends on the kind:
//!
//! | Kind | Value                |
//! |------|----------------------|
//! | 1    | int32                |
//! | 2    | float64              |
//! | 3    | int32 length + UTF-8 |
//! | 4    | 16 raw UUID bytes    |

use uuid::Uuid;

use super::section::{SectionBuffer, SectionCursor};
use crate::error::{Result, TeaError};
use crate::types::{ByteOrder, NameValue, NameValueData, NameValueKind};

/// Parse a NameValue section body.
pub(crate) fn parse_name_value_section(cursor: &mut SectionCursor<'_>) -> Result<Vec<NameValue>> {
    let count = cursor.count("name value count")?;
    // Smallest entry: empty name (4) + kind (4) + int32 (4).
    let mut entries = Vec::with_capacity((count as usize).min(cursor.remaining() / 12));

    for idx in 0..count {
        let name = cursor.string(&format!("name value {idx} name"))?;
        let code = cursor.i32(&format!("name value {idx} kind"))?;
        let kind = NameValueKind::from_code(code).ok_or_else(|| {
            TeaError::format(format!("name value '{name}' has unknown kind {code}"))
        })?;
        let field = format!("name value '{name}'");
        let value = match kind {
            NameValueKind::Int32 => NameValueData::Int32(cursor.i32(&field)?),
            NameValueKind::Double => NameValueData::Double(cursor.f64(&field)?),
            NameValueKind::Text => NameValueData::Text(cursor.string(&field)?),
            NameValueKind::Uuid => NameValueData::Uuid(Uuid::from_bytes(cursor.array(&field)?)),
        };
        entries.push(NameValue { name, value });
    }

    Ok(entries)
}

/// Build a NameValue section body.
pub(crate) fn build_name_value_section(entries: &[NameValue], order: ByteOrder) -> Result<Vec<u8>> {
    let mut buf = SectionBuffer::new(order);
    buf.put_count(entries.len(), "name value count")?;
    for entry in entries {
        buf.put_string(&entry.name, "name value name")?;
        buf.put_i32(entry.kind().code());
        match &entry.value {
            NameValueData::Int32(value) => buf.put_i32(*value),
            NameValueData::Double(value) => buf.put_f64(*value),
            NameValueData::Text(value) => buf.put_string(value, "name value text")?,
            NameValueData::Uuid(value) => buf.put_bytes(value.as_bytes()),
        }
    }
    Ok(buf.into_bytes())
}
