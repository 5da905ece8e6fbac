//! TeaFile header reading and writing.
//!
//! # Structure
//!
//! | Region        | Layout                                         |
//! |---------------|------------------------------------------------|
//! | Magic         | 8 bytes, selects the byte order                |
//! | Bounds        | ItemStart:int64, ItemEnd:int64                 |
//! | Section count | int64                                          |
//! | Sections      | SectionId:int32, NextOffset:int32, body        |
//! | Padding       | `ItemStart - consumed` zero bytes              |
//!
//! Sections are written in the order Item, Content, NameValue, Time, each
//! only when the header has something to put in it.

mod content;
mod item;
pub mod magic;
mod name_value;
pub mod padding;
pub mod section;
mod time;

use std::collections::BTreeSet;
use std::io::{Read, Write};

use crate::error::{Result, TeaError};
use crate::types::{Header, ReaderOptions, WriterOptions};

pub use magic::{MAGIC_LEN, MAGIC_VALUE, MAGIC_VALUE_SWAPPED, build_magic, detect_byte_order};
pub use padding::{item_start_for, padding_length};
pub use section::{SECTION_PREFIX_LEN, SectionId};

use content::{build_content_section, parse_content_section};
use item::{build_item_section, parse_item_section};
use name_value::{build_name_value_section, parse_name_value_section};
use section::{SectionCursor, StreamReader};
use time::{build_time_section, parse_time_section};

/// Length of magic value, item bounds and section count.
pub const FIXED_HEADER_LEN: u64 = 32;

/// Position of the ItemEnd field from the start of the file.
pub const ITEM_END_POSITION: u64 = 16;

/// Absolute offsets of the item region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBounds {
    /// Offset of the first item.
    pub start: i64,
    /// Offset past the last item, or 0 if items run to the end of the stream.
    pub end: i64,
}

impl ItemBounds {
    /// Whether the item region extends to the end of the stream.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.end == 0
    }

    /// Number of items in the region, if the end is declared.
    #[must_use]
    pub fn item_count(&self, item_size: usize) -> Option<u64> {
        if self.is_open_ended() || item_size == 0 {
            return None;
        }
        Some((self.end - self.start) as u64 / item_size as u64)
    }

    /// Check that a declared end leaves room for whole items only.
    pub fn validate(&self, item_size: u32) -> Result<()> {
        if self.is_open_ended() {
            return Ok(());
        }
        if self.end < self.start {
            return Err(TeaError::format(format!(
                "item end {} precedes item start {}",
                self.end, self.start
            )));
        }
        let region = (self.end - self.start) as u64;
        if item_size > 0 && !region.is_multiple_of(u64::from(item_size)) {
            return Err(TeaError::format(format!(
                "item region of {region} bytes is not a multiple of item size {item_size}"
            )));
        }
        Ok(())
    }
}

/// Read a header, leaving the stream positioned at the first item.
///
/// # Errors
/// - [`TeaError::NotATeaFile`] if the magic value is not recognized
/// - [`TeaError::TruncatedStream`] if the stream ends inside the header
/// - [`TeaError::Format`] for negative counts, inconsistent sections, an
///   item start inside the header, or (strict mode) unknown or repeated sections
pub fn read_header<R: Read>(reader: &mut R, options: &ReaderOptions) -> Result<(Header, ItemBounds)> {
    let mut stream = StreamReader::new(reader);

    let byte_order = magic::read_byte_order(&mut stream)?;
    let bounds = ItemBounds {
        start: stream.read_i64("item start")?,
        end: stream.read_i64("item end")?,
    };
    let section_count = stream.read_i64("section count")?;
    if section_count < 0 {
        return Err(TeaError::format(format!("negative section count {section_count}")));
    }

    let mut header = Header {
        byte_order,
        ..Header::default()
    };
    let mut seen = BTreeSet::new();

    for index in 0..section_count {
        let code = stream.read_i32(&format!("section {index} id"))?;
        let next_offset = stream.read_i32(&format!("section {index} next offset"))?;
        let body_len = usize::try_from(next_offset).map_err(|_| {
            TeaError::format(format!("section {index} has negative next offset {next_offset}"))
        })?;
        let body = stream.read_vec(body_len, &format!("section {index} body"))?;

        let Some(id) = SectionId::from_code(code) else {
            if options.strict {
                return Err(TeaError::format(format!("unknown section id {code:#x}")));
            }
            tracing::warn!(section_id = code, length = body_len, "Skipping unknown section");
            continue;
        };
        if !seen.insert(id) {
            if options.strict {
                return Err(TeaError::format(format!("duplicate {id} section")));
            }
            tracing::warn!(section = %id, "Repeated section replaces the earlier one");
        }

        let mut cursor = SectionCursor::new(id, &body, byte_order);
        match id {
            SectionId::Item => {
                let section = parse_item_section(&mut cursor)?;
                header.item_size = section.item_size;
                header.name = section.name;
                header.fields = section.fields;
            }
            SectionId::Content => header.description = parse_content_section(&mut cursor)?,
            SectionId::NameValue => header.name_values = parse_name_value_section(&mut cursor)?,
            SectionId::Time => header.times = parse_time_section(&mut cursor)?,
        }
        if cursor.remaining() > 0 {
            tracing::debug!(
                section = %id,
                bytes = cursor.remaining(),
                "Ignoring trailing bytes in section"
            );
        }
        tracing::debug!(section = %id, length = body_len, "Read section");
    }

    padding::read_padding(&mut stream, bounds.start)?;
    bounds.validate(header.item_size)?;

    tracing::debug!(
        %byte_order,
        item_start = bounds.start,
        item_end = bounds.end,
        sections = section_count,
        "Read header"
    );
    Ok((header, bounds))
}

/// Serialize a header, including the padding up to the item region.
///
/// The ItemEnd field is written as 0 (open-ended).
pub fn build_header(header: &Header, options: &WriterOptions) -> Result<(Vec<u8>, ItemBounds)> {
    let order = header.byte_order;

    let mut sections = Vec::with_capacity(SectionId::WRITE_ORDER.len());
    for id in SectionId::WRITE_ORDER {
        let body = match id {
            SectionId::Item if header.has_item_section() => Some(build_item_section(
                header.item_size,
                &header.name,
                &header.fields,
                order,
            )?),
            SectionId::Content if header.has_content_section() => {
                Some(build_content_section(&header.description, order)?)
            }
            SectionId::NameValue if header.has_name_value_section() => {
                Some(build_name_value_section(&header.name_values, order)?)
            }
            SectionId::Time if header.has_time_section() => {
                Some(build_time_section(&header.times, order)?)
            }
            _ => None,
        };
        if let Some(body) = body {
            sections.push((id, body));
        }
    }

    let header_len = FIXED_HEADER_LEN
        + sections
            .iter()
            .map(|(_, body)| SECTION_PREFIX_LEN + body.len() as u64)
            .sum::<u64>();
    let item_start = item_start_for(header_len, options.alignment, options.item_start)?;
    let padding = padding_length(item_start, header_len)?;
    let bounds = ItemBounds {
        start: item_start,
        end: 0,
    };

    let mut out = Vec::with_capacity((header_len + padding) as usize);
    out.extend_from_slice(&build_magic(order));
    out.extend_from_slice(&order.encode_i64(bounds.start));
    out.extend_from_slice(&order.encode_i64(bounds.end));
    out.extend_from_slice(&order.encode_i64(sections.len() as i64));
    for (id, body) in &sections {
        let next_offset = i32::try_from(body.len())
            .map_err(|_| TeaError::format(format!("{id} section exceeds int32 length")))?;
        out.extend_from_slice(&order.encode_i32(id.code()));
        out.extend_from_slice(&order.encode_i32(next_offset));
        out.extend_from_slice(body);
    }
    out.resize(out.len() + padding as usize, 0);

    Ok((out, bounds))
}

/// Write a header, including the padding up to the item region.
///
/// The header is assembled in memory and written with a single call. A
/// failure while writing leaves an unusable stream.
pub fn write_header<W: Write>(
    writer: &mut W,
    header: &Header,
    options: &WriterOptions,
) -> Result<ItemBounds> {
    let (bytes, bounds) = build_header(header, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| TeaError::io("header", e))?;
    tracing::debug!(
        byte_order = %header.byte_order,
        item_start = bounds.start,
        "Wrote header"
    );
    Ok(bounds)
}
