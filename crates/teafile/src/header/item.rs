//! Item section: item size, schema name and field table.
//!
//! # Structure (after `NextOffset`)
//!
//! | Field      | Type                 |
//! |------------|----------------------|
//! | ItemSize   | int32                |
//! | Name       | int32 length + UTF-8 |
//! | FieldCount | int32                |
//! | Fields     | FieldCount × entry   |
//!
//! Each field entry is `Type:int32, Offset:int32, Name:int32 length + UTF-8`.

use super::section::{SectionBuffer, SectionCursor};
use crate::error::{Result, TeaError};
use crate::types::{ByteOrder, Field, FieldType};

/// Contents of an Item section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSection {
    pub item_size: u32,
    pub name: String,
    pub fields: Vec<Field>,
}

/// Parse an Item section body.
pub(crate) fn parse_item_section(cursor: &mut SectionCursor<'_>) -> Result<ItemSection> {
    let item_size = cursor.count("item size")?;
    let name = cursor.string("item name")?;
    let field_count = cursor.count("field count")?;

    // Each entry is at least 12 bytes; don't trust the count for allocation.
    let mut fields = Vec::with_capacity((field_count as usize).min(cursor.remaining() / 12));
    for idx in 0..field_count {
        let code = cursor.i32(&format!("field {idx} type"))?;
        let field_type = FieldType::from_code(code)
            .ok_or_else(|| TeaError::format(format!("field {idx} has unknown type code {code}")))?;
        let offset = cursor.count(&format!("field {idx} offset"))?;
        let name = cursor.string(&format!("field {idx} name"))?;
        fields.push(Field {
            name,
            field_type,
            offset,
        });
    }

    Ok(ItemSection {
        item_size,
        name,
        fields,
    })
}

/// Build an Item section body.
pub(crate) fn build_item_section(
    item_size: u32,
    name: &str,
    fields: &[Field],
    order: ByteOrder,
) -> Result<Vec<u8>> {
    let mut buf = SectionBuffer::new(order);
    buf.put_count(item_size as usize, "item size")?;
    buf.put_string(name, "item name")?;
    buf.put_count(fields.len(), "field count")?;
    for field in fields {
        buf.put_i32(field.field_type.code());
        buf.put_count(field.offset as usize, "field offset")?;
        buf.put_string(&field.name, "field name")?;
    }
    Ok(buf.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::section::SectionId;

    fn tick_section() -> ItemSection {
        ItemSection {
            item_size: 9,
            name: "Tick".to_string(),
            fields: vec![
                Field::new("ts", FieldType::Int64, 0),
                Field::new("volume", FieldType::Int8, 8),
            ],
        }
    }

    fn build(section: &ItemSection, order: ByteOrder) -> Vec<u8> {
        build_item_section(section.item_size, &section.name, &section.fields, order).unwrap()
    }

    #[test]
    fn test_build_layout() {
        let bytes = build(&tick_section(), ByteOrder::Little);
        // size + name + count + 2 × (type + offset + name)
        assert_eq!(bytes.len(), 4 + (4 + 4) + 4 + (4 + 4 + 4 + 2) + (4 + 4 + 4 + 6));
        assert_eq!(&bytes[0..4], &[9, 0, 0, 0]);
        assert_eq!(&bytes[8..12], b"Tick");
        assert_eq!(&bytes[12..16], &[2, 0, 0, 0]);
        // first field type code: Int64 = 4
        assert_eq!(&bytes[16..20], &[4, 0, 0, 0]);
    }

    #[test]
    fn test_build_and_parse() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = build(&tick_section(), order);
            let mut cursor = SectionCursor::new(SectionId::Item, &bytes, order);
            assert_eq!(parse_item_section(&mut cursor).unwrap(), tick_section());
            assert_eq!(cursor.remaining(), 0);
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        let mut section = tick_section();
        section.fields.truncate(1);
        let mut bytes = build(&section, ByteOrder::Little);
        // type code of the only field sits after size, name and count
        bytes[16] = 42;
        let mut cursor = SectionCursor::new(SectionId::Item, &bytes, ByteOrder::Little);
        assert!(matches!(
            parse_item_section(&mut cursor),
            Err(TeaError::Format { .. })
        ));
    }

    #[test]
    fn test_parse_count_past_section_end() {
        let mut section = tick_section();
        section.fields.clear();
        let mut bytes = build(&section, ByteOrder::Little);
        bytes[12] = 3;
        let mut cursor = SectionCursor::new(SectionId::Item, &bytes, ByteOrder::Little);
        assert!(matches!(
            parse_item_section(&mut cursor),
            Err(TeaError::Format { .. })
        ));
    }
}
