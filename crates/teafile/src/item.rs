//! Single item encoding and decoding.
//!
//! An item is a block of exactly `item_size` bytes. Field values live at
//! their declared offsets, in the header's byte order; bytes not covered by
//! any field are zero on write and ignored on read. Fields listed as time
//! fields hold tick counts and map to [`Value::Timestamp`].

use crate::error::{Result, TeaError};
use crate::layout::{FieldLayout, LayoutField};
use crate::types::{ByteOrder, FieldKind, FieldType, Item, Times, Value};

/// Decode one item block.
///
/// # Errors
/// [`TeaError::Format`] if the block length differs from the item size or a
/// time field holds a tick count outside the representable range.
pub fn decode_item(
    block: &[u8],
    layout: &FieldLayout,
    times: &Times,
    order: ByteOrder,
) -> Result<Item> {
    if block.len() != layout.item_size() {
        return Err(TeaError::format(format!(
            "item block is {} bytes, expected {}",
            block.len(),
            layout.item_size()
        )));
    }

    let mut item = Item::with_capacity(layout.slots().len());
    for slot in layout.slots() {
        let value = read_value(block, slot, order)?;
        let value = if slot.is_time {
            let ticks = value.as_i64().ok_or_else(|| {
                TeaError::format(format!(
                    "time field '{}' holds {value:?}, which exceeds the tick range",
                    slot.field.name
                ))
            })?;
            Value::Timestamp(times.to_instant(ticks)?)
        } else {
            value
        };
        item.insert(slot.field.name.clone(), value);
    }
    Ok(item)
}

/// Encode one item into a freshly allocated, zero-filled block.
///
/// Nothing is written anywhere; callers emit the returned block in a single
/// write so that a failed encode never leaves a partial item behind.
///
/// # Errors
/// - [`TeaError::UnsupportedType`] if the item carries a value with no
///   primitive representation
/// - [`TeaError::Format`] if a field value is missing, has the wrong kind, or
///   the item names a field the layout does not declare
pub fn encode_item(
    item: &Item,
    layout: &FieldLayout,
    times: &Times,
    order: ByteOrder,
) -> Result<Vec<u8>> {
    for (name, value) in item.iter() {
        if value.kind() == FieldKind::Text {
            return Err(TeaError::unsupported_type(name, FieldKind::Text.to_string()));
        }
        if !layout.fields().any(|field| field.name == name) {
            return Err(TeaError::format(format!(
                "item field '{name}' is not declared by layout '{}'",
                layout.name()
            )));
        }
    }

    let mut block = vec![0u8; layout.item_size()];
    for slot in layout.slots() {
        let name = &slot.field.name;
        let value = item
            .get(name)
            .ok_or_else(|| TeaError::format(format!("item has no value for field '{name}'")))?;
        let value = if slot.is_time {
            let instant = value.as_timestamp().ok_or_else(|| {
                TeaError::format(format!(
                    "time field '{name}' needs a timestamp, got {}",
                    value.kind()
                ))
            })?;
            tick_value(slot.field.field_type, times.to_ticks(instant)?, name)?
        } else {
            value.clone()
        };
        write_value(&mut block, slot, &value, order)?;
    }
    Ok(block)
}

fn field_bytes<const N: usize>(block: &[u8], slot: &LayoutField) -> Result<[u8; N]> {
    let start = slot.field.offset as usize;
    block
        .get(start..start + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            TeaError::format(format!(
                "field '{}' at offset {start} lies outside the item",
                slot.field.name
            ))
        })
}

fn read_value(block: &[u8], slot: &LayoutField, order: ByteOrder) -> Result<Value> {
    let value = match slot.field.field_type {
        FieldType::Int8 => Value::Int8(order.decode_i8(field_bytes(block, slot)?)),
        FieldType::Int16 => Value::Int16(order.decode_i16(field_bytes(block, slot)?)),
        FieldType::Int32 => Value::Int32(order.decode_i32(field_bytes(block, slot)?)),
        FieldType::Int64 => Value::Int64(order.decode_i64(field_bytes(block, slot)?)),
        FieldType::UInt8 => Value::UInt8(order.decode_u8(field_bytes(block, slot)?)),
        FieldType::UInt16 => Value::UInt16(order.decode_u16(field_bytes(block, slot)?)),
        FieldType::UInt32 => Value::UInt32(order.decode_u32(field_bytes(block, slot)?)),
        FieldType::UInt64 => Value::UInt64(order.decode_u64(field_bytes(block, slot)?)),
        FieldType::Float32 => Value::Float32(order.decode_f32(field_bytes(block, slot)?)),
        FieldType::Float64 => Value::Float64(order.decode_f64(field_bytes(block, slot)?)),
    };
    Ok(value)
}

fn write_value(block: &mut [u8], slot: &LayoutField, value: &Value, order: ByteOrder) -> Result<()> {
    let bytes: Vec<u8> = match (slot.field.field_type, value) {
        (FieldType::Int8, Value::Int8(v)) => order.encode_i8(*v).to_vec(),
        (FieldType::Int16, Value::Int16(v)) => order.encode_i16(*v).to_vec(),
        (FieldType::Int32, Value::Int32(v)) => order.encode_i32(*v).to_vec(),
        (FieldType::Int64, Value::Int64(v)) => order.encode_i64(*v).to_vec(),
        (FieldType::UInt8, Value::UInt8(v)) => order.encode_u8(*v).to_vec(),
        (FieldType::UInt16, Value::UInt16(v)) => order.encode_u16(*v).to_vec(),
        (FieldType::UInt32, Value::UInt32(v)) => order.encode_u32(*v).to_vec(),
        (FieldType::UInt64, Value::UInt64(v)) => order.encode_u64(*v).to_vec(),
        (FieldType::Float32, Value::Float32(v)) => order.encode_f32(*v).to_vec(),
        (FieldType::Float64, Value::Float64(v)) => order.encode_f64(*v).to_vec(),
        (field_type, value) => {
            return Err(TeaError::format(format!(
                "field '{}' is {field_type}, got a {} value",
                slot.field.name,
                value.kind()
            )));
        }
    };
    let start = slot.field.offset as usize;
    let target = block.get_mut(start..start + bytes.len()).ok_or_else(|| {
        TeaError::format(format!(
            "field '{}' at offset {start} lies outside the item",
            slot.field.name
        ))
    })?;
    target.copy_from_slice(&bytes);
    Ok(())
}

/// Fit a tick count into the integer type of a time field.
fn tick_value(field_type: FieldType, ticks: i64, name: &str) -> Result<Value> {
    let out_of_range =
        || TeaError::format(format!("tick count {ticks} does not fit {field_type} field '{name}'"));
    let value = match field_type {
        FieldType::Int8 => Value::Int8(i8::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::Int16 => Value::Int16(i16::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::Int32 => Value::Int32(i32::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::Int64 => Value::Int64(ticks),
        FieldType::UInt8 => Value::UInt8(u8::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::UInt16 => Value::UInt16(u16::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::UInt32 => Value::UInt32(u32::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::UInt64 => Value::UInt64(u64::try_from(ticks).map_err(|_| out_of_range())?),
        FieldType::Float32 | FieldType::Float64 => {
            return Err(TeaError::format(format!(
                "time field '{name}' has non-integer type {field_type}"
            )));
        }
    };
    Ok(value)
}
