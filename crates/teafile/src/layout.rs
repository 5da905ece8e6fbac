//! Field layout of an item record.
//!
//! A [`FieldLayout`] resolves the fields of one fixed-size item: primitive
//! type, byte offset and whether the field holds a tick count. It is built
//! either from a decoded [`Header`] or from a caller-supplied
//! [`RecordSchema`], and is then reused for every item of the stream.

use std::collections::BTreeSet;

use crate::error::{Result, TeaError};
use crate::types::{Field, FieldKind, FieldType, Header, Item};

/// A field of a resolved layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub field: Field,
    /// The field stores a tick count and decodes to a timestamp.
    pub is_time: bool,
}

/// Resolved layout of one item record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    name: String,
    item_size: u32,
    fields: Vec<LayoutField>,
    /// Indices into `fields`, event time first.
    time_fields: Vec<usize>,
}

impl FieldLayout {
    /// Resolve the layout declared by a header.
    ///
    /// Offsets past the end of the item are always rejected. In strict mode
    /// duplicate names, overlapping fields and time offsets that do not name
    /// an integer field are rejected too; otherwise they are logged.
    pub fn from_header(header: &Header, strict: bool) -> Result<Self> {
        if header.item_size == 0 {
            return Err(TeaError::format(format!(
                "item '{}' declares an item size of zero",
                header.name
            )));
        }
        let item_size = header.item_size as usize;

        for field in &header.fields {
            if field.end() > item_size {
                return Err(TeaError::format(format!(
                    "field '{}' ({} at offset {}) extends past item size {}",
                    field.name, field.field_type, field.offset, item_size
                )));
            }
        }

        if let Some(message) = duplicate_name(&header.fields) {
            tolerate(strict, message)?;
        }
        if let Some(message) = overlapping_fields(&header.fields) {
            tolerate(strict, message)?;
        }

        let mut fields: Vec<LayoutField> = header
            .fields
            .iter()
            .map(|field| LayoutField {
                field: field.clone(),
                is_time: false,
            })
            .collect();

        let mut time_fields = Vec::with_capacity(header.times.offsets.len());
        for &offset in &header.times.offsets {
            let position = fields
                .iter()
                .position(|slot| slot.field.offset == offset && slot.field.field_type.is_integer());
            match position {
                Some(index) if !fields[index].is_time => {
                    fields[index].is_time = true;
                    time_fields.push(index);
                }
                Some(_) => tolerate(strict, format!("time offset {offset} is listed twice"))?,
                None => tolerate(
                    strict,
                    format!("time offset {offset} does not name an integer field"),
                )?,
            }
        }

        Ok(Self {
            name: header.name.clone(),
            item_size: header.item_size,
            fields,
            time_fields,
        })
    }

    /// Item schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of one item record in bytes.
    #[must_use]
    pub fn item_size(&self) -> usize {
        self.item_size as usize
    }

    /// Item size as declared in the Item section.
    #[must_use]
    pub fn declared_item_size(&self) -> u32 {
        self.item_size
    }

    /// Resolved fields in declaration order.
    #[must_use]
    pub fn slots(&self) -> &[LayoutField] {
        &self.fields
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().map(|slot| &slot.field)
    }

    /// The field holding the event time, if any.
    #[must_use]
    pub fn event_time_field(&self) -> Option<&Field> {
        self.time_fields
            .first()
            .map(|&index| &self.fields[index].field)
    }

    /// Offsets of the time fields, event time first, as stored in the Time section.
    #[must_use]
    pub fn time_offsets(&self) -> Vec<u32> {
        self.time_fields
            .iter()
            .map(|&index| self.fields[index].field.offset)
            .collect()
    }
}

/// Caller-side declaration of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Byte offset within the item record.
    pub offset: u32,
    /// Marks the event time of the record.
    pub timestamp: bool,
}

impl FieldSpec {
    /// Create a field declaration.
    pub fn new(name: impl Into<String>, kind: FieldKind, offset: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            offset,
            timestamp: false,
        }
    }

    /// Mark this field as the event time.
    #[must_use]
    pub fn as_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }
}

/// Description of a record type, registered once and turned into a
/// [`FieldLayout`] for encoding.
///
/// Fields added with [`RecordSchema::field`] and [`RecordSchema::timestamp`]
/// are packed after the previous field; the `_at` variants place a field at an
/// explicit offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSpec>,
    item_size: Option<u32>,
}

impl RecordSchema {
    /// Start an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            item_size: None,
        }
    }

    /// Append a field right after the previous one.
    #[must_use]
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        let offset = self.packed_end();
        self.push(FieldSpec::new(name, kind, offset))
    }

    /// Append a field at an explicit offset.
    #[must_use]
    pub fn field_at(self, name: impl Into<String>, kind: FieldKind, offset: u32) -> Self {
        self.push(FieldSpec::new(name, kind, offset))
    }

    /// Append the event time field right after the previous one.
    #[must_use]
    pub fn timestamp(self, name: impl Into<String>) -> Self {
        let offset = self.packed_end();
        self.push(FieldSpec::new(name, FieldKind::Timestamp, offset).as_timestamp())
    }

    /// Append the event time field at an explicit offset.
    #[must_use]
    pub fn timestamp_at(self, name: impl Into<String>, offset: u32) -> Self {
        self.push(FieldSpec::new(name, FieldKind::Timestamp, offset).as_timestamp())
    }

    /// Append a field declaration.
    #[must_use]
    pub fn push(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declare an item size larger than the packed fields, leaving trailing
    /// bytes zero.
    #[must_use]
    pub fn with_item_size(mut self, item_size: u32) -> Self {
        self.item_size = Some(item_size);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Build the encode-side layout.
    ///
    /// # Errors
    /// - [`TeaError::UnsupportedType`] if a field kind has no primitive type
    /// - [`TeaError::MissingTimestampField`] if no field is marked as the timestamp
    /// - [`TeaError::InvalidSchema`] for duplicate names, more than one
    ///   timestamp mark, a mark on a non-time kind, or bad offsets
    pub fn layout(&self) -> Result<FieldLayout> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let field_type = spec
                .kind
                .primitive()
                .ok_or_else(|| TeaError::unsupported_type(&spec.name, spec.kind.to_string()))?;
            fields.push(LayoutField {
                field: Field::new(&spec.name, field_type, spec.offset),
                is_time: spec.kind == FieldKind::Timestamp,
            });
        }

        let marked: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.timestamp)
            .map(|(index, _)| index)
            .collect();
        let event_time = match marked.as_slice() {
            [] => {
                return Err(TeaError::MissingTimestampField {
                    schema: self.name.clone(),
                });
            }
            [index] => *index,
            _ => {
                return Err(TeaError::invalid_schema(format!(
                    "schema '{}' marks {} fields as timestamp",
                    self.name,
                    marked.len()
                )));
            }
        };
        if self.fields[event_time].kind != FieldKind::Timestamp {
            return Err(TeaError::invalid_schema(format!(
                "timestamp field '{}' has kind {}",
                self.fields[event_time].name, self.fields[event_time].kind
            )));
        }

        let declared: Vec<Field> = fields.iter().map(|slot| slot.field.clone()).collect();
        if let Some(message) = duplicate_name(&declared) {
            return Err(TeaError::invalid_schema(message));
        }
        if let Some(message) = overlapping_fields(&declared) {
            return Err(TeaError::invalid_schema(message));
        }

        let packed = declared.iter().map(Field::end).max().unwrap_or(0);
        let item_size = match self.item_size {
            Some(size) if (size as usize) < packed => {
                return Err(TeaError::invalid_schema(format!(
                    "item size {size} is smaller than the {packed} bytes the fields occupy"
                )));
            }
            Some(size) => size,
            None => u32::try_from(packed)
                .map_err(|_| TeaError::invalid_schema("item size exceeds u32"))?,
        };
        if item_size == 0 {
            return Err(TeaError::invalid_schema(format!(
                "schema '{}' has no fields",
                self.name
            )));
        }

        let mut time_fields = vec![event_time];
        time_fields.extend(
            fields
                .iter()
                .enumerate()
                .filter(|(index, slot)| slot.is_time && *index != event_time)
                .map(|(index, _)| index),
        );

        tracing::debug!(
            schema = %self.name,
            fields = fields.len(),
            item_size,
            "Built record layout"
        );

        Ok(FieldLayout {
            name: self.name.clone(),
            item_size,
            fields,
            time_fields,
        })
    }

    fn packed_end(&self) -> u32 {
        self.fields
            .iter()
            .map(|spec| {
                let width = spec.kind.primitive().map_or(0, FieldType::width) as u32;
                spec.offset.saturating_add(width)
            })
            .max()
            .unwrap_or(0)
    }
}

/// A Rust type that maps onto item records.
///
/// Implementations register their schema once; values convert to and from
/// [`Item`]s by field name.
pub trait TeaRecord: Sized {
    /// Schema of the record type.
    fn schema() -> RecordSchema;

    /// Field values of this record.
    fn to_item(&self) -> Item;

    /// Rebuild a record from decoded field values.
    fn from_item(item: &Item) -> Result<Self>;
}

fn tolerate(strict: bool, message: String) -> Result<()> {
    if strict {
        return Err(TeaError::format(message));
    }
    tracing::warn!(%message, "Tolerating inconsistent item layout");
    Ok(())
}

fn duplicate_name(fields: &[Field]) -> Option<String> {
    let mut seen = BTreeSet::new();
    fields
        .iter()
        .find(|field| !seen.insert(field.name.as_str()))
        .map(|field| format!("duplicate field name '{}'", field.name))
}

fn overlapping_fields(fields: &[Field]) -> Option<String> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|field| field.offset);
    sorted.windows(2).find_map(|pair| {
        (pair[0].end() > pair[1].offset as usize).then(|| {
            format!(
                "fields '{}' and '{}' overlap at offset {}",
                pair[0].name, pair[1].name, pair[1].offset
            )
        })
    })
}
