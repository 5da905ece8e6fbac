//! The TeaFile header.

use super::{ByteOrder, Field, NameValue, Times};
use crate::layout::FieldLayout;

/// Everything a TeaFile declares before its item region.
///
/// A header is read once per stream or assembled by the caller before
/// writing, and is not changed once items flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Byte order of every value after the magic value.
    pub byte_order: ByteOrder,
    /// Item schema name (Item section).
    pub name: String,
    /// Size of one item record in bytes (Item section).
    pub item_size: u32,
    /// Item fields in declaration order (Item section).
    pub fields: Vec<Field>,
    /// Free-text description (Content section).
    pub description: String,
    /// Metadata entries (NameValue section).
    pub name_values: Vec<NameValue>,
    /// Epoch, resolution and time field offsets (Time section).
    pub times: Times,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            name: String::new(),
            item_size: 0,
            fields: Vec::new(),
            description: String::new(),
            name_values: Vec::new(),
            times: Times::default(),
        }
    }
}

impl Header {
    /// Header describing items of the given layout, with default time settings.
    #[must_use]
    pub fn for_layout(layout: &FieldLayout) -> Self {
        Self {
            name: layout.name().to_string(),
            item_size: layout.declared_item_size(),
            fields: layout.fields().cloned().collect(),
            times: Times {
                offsets: layout.time_offsets(),
                ..Times::default()
            },
            ..Self::default()
        }
    }

    /// Set the byte order.
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a name/value entry.
    #[must_use]
    pub fn with_name_value(mut self, name_value: NameValue) -> Self {
        self.name_values.push(name_value);
        self
    }

    /// Set epoch and tick resolution, keeping the time field offsets.
    #[must_use]
    pub fn with_time_scale(mut self, epoch: i64, ticks_per_day: i64) -> Self {
        self.times.epoch = epoch;
        self.times.ticks_per_day = ticks_per_day;
        self
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a name/value entry by name.
    #[must_use]
    pub fn name_value(&self, name: &str) -> Option<&NameValue> {
        self.name_values.iter().find(|entry| entry.name == name)
    }

    /// Whether an Item section is written for this header.
    #[must_use]
    pub fn has_item_section(&self) -> bool {
        self.item_size != 0 || !self.fields.is_empty() || !self.name.is_empty()
    }

    /// Whether a Content section is written for this header.
    #[must_use]
    pub fn has_content_section(&self) -> bool {
        !self.description.is_empty()
    }

    /// Whether a NameValue section is written for this header.
    #[must_use]
    pub fn has_name_value_section(&self) -> bool {
        !self.name_values.is_empty()
    }

    /// Whether a Time section is written for this header.
    ///
    /// Default times without offsets are implied by an absent section.
    #[must_use]
    pub fn has_time_section(&self) -> bool {
        self.times != Times::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[test]
    fn test_default_header_has_no_sections() {
        let header = Header::default();
        assert_eq!(header.byte_order, ByteOrder::Little);
        assert_eq!(header.times, Times::default());
        assert!(!header.has_item_section());
        assert!(!header.has_content_section());
        assert!(!header.has_name_value_section());
        assert!(!header.has_time_section());
    }

    #[test]
    fn test_populated_sections() {
        let mut header = Header::default()
            .with_description("prices")
            .with_name_value(NameValue::int32("decimals", 2));
        header.fields.push(Field::new("price", FieldType::Float64, 0));
        header.item_size = 8;

        assert!(header.has_item_section());
        assert!(header.has_content_section());
        assert!(header.has_name_value_section());
        assert!(!header.has_time_section());

        let header = header.with_time_scale(0, 86_400);
        assert!(header.has_time_section());
        assert_eq!(header.field("price").unwrap().offset, 0);
        assert!(header.name_value("decimals").is_some());
    }
}
