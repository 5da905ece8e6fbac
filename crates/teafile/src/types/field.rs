//! Item field definitions.

use std::fmt;

/// Primitive type of a field inside an item record.
///
/// The discriminants are the type codes stored in the Item section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    UInt8 = 5,
    UInt16 = 6,
    UInt32 = 7,
    UInt64 = 8,
    Float32 = 9,
    Float64 = 10,
}

impl FieldType {
    /// Parse a type code from the Item section.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Int8),
            2 => Some(Self::Int16),
            3 => Some(Self::Int32),
            4 => Some(Self::Int64),
            5 => Some(Self::UInt8),
            6 => Some(Self::UInt16),
            7 => Some(Self::UInt32),
            8 => Some(Self::UInt64),
            9 => Some(Self::Float32),
            10 => Some(Self::Float64),
            _ => None,
        }
    }

    /// Type code written to the Item section.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Size of the field in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Whether the field can hold a tick count.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        };
        f.write_str(name)
    }
}

/// Semantic kind of a record field, as declared by the caller.
///
/// Only the ten primitive kinds and [`FieldKind::Timestamp`] map onto an
/// item record; anything else is rejected when a layout is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Calendar instant, stored as an `Int64` tick count.
    Timestamp,
    /// Free text. Has no fixed-size representation.
    Text,
}

impl FieldKind {
    /// Primitive type used to store this kind, if it has one.
    #[must_use]
    pub const fn primitive(self) -> Option<FieldType> {
        match self {
            Self::Int8 => Some(FieldType::Int8),
            Self::Int16 => Some(FieldType::Int16),
            Self::Int32 => Some(FieldType::Int32),
            Self::Int64 | Self::Timestamp => Some(FieldType::Int64),
            Self::UInt8 => Some(FieldType::UInt8),
            Self::UInt16 => Some(FieldType::UInt16),
            Self::UInt32 => Some(FieldType::UInt32),
            Self::UInt64 => Some(FieldType::UInt64),
            Self::Float32 => Some(FieldType::Float32),
            Self::Float64 => Some(FieldType::Float64),
            Self::Text => None,
        }
    }
}

impl From<FieldType> for FieldKind {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Int8 => Self::Int8,
            FieldType::Int16 => Self::Int16,
            FieldType::Int32 => Self::Int32,
            FieldType::Int64 => Self::Int64,
            FieldType::UInt8 => Self::UInt8,
            FieldType::UInt16 => Self::UInt16,
            FieldType::UInt32 => Self::UInt32,
            FieldType::UInt64 => Self::UInt64,
            FieldType::Float32 => Self::Float32,
            FieldType::Float64 => Self::Float64,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => f.write_str("Timestamp"),
            Self::Text => f.write_str("Text"),
            other => match other.primitive() {
                Some(field_type) => write!(f, "{field_type}"),
                None => f.write_str("Unknown"),
            },
        }
    }
}

/// One field of an item record as declared in the Item section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name, unique within the record.
    pub name: String,
    /// Primitive type.
    pub field_type: FieldType,
    /// Byte offset of the field within the item record.
    pub offset: u32,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, field_type: FieldType, offset: u32) -> Self {
        Self {
            name: name.into(),
            field_type,
            offset,
        }
    }

    /// First byte past the end of the field.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset as usize + self.field_type.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        for code in 1..=10 {
            let field_type = FieldType::from_code(code).unwrap();
            assert_eq!(field_type.code(), code);
        }
        assert_eq!(FieldType::from_code(0), None);
        assert_eq!(FieldType::from_code(11), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(FieldType::Int8.width(), 1);
        assert_eq!(FieldType::UInt16.width(), 2);
        assert_eq!(FieldType::Float32.width(), 4);
        assert_eq!(FieldType::Float64.width(), 8);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(FieldKind::Timestamp.primitive(), Some(FieldType::Int64));
        assert_eq!(FieldKind::Text.primitive(), None);
        assert_eq!(FieldKind::from(FieldType::UInt32), FieldKind::UInt32);
        assert_eq!(FieldKind::UInt32.to_string(), "UInt32");
    }

    #[test]
    fn test_field_end() {
        let field = Field::new("price", FieldType::Float64, 8);
        assert_eq!(field.end(), 16);
    }
}
