//! Item values.

use chrono::{DateTime, Utc};

use super::field::FieldKind;
use crate::error::{Result, TeaError};

/// A single field value of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Instant stored as ticks in a time field.
    Timestamp(DateTime<Utc>),
    /// Free text. Can be carried on an [`Item`] but never encoded.
    Text(String),
}

impl Value {
    /// Semantic kind of this value.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Int8(_) => FieldKind::Int8,
            Self::Int16(_) => FieldKind::Int16,
            Self::Int32(_) => FieldKind::Int32,
            Self::Int64(_) => FieldKind::Int64,
            Self::UInt8(_) => FieldKind::UInt8,
            Self::UInt16(_) => FieldKind::UInt16,
            Self::UInt32(_) => FieldKind::UInt32,
            Self::UInt64(_) => FieldKind::UInt64,
            Self::Float32(_) => FieldKind::Float32,
            Self::Float64(_) => FieldKind::Float64,
            Self::Timestamp(_) => FieldKind::Timestamp,
            Self::Text(_) => FieldKind::Text,
        }
    }

    /// Integer value widened to `i64`, if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(i64::from(v)),
            Self::Int16(v) => Some(i64::from(v)),
            Self::Int32(v) => Some(i64::from(v)),
            Self::Int64(v) => Some(v),
            Self::UInt8(v) => Some(i64::from(v)),
            Self::UInt16(v) => Some(i64::from(v)),
            Self::UInt32(v) => Some(i64::from(v)),
            Self::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Timestamp value, if this is one.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(instant) => Some(*instant),
            _ => None,
        }
    }
}

/// Extraction of a typed Rust value from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_conversion {
    ($($variant:ident => $ty:ty;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_value_conversion! {
    Int8 => i8;
    Int16 => i16;
    Int32 => i32;
    Int64 => i64;
    UInt8 => u8;
    UInt16 => u16;
    UInt32 => u32;
    UInt64 => u64;
    Float32 => f32;
    Float64 => f64;
    Timestamp => DateTime<Utc>;
    Text => String;
}

/// One decoded or to-be-encoded item: field values keyed by field name.
///
/// Entries keep insertion order; encoding addresses them by name, so the
/// order does not have to match the layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    entries: Vec<(String, Value)>,
}

impl Item {
    /// Create an empty item.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty item with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builder form of [`Item::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field value, replacing any previous value of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Typed value of a field.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)
            .ok_or_else(|| TeaError::format(format!("item has no field '{name}'")))?;
        T::from_value(value).ok_or_else(|| {
            TeaError::format(format!(
                "field '{name}' holds a {} value, expected {}",
                value.kind(),
                std::any::type_name::<T>()
            ))
        })
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insert_replaces() {
        let mut item = Item::new().with("volume", 10i8);
        item.insert("volume", 11i8);
        assert_eq!(item.len(), 1);
        assert_eq!(item.get("volume"), Some(&Value::Int8(11)));
    }

    #[test]
    fn test_get_as() {
        let ts = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let item = Item::new().with("ts", ts).with("price", 101.25f64);

        assert_eq!(item.get_as::<DateTime<Utc>>("ts").unwrap(), ts);
        assert_eq!(item.get_as::<f64>("price").unwrap(), 101.25);
        assert!(item.get_as::<i32>("price").is_err());
        assert!(item.get_as::<i32>("missing").is_err());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::UInt32(7).as_i64(), Some(7));
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Float64(1.0).as_i64(), None);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::from(String::from("x")).kind(), FieldKind::Text);
        assert_eq!(Value::from(1u16).kind(), FieldKind::UInt16);
    }
}
