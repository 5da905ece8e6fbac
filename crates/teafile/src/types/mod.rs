//! Core types for TeaFile handling.
//!
//! This module provides the header model, item values and the options that
//! control reading and writing.

mod byte_order;
mod field;
mod header;
mod name_value;
mod options;
mod times;
mod value;

pub use byte_order::ByteOrder;
pub use field::{Field, FieldKind, FieldType};
pub use header::Header;
pub use name_value::{NameValue, NameValueData, NameValueKind};
pub use options::{DEFAULT_ALIGNMENT, ReaderOptions, WriterOptions};
pub use times::{DEFAULT_EPOCH, DEFAULT_TICKS_PER_DAY, Times};
pub use value::{FromValue, Item, Value};
