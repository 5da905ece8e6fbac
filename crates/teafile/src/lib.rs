//! TeaFile time-series container format reader and writer.
//!
//! A TeaFile is a self-describing binary file: a header of typed,
//! variable-length sections followed by a region of fixed-size items.
//!
//! # Features
//!
//! - Both byte orders, negotiated through the magic value
//! - Item, Content, NameValue and Time sections, with unknown sections skipped
//! - Padding reconciliation against the declared item start
//! - Tick counts converted to and from `chrono::DateTime<Utc>`
//! - Record types mapped onto items through [`TeaRecord`] and [`RecordSchema`]
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use chrono::{TimeZone, Utc};
//! use teafile::{FieldKind, Header, Item, RecordSchema, TeaReader, TeaWriter};
//!
//! let layout = RecordSchema::new("Tick")
//!     .timestamp("ts")
//!     .field("volume", FieldKind::Int8)
//!     .layout()
//!     .unwrap();
//! let header = Header::for_layout(&layout).with_description("ACME ticks");
//!
//! let mut writer = TeaWriter::new(Cursor::new(Vec::new()), header).unwrap();
//! writer
//!     .encode_item(
//!         &Item::new()
//!             .with("ts", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
//!             .with("volume", 10i8),
//!     )
//!     .unwrap();
//! let bytes = writer.finish_sealed().unwrap().into_inner();
//!
//! let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
//! assert_eq!(reader.header().description, "ACME ticks");
//! let item = reader.decode_item().unwrap().unwrap();
//! assert_eq!(item.get_as::<i8>("volume").unwrap(), 10);
//! ```

mod error;
pub mod header;
pub mod item;
pub mod layout;
mod reader;
mod types;
mod writer;

use std::path::Path;

pub use error::{Result, TeaError};

pub use types::{
    ByteOrder, DEFAULT_ALIGNMENT, DEFAULT_EPOCH, DEFAULT_TICKS_PER_DAY, Field, FieldKind,
    FieldType, FromValue, Header, Item, NameValue, NameValueData, NameValueKind, ReaderOptions,
    Times, Value, WriterOptions,
};

pub use header::{ItemBounds, read_header, write_header};
pub use item::{decode_item, encode_item};
pub use layout::{FieldLayout, FieldSpec, LayoutField, RecordSchema, TeaRecord};
pub use reader::{Items, TeaReader};
pub use writer::TeaWriter;

/// Read the header and all items of a TeaFile.
pub fn read_tea_file(path: &Path) -> Result<(Header, Vec<Item>)> {
    read_tea_file_with_options(path, ReaderOptions::default())
}

/// Read the header and all items of a TeaFile with options.
pub fn read_tea_file_with_options(
    path: &Path,
    options: ReaderOptions,
) -> Result<(Header, Vec<Item>)> {
    let mut reader = TeaReader::open_with_options(path, options)?;
    let mut items = Vec::new();
    reader.read_items_into(&mut items)?;
    Ok((reader.header().clone(), items))
}

/// Write a TeaFile with the given header and items, recording the item end.
pub fn write_tea_file(path: &Path, header: Header, items: &[Item]) -> Result<()> {
    let mut writer = TeaWriter::create(path, header)?;
    for item in items {
        writer.encode_item(item)?;
    }
    writer.finish_sealed()?;
    Ok(())
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
