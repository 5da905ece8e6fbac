//! TeaFile writer.
//!
//! Writes the header on construction, then appends items one at a time.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, TeaError};
use crate::header::{ITEM_END_POSITION, ItemBounds, write_header};
use crate::item::encode_item;
use crate::layout::{FieldLayout, TeaRecord};
use crate::types::{Header, Item, WriterOptions};

/// TeaFile writer.
///
/// The header is written when the writer is created. Items are assembled in
/// memory and written whole, so an encode error never leaves a partial item
/// in the stream.
pub struct TeaWriter<W: Write> {
    writer: BufWriter<W>,
    header: Header,
    bounds: ItemBounds,
    layout: Option<FieldLayout>,
    items_written: u64,
}

impl<W: Write> TeaWriter<W> {
    /// Create a writer with default options and write the header.
    pub fn new(writer: W, header: Header) -> Result<Self> {
        Self::with_options(writer, header, WriterOptions::default())
    }

    /// Create a writer and write the header.
    ///
    /// The item layout is validated strictly before anything is written.
    pub fn with_options(writer: W, header: Header, options: WriterOptions) -> Result<Self> {
        let layout = if header.has_item_section() {
            Some(FieldLayout::from_header(&header, true)?)
        } else {
            None
        };
        let mut writer = BufWriter::new(writer);
        let bounds = write_header(&mut writer, &header, &options)?;
        Ok(Self {
            writer,
            header,
            bounds,
            layout,
            items_written: 0,
        })
    }

    /// Create a writer for a record type, deriving the header from its schema.
    pub fn for_record<T: TeaRecord>(writer: W) -> Result<Self> {
        let layout = T::schema().layout()?;
        Self::new(writer, Header::for_layout(&layout))
    }

    /// The header written to the stream.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Item region offsets. The end stays 0 until the file is sealed.
    pub fn bounds(&self) -> ItemBounds {
        self.bounds
    }

    /// Number of items written so far.
    pub fn items_written(&self) -> u64 {
        self.items_written
    }

    /// Encode and write one item.
    ///
    /// # Errors
    /// Encoding errors leave the stream untouched. An I/O error while writing
    /// the assembled block leaves the length of the item region undefined.
    pub fn encode_item(&mut self, item: &Item) -> Result<()> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| TeaError::format("header has no item section"))?;
        let block = encode_item(item, layout, &self.header.times, self.header.byte_order)?;
        self.writer
            .write_all(&block)
            .map_err(|e| TeaError::io(format!("item {}", self.items_written), e))?;
        tracing::trace!(index = self.items_written, "Encoded item");
        self.items_written += 1;
        Ok(())
    }

    /// Encode and write one record.
    pub fn write_record<T: TeaRecord>(&mut self, record: &T) -> Result<()> {
        self.encode_item(&record.to_item())
    }

    /// Encode and write records in order, stopping at the first error.
    pub fn write_records<'a, T, I>(&mut self, records: I) -> Result<usize>
    where
        T: TeaRecord + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut count = 0;
        for record in records {
            self.write_record(record)?;
            count += 1;
        }
        Ok(count)
    }

    /// Flush buffered items and return the underlying writer.
    ///
    /// ItemEnd stays 0, so readers consume items up to the end of the stream.
    pub fn finish(self) -> Result<W> {
        let items = self.items_written;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| TeaError::io("flush", e.into_error()))?;
        tracing::debug!(items, "Finished tea file");
        Ok(inner)
    }
}

impl<W: Write + Seek> TeaWriter<W> {
    /// Flush, record the item region end in the header and return the writer.
    ///
    /// The stream is left positioned after the last item.
    pub fn finish_sealed(self) -> Result<W> {
        let item_size = self.layout.as_ref().map_or(0, FieldLayout::item_size) as u64;
        let region = self.items_written * item_size;
        let item_end = self.bounds.start + region as i64;
        let order = self.header.byte_order;
        let items = self.items_written;

        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| TeaError::io("flush", e.into_error()))?;
        let end = inner
            .stream_position()
            .map_err(|e| TeaError::io("item end", e))?;
        let origin = end
            .checked_sub(item_end as u64)
            .ok_or_else(|| TeaError::format("stream is shorter than the written items"))?;

        inner
            .seek(SeekFrom::Start(origin + ITEM_END_POSITION))
            .and_then(|_| inner.write_all(&order.encode_i64(item_end)))
            .and_then(|()| inner.seek(SeekFrom::Start(end)))
            .and_then(|_| inner.flush())
            .map_err(|e| TeaError::io("item end", e))?;

        tracing::debug!(items, item_end, "Sealed tea file");
        Ok(inner)
    }
}

impl TeaWriter<File> {
    /// Create a TeaFile at `path` and write the header.
    pub fn create(path: &Path, header: Header) -> Result<Self> {
        let file = File::create(path).map_err(|e| TeaError::io(path.display().to_string(), e))?;
        Self::new(file, header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RecordSchema;
    use crate::reader::TeaReader;
    use crate::types::FieldKind;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn tick_header() -> Header {
        let layout = RecordSchema::new("Tick")
            .timestamp("ts")
            .field("volume", FieldKind::Int8)
            .layout()
            .unwrap();
        Header::for_layout(&layout)
    }

    fn tick(volume: i8) -> Item {
        Item::new()
            .with("ts", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
            .with("volume", volume)
    }

    #[test]
    fn test_header_then_items() {
        let mut writer = TeaWriter::new(Vec::new(), tick_header()).unwrap();
        let start = writer.bounds().start as usize;
        writer.encode_item(&tick(10)).unwrap();
        writer.encode_item(&tick(11)).unwrap();
        let bytes = writer.finish().unwrap();

        assert_eq!(bytes.len(), start + 18);
        assert_eq!(bytes[start + 8], 10);
        assert_eq!(bytes[start + 17], 11);
        assert_eq!(&bytes[16..24], &[0; 8]);
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let mut writer = TeaWriter::new(Vec::new(), tick_header()).unwrap();
        let start = writer.bounds().start as usize;
        let bad = tick(1).with("note", "text".to_string());
        assert!(matches!(
            writer.encode_item(&bad),
            Err(TeaError::UnsupportedType { .. })
        ));
        assert_eq!(writer.items_written(), 0);
        assert_eq!(writer.finish().unwrap().len(), start);
    }

    #[test]
    fn test_rejects_invalid_layout() {
        let mut header = tick_header();
        header.item_size = 4;
        assert!(matches!(
            TeaWriter::new(Vec::new(), header),
            Err(TeaError::Format { .. })
        ));
    }

    #[test]
    fn test_finish_sealed() {
        let mut writer = TeaWriter::new(Cursor::new(Vec::new()), tick_header()).unwrap();
        let start = writer.bounds().start;
        for volume in 0..4 {
            writer.encode_item(&tick(volume)).unwrap();
        }
        let cursor = writer.finish_sealed().unwrap();
        assert_eq!(cursor.position(), start as u64 + 36);

        let bytes = cursor.into_inner();
        assert_eq!(&bytes[16..24], &(start + 36).to_le_bytes());

        let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.bounds().item_count(9), Some(4));
        assert_eq!(reader.items().count(), 4);
    }
}
