//! TeaFile reader.
//!
//! Reads the header on construction, then decodes items one at a time.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{Result, TeaError};
use crate::header::{ItemBounds, read_header};
use crate::item::decode_item;
use crate::layout::{FieldLayout, TeaRecord};
use crate::types::{Header, Item, ReaderOptions};

/// TeaFile reader.
///
/// Holds the decoded header and yields items until the stream ends or the
/// declared item end is reached.
pub struct TeaReader<R: Read> {
    reader: BufReader<R>,
    header: Header,
    bounds: ItemBounds,
    layout: Option<FieldLayout>,
    options: ReaderOptions,
    items_read: u64,
}

impl<R: Read> TeaReader<R> {
    /// Create a reader and decode the header with default options.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Create a reader and decode the header.
    ///
    /// The layout of the Item section is resolved here, so layout errors
    /// surface before any item is read.
    pub fn with_options(reader: R, options: ReaderOptions) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let (header, bounds) = read_header(&mut reader, &options)?;
        let layout = if header.has_item_section() {
            Some(FieldLayout::from_header(&header, options.strict)?)
        } else {
            None
        };
        Ok(Self {
            reader,
            header,
            bounds,
            layout,
            options,
            items_read: 0,
        })
    }

    /// The decoded header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Options the header was read with.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Item region offsets declared by the header.
    pub fn bounds(&self) -> ItemBounds {
        self.bounds
    }

    /// Number of items decoded so far.
    pub fn items_read(&self) -> u64 {
        self.items_read
    }

    /// Decode the next item.
    ///
    /// Returns `Ok(None)` at a clean end: the declared item end, or end of
    /// stream at an item boundary when the item region is open-ended.
    ///
    /// # Errors
    /// [`TeaError::Format`] if the header declares no items, the stream
    /// ends inside an item, or it ends before the declared item end.
    pub fn decode_item(&mut self) -> Result<Option<Item>> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| TeaError::format("header has no item section"))?;
        let expected = self.bounds.item_count(layout.item_size());
        if expected.is_some_and(|count| self.items_read >= count) {
            return Ok(None);
        }

        let mut block = vec![0u8; layout.item_size()];
        let filled = fill_block(&mut self.reader, &mut block, self.items_read)?;
        if filled == 0 {
            if let Some(count) = expected {
                return Err(TeaError::format(format!(
                    "stream ended after {} of {count} declared items",
                    self.items_read
                )));
            }
            return Ok(None);
        }
        if filled < block.len() {
            return Err(TeaError::format(format!(
                "stream ended {filled} bytes into item {} of {} bytes",
                self.items_read,
                block.len()
            )));
        }

        let item = decode_item(&block, layout, &self.header.times, self.header.byte_order)?;
        tracing::trace!(index = self.items_read, "Decoded item");
        self.items_read += 1;
        Ok(Some(item))
    }

    /// Decode the next item into a record type.
    pub fn read_record<T: TeaRecord>(&mut self) -> Result<Option<T>> {
        self.decode_item()?.map(|item| T::from_item(&item)).transpose()
    }

    /// Iterate over the remaining items.
    pub fn items(&mut self) -> Items<'_, R> {
        Items {
            reader: self,
            done: false,
        }
    }

    /// Decode all remaining items into `target`, returning how many were added.
    pub fn read_items_into<C: Extend<Item>>(&mut self, target: &mut C) -> Result<usize> {
        let mut count = 0;
        while let Some(item) = self.decode_item()? {
            target.extend(std::iter::once(item));
            count += 1;
        }
        tracing::debug!(items = count, "Read items");
        Ok(count)
    }

    /// Decode all remaining items as records.
    pub fn read_records<T: TeaRecord>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

impl TeaReader<File> {
    /// Open a TeaFile for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open a TeaFile for reading with options.
    pub fn open_with_options(path: &Path, options: ReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| TeaError::io(path.display().to_string(), e))?;
        Self::with_options(file, options)
    }
}

/// Iterator over the items of a [`TeaReader`]. Stops after the first error.
pub struct Items<'a, R: Read> {
    reader: &'a mut TeaReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Items<'_, R> {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.decode_item() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Read until `block` is full or the stream ends, returning the bytes read.
fn fill_block<R: Read>(reader: &mut R, block: &mut [u8], index: u64) -> Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(TeaError::io(format!("item {index}"), e)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::write_header;
    use crate::layout::RecordSchema;
    use crate::types::{FieldKind, WriterOptions};
    use std::io::Cursor;

    fn tick_file(volumes: &[i8], trailing: &[u8]) -> Vec<u8> {
        let layout = RecordSchema::new("Tick")
            .timestamp("ts")
            .field("volume", FieldKind::Int8)
            .layout()
            .unwrap();
        let header = Header::for_layout(&layout);
        let mut out = Vec::new();
        write_header(&mut out, &header, &WriterOptions::default()).unwrap();
        for (i, &volume) in volumes.iter().enumerate() {
            out.extend_from_slice(&(i as i64 * 1000).to_le_bytes());
            out.push(volume as u8);
        }
        out.extend_from_slice(trailing);
        out
    }

    #[test]
    fn test_reads_until_eof() {
        let mut reader = TeaReader::new(Cursor::new(tick_file(&[1, 2, 3], &[]))).unwrap();
        let mut items = Vec::new();
        assert_eq!(reader.read_items_into(&mut items).unwrap(), 3);
        assert_eq!(items[2].get_as::<i8>("volume").unwrap(), 3);
        assert!(reader.decode_item().unwrap().is_none());
        assert_eq!(reader.items_read(), 3);
    }

    #[test]
    fn test_partial_item_is_format_error() {
        let mut reader = TeaReader::new(Cursor::new(tick_file(&[1], &[0, 0, 0]))).unwrap();
        assert!(reader.decode_item().unwrap().is_some());
        assert!(matches!(reader.decode_item(), Err(TeaError::Format { .. })));
    }

    #[test]
    fn test_stops_at_declared_end() {
        let mut bytes = tick_file(&[1, 2, 3], &[]);
        let start = i64::from_le_bytes(bytes[8..16].try_into().unwrap());
        bytes[16..24].copy_from_slice(&(start + 18).to_le_bytes());

        let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
        let items: Vec<Item> = reader.items().collect::<Result<_>>().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_declared_end_past_stream() {
        let mut bytes = tick_file(&[1], &[]);
        let start = i64::from_le_bytes(bytes[8..16].try_into().unwrap());
        bytes[16..24].copy_from_slice(&(start + 27).to_le_bytes());

        let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
        let results: Vec<Result<Item>> = reader.items().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(TeaError::Format { .. })));
    }

    #[test]
    fn test_no_item_section() {
        let mut out = Vec::new();
        write_header(&mut out, &Header::default(), &WriterOptions::default()).unwrap();
        let mut reader = TeaReader::new(Cursor::new(out)).unwrap();
        assert!(matches!(reader.decode_item(), Err(TeaError::Format { .. })));
    }
}
