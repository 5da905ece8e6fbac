//! Section framing and primitive access.
//!
//! Every section starts with a 4-byte section id followed by a 4-byte
//! `NextOffset` holding the byte length of the rest of the section. The
//! header reader pulls that many bytes off the stream and parses them with a
//! [`SectionCursor`], so a section can never read past its declared end and
//! fields added by newer writers are skipped.

use std::fmt;
use std::io::{self, Read};

use crate::error::{Result, TeaError};
use crate::types::ByteOrder;

/// Size of the section id plus the `NextOffset` field.
pub const SECTION_PREFIX_LEN: u64 = 8;

/// Section identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Item,
    Time,
    Content,
    NameValue,
}

impl SectionId {
    /// Canonical write order.
    pub const WRITE_ORDER: [Self; 4] = [Self::Item, Self::Content, Self::NameValue, Self::Time];

    /// Parse a section id.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0x0A => Some(Self::Item),
            0x40 => Some(Self::Time),
            0x80 => Some(Self::Content),
            0x81 => Some(Self::NameValue),
            _ => None,
        }
    }

    /// Section id as written to the stream.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Item => 0x0A,
            Self::Time => 0x40,
            Self::Content => 0x80,
            Self::NameValue => 0x81,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Time => write!(f, "time"),
            Self::Content => write!(f, "content"),
            Self::NameValue => write!(f, "name value"),
        }
    }
}

/// Reads fixed-size header values from the stream, counting consumed bytes.
pub(crate) struct StreamReader<'a, R: Read> {
    inner: &'a mut R,
    order: ByteOrder,
    consumed: u64,
}

impl<'a, R: Read> StreamReader<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            order: ByteOrder::default(),
            consumed: 0,
        }
    }

    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn read_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| TeaError::io(field, e))?;
        self.consumed += N as u64;
        Ok(buf)
    }

    pub fn read_i32(&mut self, field: &str) -> Result<i32> {
        let bytes = self.read_array(field)?;
        Ok(self.order.decode_i32(bytes))
    }

    pub fn read_i64(&mut self, field: &str) -> Result<i64> {
        let bytes = self.read_array(field)?;
        Ok(self.order.decode_i64(bytes))
    }

    pub fn read_vec(&mut self, len: usize, field: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = self
            .inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| TeaError::io(field, e))?;
        if read < len {
            return Err(TeaError::truncated(field));
        }
        self.consumed += len as u64;
        Ok(buf)
    }

    /// Discard `len` bytes.
    pub fn skip(&mut self, len: u64, field: &str) -> Result<()> {
        let skipped = io::copy(&mut self.inner.by_ref().take(len), &mut io::sink())
            .map_err(|e| TeaError::io(field, e))?;
        if skipped < len {
            return Err(TeaError::truncated(field));
        }
        self.consumed += len;
        Ok(())
    }
}

/// Parses the body of one section, bounded by its `NextOffset`.
pub(crate) struct SectionCursor<'a> {
    section: SectionId,
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> SectionCursor<'a> {
    pub fn new(section: SectionId, data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            section,
            data,
            pos: 0,
            order,
        }
    }

    /// Bytes left after the fields parsed so far.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                TeaError::format(format!(
                    "{} section: {field} runs past the declared section length of {} bytes",
                    self.section,
                    self.data.len()
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let slice = self.take(N, field)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        Ok(buf)
    }

    pub fn i32(&mut self, field: &str) -> Result<i32> {
        let bytes = self.array(field)?;
        Ok(self.order.decode_i32(bytes))
    }

    pub fn i64(&mut self, field: &str) -> Result<i64> {
        let bytes = self.array(field)?;
        Ok(self.order.decode_i64(bytes))
    }

    pub fn f64(&mut self, field: &str) -> Result<f64> {
        let bytes = self.array(field)?;
        Ok(self.order.decode_f64(bytes))
    }

    /// A non-negative `int32` count, length or offset.
    pub fn count(&mut self, field: &str) -> Result<u32> {
        let value = self.i32(field)?;
        u32::try_from(value).map_err(|_| {
            TeaError::format(format!("{} section: negative {field} {value}", self.section))
        })
    }

    /// A length-prefixed UTF-8 string.
    pub fn string(&mut self, field: &str) -> Result<String> {
        let len = self.count(&format!("{field} length"))?;
        let bytes = self.take(len as usize, field)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            TeaError::format(format!("{} section: {field} is not valid UTF-8", self.section))
        })
    }
}

/// Builds the body of one section.
pub(crate) struct SectionBuffer {
    order: ByteOrder,
    bytes: Vec<u8>,
}

impl SectionBuffer {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            bytes: Vec::new(),
        }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn put_i32(&mut self, value: i32) {
        let bytes = self.order.encode_i32(value);
        self.put_bytes(&bytes);
    }

    pub fn put_i64(&mut self, value: i64) {
        let bytes = self.order.encode_i64(value);
        self.put_bytes(&bytes);
    }

    pub fn put_f64(&mut self, value: f64) {
        let bytes = self.order.encode_f64(value);
        self.put_bytes(&bytes);
    }

    /// A count, length or offset as `int32`.
    pub fn put_count(&mut self, value: usize, field: &str) -> Result<()> {
        let value = i32::try_from(value)
            .map_err(|_| TeaError::format(format!("{field} {value} does not fit in int32")))?;
        self.put_i32(value);
        Ok(())
    }

    /// A length-prefixed UTF-8 string.
    pub fn put_string(&mut self, value: &str, field: &str) -> Result<()> {
        self.put_count(value.len(), &format!("{field} length"))?;
        self.put_bytes(value.as_bytes());
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
