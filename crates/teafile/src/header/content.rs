//! Content section: free-text description of the file.
//!
//! The body after `NextOffset` is a single length-prefixed UTF-8 string.

use super::section::{SectionBuffer, SectionCursor};
use crate::error::Result;
use crate::types::ByteOrder;

/// Parse a Content section body into the description.
pub(crate) fn parse_content_section(cursor: &mut SectionCursor<'_>) -> Result<String> {
    cursor.string("description")
}

/// Build a Content section body.
pub(crate) fn build_content_section(description: &str, order: ByteOrder) -> Result<Vec<u8>> {
    let mut buf = SectionBuffer::new(order);
    buf.put_string(description, "description")?;
    Ok(buf.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeaError;
    use crate::header::section::SectionId;

    #[test]
    fn test_build_and_parse() {
        let bytes = build_content_section("ACME prices, Xetra", ByteOrder::Big).unwrap();
        assert_eq!(bytes.len(), 4 + 18);
        let mut cursor = SectionCursor::new(SectionId::Content, &bytes, ByteOrder::Big);
        assert_eq!(parse_content_section(&mut cursor).unwrap(), "ACME prices, Xetra");
    }

    #[test]
    fn test_utf8_description() {
        let bytes = build_content_section("Börse Zürich", ByteOrder::Little).unwrap();
        let mut cursor = SectionCursor::new(SectionId::Content, &bytes, ByteOrder::Little);
        assert_eq!(parse_content_section(&mut cursor).unwrap(), "Börse Zürich");
    }

    #[test]
    fn test_truncated_description() {
        let mut bytes = build_content_section("prices", ByteOrder::Little).unwrap();
        bytes.truncate(7);
        let mut cursor = SectionCursor::new(SectionId::Content, &bytes, ByteOrder::Little);
        assert!(matches!(
            parse_content_section(&mut cursor),
            Err(TeaError::Format { .. })
        ));
    }
}
