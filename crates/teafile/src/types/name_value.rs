//! Name/value metadata entries.

use uuid::Uuid;

/// Kind tag of a name/value entry, as stored in the NameValue section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameValueKind {
    Int32 = 1,
    Double = 2,
    Text = 3,
    Uuid = 4,
}

impl NameValueKind {
    /// Parse a kind code from the NameValue section.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Int32),
            2 => Some(Self::Double),
            3 => Some(Self::Text),
            4 => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Kind code written to the NameValue section.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Payload of a name/value entry.
///
/// The variant is the kind; there is no separate tag to keep in sync.
#[derive(Debug, Clone, PartialEq)]
pub enum NameValueData {
    Int32(i32),
    Double(f64),
    Text(String),
    Uuid(Uuid),
}

impl NameValueData {
    #[must_use]
    pub fn kind(&self) -> NameValueKind {
        match self {
            Self::Int32(_) => NameValueKind::Int32,
            Self::Double(_) => NameValueKind::Double,
            Self::Text(_) => NameValueKind::Text,
            Self::Uuid(_) => NameValueKind::Uuid,
        }
    }
}

/// A named metadata value carried in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct NameValue {
    pub name: String,
    pub value: NameValueData,
}

impl NameValue {
    /// Create an `Int32` entry.
    pub fn int32(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value: NameValueData::Int32(value),
        }
    }

    /// Create a `Double` entry.
    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: NameValueData::Double(value),
        }
    }

    /// Create a `Text` entry.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: NameValueData::Text(value.into()),
        }
    }

    /// Create a `Uuid` entry.
    pub fn uuid(name: impl Into<String>, value: Uuid) -> Self {
        Self {
            name: name.into(),
            value: NameValueData::Uuid(value),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NameValueKind {
        self.value.kind()
    }
}
