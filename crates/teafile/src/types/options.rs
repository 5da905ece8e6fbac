//! Reader and writer options.

/// Default alignment of the item region.
pub const DEFAULT_ALIGNMENT: u64 = 8;

/// Options for reading TeaFiles.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    /// Reject unknown or duplicate sections and inconsistent field layouts
    /// instead of skipping them with a warning.
    pub strict: bool,
}

impl ReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict validation.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Options for writing TeaFiles.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// The item region starts at the header length rounded up to this
    /// multiple (default: 8). Values of 0 or 1 disable alignment.
    pub alignment: u64,
    /// Explicit item region start. Overrides `alignment`.
    pub item_start: Option<i64>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            item_start: None,
        }
    }
}

impl WriterOptions {
    /// Create writer options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item region alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set an explicit item region start.
    #[must_use]
    pub fn with_item_start(mut self, item_start: i64) -> Self {
        self.item_start = Some(item_start);
        self
    }
}
