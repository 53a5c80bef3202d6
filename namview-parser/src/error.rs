//! Hold error types for the transaction decoder and display engine.

/// Coarse classification of a [`ParserError`], used by callers that only need to know
/// which class of failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A read crossed the end of the buffer or of a declared sub-range.
    BufferExhausted,
    /// A field carried a value the format does not allow.
    MalformedField,
    /// The decoded structure disagrees with itself or with the buffer.
    StructuralMismatch,
    /// A display index past the item count was requested.
    DisplayIndexOutOfRange,
    /// A page past the page count of an item was requested.
    DisplayPageOutOfRange,
    /// The transaction yields no displayable item.
    NoItems,
}

/// Parser Error Type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    /// No bytes were handed to the decoder.
    #[error("No more data")]
    NoData,

    /// A read would cross the end of the current buffer.
    #[error("Unexpected buffer end reading {field}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedBufferEnd {
        /// Field being read.
        field: &'static str,
        /// Bytes the read needed.
        needed: usize,
        /// Bytes that were left.
        remaining: usize,
    },

    /// An enum tag or discriminant is not recognised.
    #[error("Unexpected value {value} for {field}")]
    UnexpectedValue {
        /// Field being read.
        field: &'static str,
        /// Offending value.
        value: u64,
    },

    /// A string field is not valid UTF-8.
    #[error("Unexpected characters in {0}")]
    UnexpectedCharacters(&'static str),

    /// A section or field appears where the transaction kind does not allow it.
    #[error("Unexpected field: {0}")]
    UnexpectedField(&'static str),

    /// A section that may appear once appears more than once.
    #[error("Unexpected duplicated field: {0}")]
    DuplicatedField(&'static str),

    /// A numeric value is outside its allowed range.
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// A required section or referenced section is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Bytes remain after the structure was fully decoded.
    #[error("Unexpected unparsed bytes: {0} left over")]
    UnexpectedUnparsedBytes(usize),

    /// The embedded shielded section hash does not match the shielded data.
    #[error("Invalid MASP commitment")]
    InvalidMaspCommitment,

    /// The transaction computed to zero display items.
    #[error("Unexpected number of items")]
    UnexpectedNumberOfItems,

    /// Display index past the item count.
    #[error("Display index {index} out of range, {count} items")]
    DisplayIdxOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of items.
        count: usize,
    },

    /// Page index past the page count of an item.
    #[error("Display page {page} out of range, {count} pages")]
    DisplayPageOutOfRange {
        /// Requested page.
        page: usize,
        /// Number of pages.
        count: usize,
    },

    /// An amount does not fit the display formatting.
    #[error("Decimal cannot be parsed")]
    DecimalTooBig,

    /// The caller supplied a zero-width value buffer.
    #[error("Invalid output buffer")]
    InvalidOutputBuffer,

    /// The hash primitive was asked for an unsupported output length.
    #[error("Invalid hash output length {0}")]
    InvalidHashLength(usize),
}

impl ParserError {
    /// Builds the buffer-end error for a read of `needed` bytes with `remaining` left.
    pub(crate) fn buffer_end(field: &'static str, needed: usize, remaining: usize) -> Self {
        ParserError::UnexpectedBufferEnd {
            field,
            needed,
            remaining,
        }
    }

    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::NoData | ParserError::UnexpectedBufferEnd { .. } => {
                ErrorKind::BufferExhausted
            }
            ParserError::UnexpectedValue { .. }
            | ParserError::UnexpectedCharacters(_)
            | ParserError::UnexpectedField(_)
            | ParserError::DuplicatedField(_)
            | ParserError::ValueOutOfRange(_)
            | ParserError::DecimalTooBig
            | ParserError::InvalidOutputBuffer
            | ParserError::InvalidHashLength(_) => ErrorKind::MalformedField,
            ParserError::MissingField(_)
            | ParserError::UnexpectedUnparsedBytes(_)
            | ParserError::InvalidMaspCommitment => ErrorKind::StructuralMismatch,
            ParserError::DisplayIdxOutOfRange { .. } => ErrorKind::DisplayIndexOutOfRange,
            ParserError::DisplayPageOutOfRange { .. } => ErrorKind::DisplayPageOutOfRange,
            ParserError::UnexpectedNumberOfItems => ErrorKind::NoItems,
        }
    }

    /// Fixed, short description suitable for a device screen.
    pub fn description(&self) -> &'static str {
        match self {
            ParserError::NoData => "No more data",
            ParserError::UnexpectedBufferEnd { .. } => "Unexpected buffer end",
            ParserError::UnexpectedValue { .. } => "Unexpected value",
            ParserError::UnexpectedCharacters(_) => "Unexpected characters",
            ParserError::UnexpectedField(_) => "Unexpected field",
            ParserError::DuplicatedField(_) => "Unexpected duplicated field",
            ParserError::ValueOutOfRange(_) => "Value out of range",
            ParserError::MissingField(_) => "missing field",
            ParserError::UnexpectedUnparsedBytes(_) => "Unexpected unparsed bytes",
            ParserError::InvalidMaspCommitment => "Invalid MASP commitment",
            ParserError::UnexpectedNumberOfItems => "Unexpected number of items",
            ParserError::DisplayIdxOutOfRange { .. } => "display index out of range",
            ParserError::DisplayPageOutOfRange { .. } => "display page out of range",
            ParserError::DecimalTooBig => "decimal cannot be parsed",
            ParserError::InvalidOutputBuffer => "invalid output buffer",
            ParserError::InvalidHashLength(_) => "invalid hash length",
        }
    }
}
