//! Sign session: owns the accumulation buffer and at most one decoded transaction.

use namview_common::{BufferConfig, DisplayConfig, DisplayMode};
use namview_parser::{parse_transaction, DomainHash, ParserError, TokenRegistry, Transaction};
use tracing::{info, warn};

use crate::{
    buffer::TxBuffer,
    items::{count_items, get_item, DisplayItem, ItemContext},
};

/// Errors from driving a [`SignSession`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Decoding or display failed.
    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    /// The operation is not allowed in the current state.
    #[error("Invalid session state: {operation} requires {expected}, session is {actual}")]
    InvalidState {
        /// Operation attempted.
        operation: &'static str,
        /// State the operation needs.
        expected: &'static str,
        /// Current state.
        actual: &'static str,
    },

    /// The chunk does not fit the buffer.
    #[error("Chunk of {len} bytes refused, buffer holds {buffered} of at most {max} bytes")]
    ChunkRefused {
        /// Chunk length.
        len: usize,
        /// Bytes already buffered.
        buffered: usize,
        /// Buffer capacity.
        max: usize,
    },
}

/// Lifecycle of the decoded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Accumulating bytes, nothing decoded.
    Empty,
    /// Decoded successfully.
    Parsed(Transaction),
    /// Decoding failed; no model is exposed.
    Failed(ParserError),
}

impl SessionState {
    /// Short state name for errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Empty => "Empty",
            SessionState::Parsed(_) => "Parsed",
            SessionState::Failed(_) => "Failed",
        }
    }
}

/// One signing request: bytes in, display items out.
#[derive(Debug)]
pub struct SignSession<H> {
    buffer: TxBuffer,
    state: SessionState,
    hasher: H,
    registry: TokenRegistry,
    display: DisplayConfig,
}

impl<H: DomainHash> SignSession<H> {
    /// Creates an empty session.
    pub fn new(buffer: BufferConfig, display: DisplayConfig, registry: TokenRegistry, hasher: H) -> Self {
        Self {
            buffer: TxBuffer::new(buffer),
            state: SessionState::Empty,
            hasher,
            registry,
            display,
        }
    }

    fn invalid(&self, operation: &'static str, expected: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            expected,
            actual: self.state.name(),
        }
    }

    /// Appends a chunk of the transaction.
    pub fn append(&mut self, chunk: &[u8]) -> Result<usize, SessionError> {
        if self.state != SessionState::Empty {
            return Err(self.invalid("append", "Empty"));
        }
        match self.buffer.append(chunk) {
            0 if !chunk.is_empty() => Err(SessionError::ChunkRefused {
                len: chunk.len(),
                buffered: self.buffer.len(),
                max: self.buffer.max_len(),
            }),
            n => Ok(n),
        }
    }

    /// Decodes the accumulated bytes.
    ///
    /// A failure is remembered until [`SignSession::reset`].
    pub fn parse(&mut self) -> Result<&Transaction, SessionError> {
        if self.state != SessionState::Empty {
            return Err(self.invalid("parse", "Empty"));
        }
        match parse_transaction(self.buffer.view(), &self.hasher, &self.registry) {
            Ok(tx) => {
                info!(kind = tx.kind.name(), "session parsed transaction");
                self.state = SessionState::Parsed(tx);
            }
            Err(e) => {
                warn!(error = %e, "session failed to parse transaction");
                self.state = SessionState::Failed(e.clone());
                return Err(e.into());
            }
        }
        match &self.state {
            SessionState::Parsed(tx) => Ok(tx),
            _ => Err(self.invalid("parse", "Parsed")),
        }
    }

    fn parsed(&self, operation: &'static str) -> Result<&Transaction, SessionError> {
        match &self.state {
            SessionState::Parsed(tx) => Ok(tx),
            _ => Err(self.invalid(operation, "Parsed")),
        }
    }

    fn item_context(&self) -> ItemContext<'_, H> {
        ItemContext {
            buffer: self.buffer.view(),
            hasher: &self.hasher,
            registry: &self.registry,
            mode: self.display.mode,
            value_width: self.display.value_width,
        }
    }

    /// Number of display items.
    pub fn num_items(&self) -> Result<usize, SessionError> {
        let tx = self.parsed("num_items")?;
        Ok(count_items(tx, &self.item_context())?)
    }

    /// Page `page_idx` of item `display_idx`.
    pub fn get_item(&self, display_idx: usize, page_idx: usize) -> Result<DisplayItem, SessionError> {
        let tx = self.parsed("get_item")?;
        Ok(get_item(tx, &self.item_context(), display_idx, page_idx)?)
    }

    /// Switches between normal and expert display.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.display.mode = mode;
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.display.mode
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Decoded transaction, if parsing succeeded.
    pub fn transaction(&self) -> Option<&Transaction> {
        match &self.state {
            SessionState::Parsed(tx) => Some(tx),
            _ => None,
        }
    }

    /// Accumulated bytes.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.view()
    }

    /// Drops the model and the accumulated bytes.
    pub fn reset(&mut self) {
        info!(from = self.state.name(), "session reset");
        self.buffer.reset();
        self.state = SessionState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namview_parser::Blake2bHasher;
    use namview_testutils::fixtures;

    fn session() -> SignSession<Blake2bHasher> {
        SignSession::new(
            BufferConfig::default(),
            DisplayConfig::default(),
            fixtures::registry(),
            Blake2bHasher,
        )
    }

    #[test]
    fn lifecycle_empty_parsed_reset() {
        let mut session = session();
        let tx = fixtures::bond(false).build();
        for chunk in tx.chunks(50) {
            assert_eq!(session.append(chunk).unwrap(), chunk.len());
        }
        session.parse().unwrap();
        assert_eq!(session.state().name(), "Parsed");
        assert_eq!(session.num_items().unwrap(), 4);
        assert!(matches!(
            session.append(&[0]).unwrap_err(),
            SessionError::InvalidState { operation: "append", .. }
        ));

        session.reset();
        assert_eq!(session.state(), &SessionState::Empty);
        assert!(session.buffered().is_empty());
        assert!(session.transaction().is_none());
    }

    #[test]
    fn failed_parse_exposes_no_model() {
        let mut session = session();
        let mut tx = fixtures::bond(false).build();
        tx.push(0);
        session.append(&tx).unwrap();
        assert_eq!(
            session.parse().unwrap_err(),
            SessionError::Parser(ParserError::UnexpectedUnparsedBytes(1))
        );
        assert!(matches!(session.state(), SessionState::Failed(_)));
        assert!(matches!(
            session.num_items().unwrap_err(),
            SessionError::InvalidState { expected: "Parsed", actual: "Failed", .. }
        ));
        assert!(session.parse().is_err());
        session.reset();
        assert_eq!(session.state(), &SessionState::Empty);
    }

    #[test]
    fn mode_switch_changes_count() {
        let mut session = session();
        session.append(&fixtures::bond(false).build()).unwrap();
        session.parse().unwrap();
        let normal = session.num_items().unwrap();
        session.set_mode(DisplayMode::Expert);
        assert_eq!(session.num_items().unwrap(), normal + 5);
    }

    #[test]
    fn oversized_chunk_is_refused() {
        let mut session = SignSession::new(
            BufferConfig {
                ram_capacity: 4,
                flash_capacity: 8,
            },
            DisplayConfig::default(),
            fixtures::registry(),
            Blake2bHasher,
        );
        assert_eq!(
            session.append(&[0; 9]).unwrap_err(),
            SessionError::ChunkRefused {
                len: 9,
                buffered: 0,
                max: 8
            }
        );
    }
}
