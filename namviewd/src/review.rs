//! Feeds a transaction through a sign session and collects what the screen would show.

use std::io::Write;

use namview_common::DisplayMode;
use namview_parser::{Blake2bHasher, DomainHash};
use namview_state::SignSession;
use tracing::{debug, info};

use crate::{config::ReviewerConfig, error::ReviewerError};

/// One display item with all of its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedItem {
    /// Position in the display order.
    pub index: usize,
    /// Item key.
    pub key: String,
    /// Value pages in order.
    pub pages: Vec<String>,
}

/// Builds a session from the config.
pub fn session_from_config(config: &ReviewerConfig) -> Result<SignSession<Blake2bHasher>, ReviewerError> {
    Ok(SignSession::new(
        config.buffer.clone(),
        config.display.clone(),
        config.registry()?,
        Blake2bHasher,
    ))
}

/// Interprets input as hex when it is entirely hex digits (whitespace ignored), raw
/// bytes otherwise.
pub fn decode_input(raw: &[u8]) -> Result<Vec<u8>, ReviewerError> {
    let text: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let text = text.strip_prefix(b"0x").unwrap_or(&text[..]);
    if text.is_empty() || !text.iter().all(u8::is_ascii_hexdigit) {
        return Ok(raw.to_vec());
    }
    hex::decode(text).map_err(|e| ReviewerError::InvalidInput(e.to_string()))
}

/// Streams `bytes` into `session` in `chunk_size` pieces, parses, and reads every page
/// of every item.
pub fn review<H: DomainHash>(
    session: &mut SignSession<H>,
    bytes: &[u8],
    chunk_size: usize,
    mode: DisplayMode,
) -> Result<Vec<ReviewedItem>, ReviewerError> {
    if chunk_size == 0 {
        return Err(ReviewerError::InvalidInput("chunk size must be greater than zero".to_string()));
    }
    session.reset();
    session.set_mode(mode);
    for chunk in bytes.chunks(chunk_size) {
        session.append(chunk)?;
    }
    debug!(len = bytes.len(), chunk_size, "transaction buffered");

    let kind = session.parse()?.kind.name();
    let count = session.num_items()?;
    info!(kind, items = count, mode = ?mode, "reviewing transaction");

    let mut items = Vec::with_capacity(count);
    for index in 0..count {
        let first = session.get_item(index, 0)?;
        let mut pages = Vec::with_capacity(first.page_count);
        pages.push(first.value);
        for page in 1..first.page_count {
            pages.push(session.get_item(index, page)?.value);
        }
        items.push(ReviewedItem {
            index,
            key: first.key,
            pages,
        });
    }
    Ok(items)
}

/// Writes items one page per line, as `[index] key (page/count): value`.
pub fn render<W: Write>(mut w: W, items: &[ReviewedItem]) -> Result<(), ReviewerError> {
    for item in items {
        let count = item.pages.len();
        for (page, value) in item.pages.iter().enumerate() {
            if count > 1 {
                writeln!(w, "[{}] {} ({}/{}): {}", item.index, item.key, page + 1, count, value)?;
            } else {
                writeln!(w, "[{}] {}: {}", item.index, item.key, value)?;
            }
        }
    }
    Ok(())
}
