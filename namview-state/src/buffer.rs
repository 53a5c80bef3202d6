//! Chunked transaction accumulation.

use namview_common::BufferConfig;
use tracing::{debug, warn};

/// Region currently holding the accumulated bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Small volatile region, used first.
    Ram,
    /// Larger persistent region, used once a chunk overflows the volatile one.
    Flash,
}

/// Accumulates a transaction delivered in chunks.
///
/// Bytes are appended to the volatile region until a chunk would overflow it; the
/// content then moves to the persistent region and appends continue there. A chunk
/// that fits neither region is refused whole.
#[derive(Debug, Clone)]
pub struct TxBuffer {
    config: BufferConfig,
    ram: Vec<u8>,
    flash: Vec<u8>,
    region: Region,
}

impl TxBuffer {
    /// Creates an empty buffer with the given capacities.
    pub fn new(config: BufferConfig) -> Self {
        Self {
            ram: Vec::with_capacity(config.ram_capacity),
            flash: Vec::new(),
            region: Region::Ram,
            config,
        }
    }

    /// Appends `chunk`, returning the number of bytes stored: the chunk length, or 0
    /// when it does not fit.
    pub fn append(&mut self, chunk: &[u8]) -> usize {
        let needed = self.len() + chunk.len();
        match self.region {
            Region::Ram if needed <= self.config.ram_capacity => {
                self.ram.extend_from_slice(chunk);
            }
            Region::Ram if needed <= self.config.flash_capacity => {
                debug!(len = self.ram.len(), "moving buffer to flash region");
                self.flash.clear();
                self.flash.append(&mut self.ram);
                self.flash.extend_from_slice(chunk);
                self.region = Region::Flash;
            }
            Region::Flash if needed <= self.config.flash_capacity => {
                self.flash.extend_from_slice(chunk);
            }
            _ => {
                warn!(
                    chunk = chunk.len(),
                    buffered = self.len(),
                    "chunk refused, buffer full"
                );
                return 0;
            }
        }
        chunk.len()
    }

    /// Drops all accumulated bytes and returns to the volatile region.
    pub fn reset(&mut self) {
        self.ram.clear();
        self.flash.clear();
        self.region = Region::Ram;
    }

    /// Accumulated bytes in append order.
    pub fn view(&self) -> &[u8] {
        match self.region {
            Region::Ram => &self.ram,
            Region::Flash => &self.flash,
        }
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// Returns `true` if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Region holding the bytes.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Largest transaction the buffer accepts.
    pub fn max_len(&self) -> usize {
        self.config.max_len()
    }
}

impl Default for TxBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}
