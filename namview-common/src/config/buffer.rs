//! Accumulation buffer sizing.

/// Capacities of the two regions of the transaction accumulation buffer.
///
/// Chunks land in the volatile region until it is full, after which the content moves to
/// the larger persistent region.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Volatile region size in bytes.
    pub ram_capacity: usize,
    /// Persistent region size in bytes.
    pub flash_capacity: usize,
}

impl BufferConfig {
    /// Largest transaction the buffer can hold.
    pub fn max_len(&self) -> usize {
        self.ram_capacity.max(self.flash_capacity)
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            ram_capacity: 8192,
            flash_capacity: 16384,
        }
    }
}
