//! Forward-only scanning of the variable-length MASP spend and output records.
//!
//! Records are stored back to back and have no index, so locating record `k` means
//! walking every record before it. Only the bytes that determine a record's length are
//! read while walking.

use crate::{
    cursor::{ByteRange, ParserContext},
    error::ParserError,
};

/// Extended full viewing key length.
pub const EXTENDED_FVK_LEN: usize = 169;
/// Diversifier length.
pub const DIVERSIFIER_LEN: usize = 11;
/// Spend note: asset type, value, g_d, pk_d, rseed tag, rseed.
pub const SPEND_NOTE_LEN: usize = 32 + 8 + 32 + 32 + 1 + 32;
/// Merkle path node plus its direction byte.
pub const MERKLE_NODE_LEN: usize = 32 + 1;
/// Outgoing viewing key length.
pub const OVK_LEN: usize = 32;
/// Payment address length.
pub const PAYMENT_ADDR_LEN: usize = 43;
/// Output note: asset type, value, rseed.
pub const OUTPUT_NOTE_LEN: usize = 32 + 8 + 32;
/// Output memo length.
pub const MEMO_LEN: usize = 512;
/// MASP asset identifier length.
pub const ASSET_ID_LEN: usize = 32;

const SPEND_FIXED_PREFIX: usize = EXTENDED_FVK_LEN + DIVERSIFIER_LEN + SPEND_NOTE_LEN;

/// Moves `ctx` from the start of a spend record to the start of the next one.
///
/// Returns the absolute range of the skipped record.
pub fn advance_spend_record(ctx: &mut ParserContext<'_>) -> Result<ByteRange, ParserError> {
    let start = ctx.absolute_offset();
    ctx.skip_bytes(SPEND_FIXED_PREFIX, "SpendRecord::prefix")?;
    let path_len = usize::from(ctx.read_u8("SpendRecord::path_len")?);
    ctx.skip_bytes(path_len * MERKLE_NODE_LEN, "SpendRecord::merkle_path")?;
    ctx.skip_bytes(8, "SpendRecord::position")?;
    Ok(ctx.range_since(start))
}

/// Moves `ctx` from the start of an output record to the start of the next one.
///
/// Returns the absolute range of the skipped record.
pub fn advance_output_record(ctx: &mut ParserContext<'_>) -> Result<ByteRange, ParserError> {
    let start = ctx.absolute_offset();
    if ctx.read_bool("OutputRecord::has_ovk")? {
        ctx.skip_bytes(OVK_LEN, "OutputRecord::ovk")?;
    }
    ctx.skip_bytes(
        PAYMENT_ADDR_LEN + OUTPUT_NOTE_LEN + MEMO_LEN,
        "OutputRecord::body",
    )?;
    Ok(ctx.range_since(start))
}

/// One spend record borrowed from the transaction buffer.
#[derive(Debug, Clone, Copy)]
pub struct SpendRecord<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> SpendRecord<'a> {
    /// Absolute offset of the record in the transaction buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Raw record bytes.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Extended full viewing key of the spender.
    pub fn extended_fvk(&self) -> &'a [u8] {
        &self.bytes[..EXTENDED_FVK_LEN]
    }

    /// Note diversifier.
    pub fn diversifier(&self) -> &'a [u8] {
        &self.bytes[EXTENDED_FVK_LEN..EXTENDED_FVK_LEN + DIVERSIFIER_LEN]
    }

    /// Asset identifier of the spent note.
    pub fn asset_type(&self) -> &'a [u8] {
        let start = EXTENDED_FVK_LEN + DIVERSIFIER_LEN;
        &self.bytes[start..start + ASSET_ID_LEN]
    }

    /// Raw value of the spent note.
    pub fn value(&self) -> u64 {
        let start = EXTENDED_FVK_LEN + DIVERSIFIER_LEN + ASSET_ID_LEN;
        read_u64_at(self.bytes, start)
    }

    /// Number of merkle path nodes.
    pub fn path_len(&self) -> usize {
        usize::from(self.bytes[SPEND_FIXED_PREFIX])
    }

    /// Note position in the commitment tree.
    pub fn position(&self) -> u64 {
        read_u64_at(self.bytes, self.bytes.len() - 8)
    }
}

/// One output record borrowed from the transaction buffer.
#[derive(Debug, Clone, Copy)]
pub struct OutputRecord<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> OutputRecord<'a> {
    fn body_start(&self) -> usize {
        if self.bytes[0] == 1 {
            1 + OVK_LEN
        } else {
            1
        }
    }

    /// Absolute offset of the record in the transaction buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Raw record bytes.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Outgoing viewing key, when present.
    pub fn ovk(&self) -> Option<&'a [u8]> {
        (self.bytes[0] == 1).then(|| &self.bytes[1..1 + OVK_LEN])
    }

    /// Recipient payment address.
    pub fn payment_address(&self) -> &'a [u8] {
        let start = self.body_start();
        &self.bytes[start..start + PAYMENT_ADDR_LEN]
    }

    /// Asset identifier of the created note.
    pub fn asset_type(&self) -> &'a [u8] {
        let start = self.body_start() + PAYMENT_ADDR_LEN;
        &self.bytes[start..start + ASSET_ID_LEN]
    }

    /// Raw value of the created note.
    pub fn value(&self) -> u64 {
        read_u64_at(self.bytes, self.body_start() + PAYMENT_ADDR_LEN + ASSET_ID_LEN)
    }

    /// Note memo.
    pub fn memo(&self) -> &'a [u8] {
        &self.bytes[self.bytes.len() - MEMO_LEN..]
    }
}

fn read_u64_at(bytes: &[u8], start: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[start..start + 8]);
    u64::from_le_bytes(raw)
}

/// Generates a forward-only iterator over one record kind.
macro_rules! record_iter {
    ($name:ident, $record:ident, $advance:path) => {
        /// Forward-only iterator over back-to-back records.
        ///
        /// Stops after the first error.
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            buffer: &'a [u8],
            ctx: ParserContext<'a>,
            left: usize,
        }

        impl<'a> $name<'a> {
            /// Iterates `count` records stored in `range` of `buffer`.
            pub fn new(buffer: &'a [u8], range: ByteRange, count: usize) -> Result<Self, ParserError> {
                Ok(Self {
                    buffer,
                    ctx: ParserContext::for_range(buffer, range)?,
                    left: count,
                })
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = Result<$record<'a>, ParserError>;

            fn next(&mut self) -> Option<Self::Item> {
                if self.left == 0 {
                    return None;
                }
                match $advance(&mut self.ctx).and_then(|range| {
                    Ok($record {
                        offset: range.start,
                        bytes: range.slice(self.buffer)?,
                    })
                }) {
                    Ok(record) => {
                        self.left -= 1;
                        Some(Ok(record))
                    }
                    Err(e) => {
                        self.left = 0;
                        Some(Err(e))
                    }
                }
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (0, Some(self.left))
            }
        }
    };
}

record_iter!(SpendRecords, SpendRecord, advance_spend_record);
record_iter!(OutputRecords, OutputRecord, advance_output_record);

/// Absolute offset of spend record `index` within `range`, walking every record before it.
pub fn spend_offset_of(buffer: &[u8], range: ByteRange, index: usize) -> Result<usize, ParserError> {
    record_offset_of(buffer, range, index, advance_spend_record)
}

/// Absolute offset of output record `index` within `range`, walking every record before it.
pub fn output_offset_of(buffer: &[u8], range: ByteRange, index: usize) -> Result<usize, ParserError> {
    record_offset_of(buffer, range, index, advance_output_record)
}

fn record_offset_of<F>(
    buffer: &[u8],
    range: ByteRange,
    index: usize,
    mut advance: F,
) -> Result<usize, ParserError>
where
    F: FnMut(&mut ParserContext<'_>) -> Result<ByteRange, ParserError>,
{
    let mut ctx = ParserContext::for_range(buffer, range)?;
    for _ in 0..index {
        advance(&mut ctx)?;
    }
    if ctx.is_exhausted() {
        return Err(ParserError::buffer_end("record", 1, 0));
    }
    Ok(ctx.absolute_offset())
}
