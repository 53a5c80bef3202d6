//! Bounds-checked field readers over a byte buffer.
//!
//! Every read names the field it decodes so a failure reports where the buffer ran
//! out. Reads never move the cursor on failure.

use crate::error::ParserError;

/// Offset range into the accumulated transaction buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte of the range.
    pub start: usize,
    /// Length of the range in bytes.
    pub len: usize,
}

impl ByteRange {
    /// Creates a range.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// One past the last byte of the range.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns `true` if the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the bytes of this range from `buffer`.
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> Result<&'a [u8], ParserError> {
        buffer
            .get(self.start..self.end())
            .ok_or_else(|| ParserError::buffer_end("ByteRange", self.len, buffer.len()))
    }
}

/// Cursor over a borrowed buffer.
///
/// `base` is the absolute offset of `buffer[0]` inside the full transaction buffer, so
/// ranges recorded by a sub-context stay valid against the whole buffer.
#[derive(Debug, Clone)]
pub struct ParserContext<'a> {
    buffer: &'a [u8],
    offset: usize,
    base: usize,
}

impl<'a> ParserContext<'a> {
    /// Creates a cursor at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            base: 0,
        }
    }

    /// Creates a cursor confined to `range` of the full `buffer`.
    pub fn for_range(buffer: &'a [u8], range: ByteRange) -> Result<Self, ParserError> {
        Ok(Self {
            buffer: range.slice(buffer)?,
            offset: 0,
            base: range.start,
        })
    }

    /// Current offset relative to the start of this cursor's buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current offset relative to the full transaction buffer.
    pub fn absolute_offset(&self) -> usize {
        self.base + self.offset
    }

    /// Length of the buffer this cursor walks.
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Absolute range covering everything consumed since `start` (an absolute offset).
    pub fn range_since(&self, start: usize) -> ByteRange {
        ByteRange::new(start, self.absolute_offset() - start)
    }

    /// Fails with `UnexpectedUnparsedBytes` unless the cursor sits at the buffer end.
    pub fn expect_exhausted(&self) -> Result<(), ParserError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(ParserError::UnexpectedUnparsedBytes(left)),
        }
    }

    /// Reads `n` bytes.
    pub fn read_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], ParserError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ParserError::buffer_end(field, n, remaining));
        }
        let bytes = &self.buffer[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Advances past `n` bytes without returning them.
    pub fn skip_bytes(&mut self, n: usize, field: &'static str) -> Result<(), ParserError> {
        self.read_bytes(n, field).map(|_| ())
    }

    /// Peeks at the next byte without consuming it.
    pub fn peek_u8(&self, field: &'static str) -> Result<u8, ParserError> {
        self.buffer
            .get(self.offset)
            .copied()
            .ok_or_else(|| ParserError::buffer_end(field, 1, 0))
    }

    /// Reads exactly `N` bytes as an array.
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], ParserError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, field)?);
        Ok(out)
    }

    /// Reads a u8.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, ParserError> {
        Ok(self.read_array::<1>(field)?[0])
    }

    /// Reads a u16 in LE format.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, ParserError> {
        self.read_array(field).map(u16::from_le_bytes)
    }

    /// Reads a u32 in LE format.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, ParserError> {
        self.read_array(field).map(u32::from_le_bytes)
    }

    /// Reads a u64 in LE format.
    pub fn read_u64(&mut self, field: &'static str) -> Result<u64, ParserError> {
        self.read_array(field).map(u64::from_le_bytes)
    }

    /// Reads an unsigned LEB128 integer of at most 10 bytes.
    pub fn read_varint(&mut self, field: &'static str) -> Result<u64, ParserError> {
        let start = self.offset;
        let mut value: u64 = 0;
        for i in 0..10u32 {
            let byte = match self.read_u8(field) {
                Ok(byte) => byte,
                Err(e) => {
                    self.offset = start;
                    return Err(e);
                }
            };
            let low = u64::from(byte & 0x7f);
            // The tenth byte may only carry the top bit of a u64.
            if i == 9 && low > 1 {
                self.offset = start;
                return Err(ParserError::ValueOutOfRange(field));
            }
            value |= low << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        self.offset = start;
        Err(ParserError::ValueOutOfRange(field))
    }

    /// Reads a varint length followed by that many bytes.
    pub fn read_length_prefixed(&mut self, field: &'static str) -> Result<&'a [u8], ParserError> {
        let start = self.offset;
        let len = self.read_varint(field)?;
        let len = usize::try_from(len).map_err(|_| ParserError::ValueOutOfRange(field))?;
        self.read_bytes(len, field).inspect_err(|_| self.offset = start)
    }

    /// Reads a strict boolean byte.
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, ParserError> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => {
                self.offset -= 1;
                Err(ParserError::UnexpectedValue {
                    field,
                    value: u64::from(other),
                })
            }
        }
    }

    /// Reads an option based on option tag byte.
    pub fn read_option<T, F>(&mut self, field: &'static str, f: F) -> Result<Option<T>, ParserError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParserError>,
    {
        if self.read_bool(field)? {
            f(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads a u32 element count, rejecting counts that cannot fit the remaining bytes.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, ParserError> {
        let count = self.read_u32(field)? as usize;
        if count > self.remaining() {
            self.offset -= 4;
            return Err(ParserError::buffer_end(field, count, self.remaining()));
        }
        Ok(count)
    }

    /// Reads a vec of items, preceded by a u32 count.
    pub fn read_vec<T, F>(&mut self, field: &'static str, mut f: F) -> Result<Vec<T>, ParserError>
    where
        F: FnMut(&mut Self) -> Result<T, ParserError>,
    {
        let count = self.read_count(field)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// Reads a u32 length-prefixed UTF-8 string.
    pub fn read_string(&mut self, field: &'static str) -> Result<String, ParserError> {
        let len = self.read_count(field)?;
        let bytes = self.read_bytes(len, field)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ParserError::UnexpectedCharacters(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn fixed_width_reads_advance_cursor() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut ctx = ParserContext::new(&data);
        assert_eq!(ctx.read_u8("a").unwrap(), 0x01);
        assert_eq!(ctx.read_u16("b").unwrap(), 0x0302);
        assert_eq!(ctx.read_u32("c").unwrap(), 0x0706_0504);
        assert!(ctx.is_exhausted());
    }

    #[test]
    fn read_past_end_fails_without_moving() {
        let data = [0xff; 3];
        let mut ctx = ParserContext::new(&data);
        ctx.read_u8("first").unwrap();
        let err = ctx.read_u32("second").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferExhausted);
        assert_eq!(
            err,
            ParserError::UnexpectedBufferEnd {
                field: "second",
                needed: 4,
                remaining: 2
            }
        );
        assert_eq!(ctx.offset(), 1);
    }

    #[test]
    fn varint_decodes_multi_byte_values() {
        let data = [0xe5, 0x8e, 0x26, 0x7f];
        let mut ctx = ParserContext::new(&data);
        assert_eq!(ctx.read_varint("v").unwrap(), 624_485);
        assert_eq!(ctx.read_varint("v").unwrap(), 0x7f);
    }

    #[test]
    fn varint_rejects_overlong_and_truncated_input() {
        let overlong = [0xff; 11];
        let mut ctx = ParserContext::new(&overlong);
        assert_eq!(
            ctx.read_varint("v").unwrap_err(),
            ParserError::ValueOutOfRange("v")
        );
        assert_eq!(ctx.offset(), 0);

        let truncated = [0x80, 0x80];
        let mut ctx = ParserContext::new(&truncated);
        assert_eq!(ctx.read_varint("v").unwrap_err().kind(), ErrorKind::BufferExhausted);
        assert_eq!(ctx.offset(), 0);
    }

    #[test]
    fn length_prefixed_and_strings() {
        let mut data = vec![0x03, b'a', b'b', b'c'];
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(b"hi");
        let mut ctx = ParserContext::new(&data);
        assert_eq!(ctx.read_length_prefixed("bytes").unwrap(), b"abc");
        assert_eq!(ctx.read_string("text").unwrap(), "hi");
        ctx.expect_exhausted().unwrap();
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut data = 2u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0xc3, 0x28]);
        let mut ctx = ParserContext::new(&data);
        assert_eq!(
            ctx.read_string("name").unwrap_err(),
            ParserError::UnexpectedCharacters("name")
        );
    }

    #[test]
    fn option_tag_must_be_canonical() {
        let data = [0x02, 0x00];
        let mut ctx = ParserContext::new(&data);
        let err = ctx.read_option("opt", |c| c.read_u8("inner")).unwrap_err();
        assert_eq!(err, ParserError::UnexpectedValue { field: "opt", value: 2 });
    }

    #[test]
    fn oversized_count_is_rejected_before_allocation() {
        let data = u32::MAX.to_le_bytes();
        let mut ctx = ParserContext::new(&data);
        let err = ctx.read_vec("items", |c| c.read_u8("item")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferExhausted);
    }

    #[test]
    fn sub_context_reports_absolute_offsets() {
        let data = [0u8; 10];
        let mut ctx = ParserContext::for_range(&data, ByteRange::new(4, 4)).unwrap();
        ctx.skip_bytes(3, "pad").unwrap();
        assert_eq!(ctx.absolute_offset(), 7);
        assert_eq!(ctx.range_since(4), ByteRange::new(4, 3));
        assert!(ctx.skip_bytes(2, "pad").is_err());
        assert!(ParserContext::for_range(&data, ByteRange::new(8, 4)).is_err());
    }
}
