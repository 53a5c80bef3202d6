//! Writers for the transaction wire format.

use std::io::{self, Write};

/// Writes a u8.
#[inline]
pub fn write_u8<W: Write>(mut w: W, v: u8) -> io::Result<()> {
    w.write_all(&[v])
}

/// Writes a u32 in LE format.
#[inline]
pub fn write_u32_le<W: Write>(mut w: W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Writes a u64 in LE format.
#[inline]
pub fn write_u64_le<W: Write>(mut w: W, v: u64) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Writes fixed-length bytes as-is.
#[inline]
pub fn write_fixed<const N: usize, W: Write>(mut w: W, bytes: &[u8; N]) -> io::Result<()> {
    w.write_all(bytes)
}

/// Writes an unsigned LEB128 integer.
pub fn write_varint<W: Write>(mut w: W, mut v: u64) -> io::Result<()> {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            return w.write_all(&[byte]);
        }
        w.write_all(&[byte | 0x80])?;
    }
}

/// Writes a varint length followed by the bytes.
pub fn write_length_prefixed<W: Write>(mut w: W, bytes: &[u8]) -> io::Result<()> {
    write_varint(&mut w, bytes.len() as u64)?;
    w.write_all(bytes)
}

/// Writes a u32 length followed by UTF-8 bytes.
pub fn write_string<W: Write>(mut w: W, s: &str) -> io::Result<()> {
    write_u32_le(&mut w, s.len() as u32)?;
    w.write_all(s.as_bytes())
}

/// Writes a 256 bit LE amount holding `v`.
pub fn write_amount<W: Write>(mut w: W, v: u64) -> io::Result<()> {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&v.to_le_bytes());
    w.write_all(&bytes)
}

/// 0 = None, 1 = Some.
pub fn write_option<W, T, F>(mut w: W, value: &Option<T>, mut f: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &T) -> io::Result<()>,
{
    match value {
        None => w.write_all(&[0]),
        Some(val) => {
            w.write_all(&[1])?;
            f(&mut w, val)
        }
    }
}

/// Writes a vec of items, preceded by a u32 count.
pub fn write_vec<W, T, F>(mut w: W, vec: &[T], mut f: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &T) -> io::Result<()>,
{
    write_u32_le(&mut w, vec.len() as u32)?;
    for item in vec {
        f(&mut w, item)?
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use namview_parser::ParserContext;

    #[test]
    fn writers_match_readers() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 624_485).unwrap();
        write_length_prefixed(&mut buf, &[7; 200]).unwrap();
        write_string(&mut buf, "chain").unwrap();
        write_option(&mut buf, &Some(9u64), |w, v| write_u64_le(w, *v)).unwrap();
        write_vec(&mut buf, &[1u8, 2, 3], |w, v| write_u8(w, *v)).unwrap();

        let mut ctx = ParserContext::new(&buf);
        assert_eq!(ctx.read_varint("v").unwrap(), 624_485);
        assert_eq!(ctx.read_length_prefixed("b").unwrap(), &[7; 200]);
        assert_eq!(ctx.read_string("s").unwrap(), "chain");
        assert_eq!(ctx.read_option("o", |c| c.read_u64("o")).unwrap(), Some(9));
        assert_eq!(ctx.read_vec("v", |c| c.read_u8("v")).unwrap(), vec![1, 2, 3]);
        assert!(ctx.is_exhausted());
    }
}
