//! MessagePack subset (§4.B): encode always picks the smallest header for the value's
//! magnitude; decode accepts exactly the formats that subset can produce. Multi-byte length
//! fields are big-endian.

use crate::buffer::{Buffer, Cursor};
use crate::constants::*;

#[derive(Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The declared payload extends past the cursor's remainder; caller should rewind and wait
    /// for more bytes. Never a protocol violation by itself.
    Incomplete,
    /// A format byte or arity outside the supported subset. Always fatal.
    Malformed,
}

pub type DecodeResult<T> = Result<T, CodecError>;

// --- encode ---------------------------------------------------------------

pub fn encode_nil(buf: &mut Buffer) -> Result<(), crate::err::Errno> {
    buf.push(&[FMT_NIL])
}

pub fn encode_uint(buf: &mut Buffer, n: u64) -> Result<(), crate::err::Errno> {
    if n <= FIXINT_MAX {
        return buf.push(&[n as u8]);
    }
    if n <= u8::MAX as u64 {
        return buf.push(&[FMT_UINT8, n as u8]);
    }
    if n <= u16::MAX as u64 {
        return buf.push(&[FMT_UINT16, (n >> 8) as u8, n as u8]);
    }
    if n <= u32::MAX as u64 {
        return buf.push(&[
            FMT_UINT32,
            (n >> 24) as u8,
            (n >> 16) as u8,
            (n >> 8) as u8,
            n as u8,
        ]);
    }
    buf.push(&[
        FMT_UINT64,
        (n >> 56) as u8,
        (n >> 48) as u8,
        (n >> 40) as u8,
        (n >> 32) as u8,
        (n >> 24) as u8,
        (n >> 16) as u8,
        (n >> 8) as u8,
        n as u8,
    ])
}

pub fn encode_array_header(buf: &mut Buffer, n: usize) -> Result<(), crate::err::Errno> {
    if n <= FIX_MAX {
        return buf.push(&[FMT_FIXARRAY0 | n as u8]);
    }
    if n <= u16::MAX as usize {
        return buf.push(&[FMT_ARRAY16, (n >> 8) as u8, n as u8]);
    }
    Err(crate::err::Errno::EOVERFLOW)
}

pub fn encode_str(buf: &mut Buffer, s: &[u8]) -> Result<(), crate::err::Errno> {
    encode_str_header(buf, s.len())?;
    buf.push(s)
}

pub fn encode_str_header(buf: &mut Buffer, n: usize) -> Result<(), crate::err::Errno> {
    if n <= FIXSTR_MAX {
        return buf.push(&[FMT_FIXSTR0 | n as u8]);
    }
    if n <= u8::MAX as usize {
        return buf.push(&[FMT_STR8, n as u8]);
    }
    if n <= u16::MAX as usize {
        return buf.push(&[FMT_STR16, (n >> 8) as u8, n as u8]);
    }
    buf.push(&[
        FMT_STR32,
        (n >> 24) as u8,
        (n >> 16) as u8,
        (n >> 8) as u8,
        n as u8,
    ])
}

/// Writes only the bin format byte and length; the caller streams the payload separately (via
/// `sendfile`/`splice`, or a raw `write`) rather than materializing it in `buf` (§4.E).
pub fn encode_bin_header(buf: &mut Buffer, n: usize) -> Result<(), crate::err::Errno> {
    if n <= u8::MAX as usize {
        return buf.push(&[FMT_BIN8, n as u8]);
    }
    if n <= u16::MAX as usize {
        return buf.push(&[FMT_BIN16, (n >> 8) as u8, n as u8]);
    }
    buf.push(&[
        FMT_BIN32,
        (n >> 24) as u8,
        (n >> 16) as u8,
        (n >> 8) as u8,
        n as u8,
    ])
}

// --- decode -----------------------------------------------------------------

fn read_be(cur: &mut Cursor, n: usize) -> DecodeResult<u64> {
    let bytes = cur.take(n).ok_or(CodecError::Incomplete)?;
    let mut v = 0u64;
    for &b in bytes {
        v = (v << 8) | b as u64;
    }
    Ok(v)
}

pub fn decode_nil(cur: &mut Cursor) -> DecodeResult<()> {
    match cur.peek() {
        None => Err(CodecError::Incomplete),
        Some(FMT_NIL) => {
            cur.shift();
            Ok(())
        }
        Some(_) => Err(CodecError::Malformed),
    }
}

/// Decodes any unsigned integer format in the subset (fixint, uint8/16/32/64).
pub fn decode_uint(cur: &mut Cursor) -> DecodeResult<u64> {
    let fmt = cur.peek().ok_or(CodecError::Incomplete)?;
    if fmt <= FIXINT_MAX as u8 {
        cur.shift();
        return Ok(fmt as u64);
    }
    match fmt {
        FMT_UINT8 => {
            cur.shift();
            read_be(cur, 1)
        }
        FMT_UINT16 => {
            cur.shift();
            read_be(cur, 2)
        }
        FMT_UINT32 => {
            cur.shift();
            read_be(cur, 4)
        }
        FMT_UINT64 => {
            cur.shift();
            read_be(cur, 8)
        }
        _ => Err(CodecError::Malformed),
    }
}

/// Decodes a fixarray/array16 header, returning the element count.
pub fn decode_array_header(cur: &mut Cursor) -> DecodeResult<usize> {
    let fmt = cur.peek().ok_or(CodecError::Incomplete)?;
    if fmt & 0xF0 == FMT_FIXARRAY0 {
        cur.shift();
        return Ok((fmt & 0x0F) as usize);
    }
    if fmt == FMT_ARRAY16 {
        cur.shift();
        return Ok(read_be(cur, 2)? as usize);
    }
    Err(CodecError::Malformed)
}

/// Decodes a str format's header and length only, without requiring the payload bytes to be
/// present in the cursor.
fn decode_str_header(cur: &mut Cursor) -> DecodeResult<usize> {
    let fmt = cur.peek().ok_or(CodecError::Incomplete)?;
    if fmt & 0xE0 == FMT_FIXSTR0 {
        cur.shift();
        return Ok((fmt & 0x1F) as usize);
    }
    match fmt {
        FMT_STR8 => {
            cur.shift();
            Ok(read_be(cur, 1)? as usize)
        }
        FMT_STR16 => {
            cur.shift();
            Ok(read_be(cur, 2)? as usize)
        }
        FMT_STR32 => {
            cur.shift();
            Ok(read_be(cur, 4)? as usize)
        }
        _ => Err(CodecError::Malformed),
    }
}

/// Decodes a bin format's header and length only, without requiring the payload bytes to be
/// present in the cursor. Used for `set_file`'s payload object, whose bytes may arrive via
/// `splice` well after the header (§4.D, §4.E).
pub fn decode_bin_header(cur: &mut Cursor) -> DecodeResult<usize> {
    let fmt = cur.peek().ok_or(CodecError::Incomplete)?;
    match fmt {
        FMT_BIN8 => {
            cur.shift();
            Ok(read_be(cur, 1)? as usize)
        }
        FMT_BIN16 => {
            cur.shift();
            Ok(read_be(cur, 2)? as usize)
        }
        FMT_BIN32 => {
            cur.shift();
            Ok(read_be(cur, 4)? as usize)
        }
        _ => Err(CodecError::Malformed),
    }
}

/// Decodes a str object whose full payload must already be present in the cursor. Used for
/// protocol-sized strings: paths, env keys/values, argv entries.
pub fn decode_str<'a>(cur: &mut Cursor<'a>) -> DecodeResult<&'a [u8]> {
    let len = decode_str_header(cur)?;
    cur.take(len).ok_or(CodecError::Incomplete)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_uint(n: u64) {
        let mut buf = Buffer::new();
        encode_uint(&mut buf, n).unwrap();
        let mut cur = Cursor::new(buf.filled());
        assert_eq!(decode_uint(&mut cur).unwrap(), n);
        assert_eq!(cur.consumed(), buf.len());
    }

    #[test]
    fn uint_roundtrip_boundaries() {
        for n in [
            0,
            FIXINT_MAX,
            FIXINT_MAX + 1,
            u8::MAX as u64,
            u8::MAX as u64 + 1,
            u16::MAX as u64,
            u16::MAX as u64 + 1,
            u32::MAX as u64,
            u32::MAX as u64 + 1,
            u64::MAX,
        ] {
            roundtrip_uint(n);
        }
    }

    #[test]
    fn uint_picks_minimal_encoding() {
        let mut buf = Buffer::new();
        encode_uint(&mut buf, 5).unwrap();
        assert_eq!(buf.filled(), &[5]);

        let mut buf = Buffer::new();
        encode_uint(&mut buf, 300).unwrap();
        assert_eq!(buf.filled(), &[FMT_UINT16, 1, 44]);
    }

    #[test]
    fn array_header_fixarray_vs_array16() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 3).unwrap();
        assert_eq!(buf.filled(), &[FMT_FIXARRAY0 | 3]);

        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 16).unwrap();
        assert_eq!(buf.filled(), &[FMT_ARRAY16, 0, 16]);
    }

    #[test]
    fn str_roundtrip_short_and_long() {
        let mut buf = Buffer::new();
        encode_str(&mut buf, b"hi").unwrap();
        let mut cur = Cursor::new(buf.filled());
        assert_eq!(decode_str(&mut cur).unwrap(), b"hi");

        let long = [b'x'; 200];
        let mut buf = Buffer::new();
        encode_str(&mut buf, &long).unwrap();
        assert_eq!(buf.filled()[0], FMT_STR8);
        let mut cur = Cursor::new(buf.filled());
        assert_eq!(decode_str(&mut cur).unwrap(), &long[..]);
    }

    #[test]
    fn str_decode_incomplete_when_payload_missing() {
        let mut buf = Buffer::new();
        encode_str_header(&mut buf, 10).unwrap();
        let mut cur = Cursor::new(buf.filled());
        assert_eq!(decode_str(&mut cur), Err(CodecError::Incomplete));
    }

    #[test]
    fn bin_header_decode_does_not_require_payload() {
        let mut buf = Buffer::new();
        encode_bin_header(&mut buf, 1_000_000).unwrap();
        let mut cur = Cursor::new(buf.filled());
        assert_eq!(decode_bin_header(&mut cur).unwrap(), 1_000_000);
    }

    #[test]
    fn nil_decode() {
        let mut buf = Buffer::new();
        encode_nil(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.filled());
        decode_nil(&mut cur).unwrap();
    }

    #[test]
    fn unsupported_format_is_malformed() {
        let mut cur = Cursor::new(&[0xC1]);
        assert_eq!(decode_uint(&mut cur), Err(CodecError::Malformed));
    }
}
