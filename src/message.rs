//! Inbound message recognition and outbound message serialization (§4.C).
//!
//! Inbound parsing is resumable at message boundaries: any nested reader reporting `Incomplete`
//! propagates straight out of `parse`, and the caller is expected to leave the underlying buffer
//! untouched (no bytes consumed) so the main loop can read more and retry from scratch.

use crate::buffer::{Buffer, Cursor};
use crate::codec::*;
use crate::constants::*;
use crate::err::Errno;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Incomplete,
    /// Fatal: malformed frame, forbidden type from the controller, or bad arity.
    Malformed,
}

impl From<CodecError> for ParseError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Incomplete => ParseError::Incomplete,
            CodecError::Malformed => ParseError::Malformed,
        }
    }
}

/// A slot id, or `None` for the process-wide `ProcessEnv` target of a nil-slot `env` message.
pub type SlotId = u8;

pub enum Inbound<'a> {
    Ping,
    Version,
    Env {
        slot: Option<SlotId>,
        key: &'a [u8],
        value: &'a [u8],
    },
    Exec {
        slot: SlotId,
        argv: [&'a [u8]; MAX_ARGV],
        argv_count: usize,
    },
    GetFile {
        path: &'a [u8],
    },
    SetFile {
        path: &'a [u8],
        /// Declared length of the payload bin object (§3); payload bytes are not required to be
        /// present in this cursor (§4.E).
        payload_len: usize,
    },
    Kill {
        slot: SlotId,
    },
}

pub struct Parsed<'a> {
    pub message: Inbound<'a>,
    /// Bytes of the raw frame consumed out of the source buffer, for echoing (§4.C) and for
    /// `consume()`ing out of `in_buf`. For `SetFile` this covers the header only, not payload.
    pub len: usize,
}

/// Attempts to parse exactly one message from the front of `data`. Returns `Ok(None)` if `data`
/// does not yet hold a complete message (caller should wait for more bytes); never partially
/// consumes on that path since the cursor it builds is local to this call.
pub fn parse(data: &[u8]) -> Result<Option<Parsed<'_>>, ParseError> {
    let mut cur = Cursor::new(data);

    let arity = match decode_array_header(&mut cur) {
        Ok(n) => n,
        Err(CodecError::Incomplete) => return Ok(None),
        Err(CodecError::Malformed) => return Err(ParseError::Malformed),
    };
    if arity == 0 {
        return Err(ParseError::Malformed);
    }

    let msg_type = match decode_uint(&mut cur) {
        Ok(n) => n,
        Err(CodecError::Incomplete) => return Ok(None),
        Err(CodecError::Malformed) => return Err(ParseError::Malformed),
    };
    let msg_type: u8 = msg_type.try_into().map_err(|_| ParseError::Malformed)?;
    if CONTROLLER_FORBIDDEN_TYPES.contains(&msg_type) {
        return Err(ParseError::Malformed);
    }

    let message = match msg_type {
        MSG_PING if arity == 1 => Inbound::Ping,
        MSG_VERSION if arity == 1 => Inbound::Version,
        MSG_ENV if arity == 4 => parse_env(&mut cur)?,
        MSG_EXEC if arity >= 3 => parse_exec(&mut cur, arity)?,
        MSG_GET_FILE if arity == 2 => parse_get_file(&mut cur)?,
        MSG_SET_FILE if arity == 3 => parse_set_file(&mut cur)?,
        MSG_KILL if arity == 2 => parse_kill(&mut cur)?,
        _ => return Err(ParseError::Malformed),
    };

    Ok(Some(Parsed {
        message,
        len: cur.consumed(),
    }))
}

fn parse_env<'a>(cur: &mut Cursor<'a>) -> Result<Inbound<'a>, ParseError> {
    let slot = match cur.peek() {
        Some(FMT_NIL) => {
            decode_nil(cur).map_err(ParseError::from)?;
            None
        }
        Some(_) => Some(decode_uint(cur).map_err(ParseError::from)?.try_into().map_err(|_| ParseError::Malformed)?),
        None => return Err(ParseError::Incomplete),
    };
    let key = decode_str(cur).map_err(ParseError::from)?;
    let value = decode_str(cur).map_err(ParseError::from)?;
    Ok(Inbound::Env { slot, key, value })
}

fn parse_exec<'a>(cur: &mut Cursor<'a>, arity: usize) -> Result<Inbound<'a>, ParseError> {
    let slot: SlotId = decode_uint(cur)
        .map_err(ParseError::from)?
        .try_into()
        .map_err(|_| ParseError::Malformed)?;
    let argv_count = arity - 2;
    if argv_count == 0 || argv_count > MAX_ARGV {
        return Err(ParseError::Malformed);
    }
    let mut argv: [&[u8]; MAX_ARGV] = [&[]; MAX_ARGV];
    for slot_ in argv.iter_mut().take(argv_count) {
        *slot_ = decode_str(cur).map_err(ParseError::from)?;
    }
    Ok(Inbound::Exec {
        slot,
        argv,
        argv_count,
    })
}

fn parse_get_file<'a>(cur: &mut Cursor<'a>) -> Result<Inbound<'a>, ParseError> {
    let path = decode_str(cur).map_err(ParseError::from)?;
    Ok(Inbound::GetFile { path })
}

fn parse_set_file<'a>(cur: &mut Cursor<'a>) -> Result<Inbound<'a>, ParseError> {
    let path = decode_str(cur).map_err(ParseError::from)?;
    let payload_len = decode_bin_header(cur).map_err(ParseError::from)?;
    Ok(Inbound::SetFile { path, payload_len })
}

fn parse_kill<'a>(cur: &mut Cursor<'a>) -> Result<Inbound<'a>, ParseError> {
    let slot: SlotId = decode_uint(cur)
        .map_err(ParseError::from)?
        .try_into()
        .map_err(|_| ParseError::Malformed)?;
    Ok(Inbound::Kill { slot })
}

// --- outbound ---------------------------------------------------------------

pub fn write_pong(buf: &mut Buffer, now_ns: u64) -> Result<(), Errno> {
    encode_array_header(buf, 2)?;
    encode_uint(buf, MSG_PONG as u64)?;
    encode_uint(buf, now_ns)
}

/// A `log` message with an arbitrary text payload, slot-targeted or process-wide (nil slot).
/// Shared by `write_version_log` and by the fatal-error path, which mirrors a diagnostic to the
/// controller as a `log` message ahead of exit whenever it's still running in the original
/// process (§7).
pub fn write_log_text(buf: &mut Buffer, slot: Option<SlotId>, now_ns: u64, text: &[u8]) -> Result<(), Errno> {
    encode_array_header(buf, 4)?;
    encode_uint(buf, MSG_LOG as u64)?;
    match slot {
        Some(s) => encode_uint(buf, s as u64)?,
        None => encode_nil(buf)?,
    }
    encode_uint(buf, now_ns)?;
    encode_str(buf, text)
}

pub fn write_version_log(buf: &mut Buffer, now_ns: u64) -> Result<(), Errno> {
    write_log_text(buf, None, now_ns, VERSION_STRING.as_bytes())
}

/// Fixed size of a child-output log header written by `write_log_header_fixed`: 1 (array) + 1
/// (type) + 1 (slot) + 9 (ts as uint64) + 3 (chunk length as str16).
///
/// The general codec always picks the narrowest encoding for a given value (§4.B), but that
/// makes a header's width depend on the chunk length — which the dispatcher only learns *after*
/// reading the chunk into the space the header is meant to precede. Pinning the timestamp to
/// uint64 and the chunk length to str16 regardless of magnitude trades a few wasted bytes for a
/// header whose width is a compile-time constant, which is what makes true in-place backfill
/// possible (§4.F, §9): the dispatcher reserves `LOG_HEADER_FIXED_SIZE` bytes, reads the chunk
/// straight into its final position past them, and only then writes the header into the gap.
pub const LOG_HEADER_FIXED_SIZE: usize = 1 + 1 + 1 + 9 + 3;

const _: () = assert!(LOG_HEADER_FIXED_SIZE <= LOG_HEADER_RESERVE);

/// Writes a child-output log header directly into `out`, always at `LOG_HEADER_FIXED_SIZE`
/// bytes. `chunk_len` must fit in a `u16` (it is bounded by `CHILD_CHUNK_SIZE`).
pub fn write_log_header_fixed(out: &mut [u8; LOG_HEADER_FIXED_SIZE], slot: SlotId, now_ns: u64, chunk_len: usize) {
    debug_assert!(chunk_len <= u16::MAX as usize);
    out[0] = FMT_FIXARRAY0 | 4;
    out[1] = MSG_LOG;
    out[2] = slot;
    out[3] = FMT_UINT64;
    out[4..12].copy_from_slice(&now_ns.to_be_bytes());
    out[12] = FMT_STR16;
    out[13..15].copy_from_slice(&(chunk_len as u16).to_be_bytes());
}

pub fn write_result(
    buf: &mut Buffer,
    slot: SlotId,
    now_ns: u64,
    si_code: i32,
    si_status: i32,
) -> Result<(), Errno> {
    encode_array_header(buf, 5)?;
    encode_uint(buf, MSG_RESULT as u64)?;
    encode_uint(buf, slot as u64)?;
    encode_uint(buf, now_ns)?;
    encode_uint(buf, si_code as u64)?;
    encode_uint(buf, si_status as u64)
}

pub fn write_data_header(buf: &mut Buffer, len: usize) -> Result<(), Errno> {
    encode_array_header(buf, 2)?;
    encode_uint(buf, MSG_DATA as u64)?;
    encode_bin_header(buf, len)
}

pub fn write_set_file_reply_header(buf: &mut Buffer, path: &[u8], len: usize) -> Result<(), Errno> {
    encode_array_header(buf, 3)?;
    encode_uint(buf, MSG_SET_FILE as u64)?;
    encode_str(buf, path)?;
    encode_bin_header(buf, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_parses_with_no_remainder() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 1).unwrap();
        encode_uint(&mut buf, MSG_PING as u64).unwrap();
        let parsed = parse(buf.filled()).unwrap().unwrap();
        assert!(matches!(parsed.message, Inbound::Ping));
        assert_eq!(parsed.len, buf.len());
    }

    #[test]
    fn incomplete_array_header_is_none_not_malformed() {
        assert_eq!(parse(&[]).unwrap().map(|_| ()), None);
    }

    #[test]
    fn forbidden_controller_type_is_malformed() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 1).unwrap();
        encode_uint(&mut buf, MSG_PONG as u64).unwrap();
        assert_eq!(parse(buf.filled()), Err(ParseError::Malformed));
    }

    #[test]
    fn env_with_nil_slot_targets_process_env() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 4).unwrap();
        encode_uint(&mut buf, MSG_ENV as u64).unwrap();
        encode_nil(&mut buf).unwrap();
        encode_str(&mut buf, b"FOO").unwrap();
        encode_str(&mut buf, b"bar").unwrap();
        let parsed = parse(buf.filled()).unwrap().unwrap();
        match parsed.message {
            Inbound::Env { slot, key, value } => {
                assert_eq!(slot, None);
                assert_eq!(key, b"FOO");
                assert_eq!(value, b"bar");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn set_file_header_does_not_require_payload_bytes() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 3).unwrap();
        encode_uint(&mut buf, MSG_SET_FILE as u64).unwrap();
        encode_str(&mut buf, b"/tmp/x").unwrap();
        encode_bin_header(&mut buf, 5).unwrap();
        // Note: no payload bytes appended — set_file's header must still parse.
        let parsed = parse(buf.filled()).unwrap().unwrap();
        match parsed.message {
            Inbound::SetFile { path, payload_len } => {
                assert_eq!(path, b"/tmp/x");
                assert_eq!(payload_len, 5);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn log_header_fixed_is_always_the_same_size() {
        let mut small = [0u8; LOG_HEADER_FIXED_SIZE];
        let mut large = [0u8; LOG_HEADER_FIXED_SIZE];
        write_log_header_fixed(&mut small, 3, 1, 2);
        write_log_header_fixed(&mut large, 126, u64::MAX, 1000);
        assert_eq!(small.len(), large.len());
        assert_eq!(large[3], FMT_UINT64);
        assert_eq!(large[12], FMT_STR16);
        assert_eq!(u16::from_be_bytes([large[13], large[14]]), 1000);
    }

    #[test]
    fn split_at_arbitrary_offset_yields_incomplete_not_garbage() {
        let mut buf = Buffer::new();
        encode_array_header(&mut buf, 2).unwrap();
        encode_uint(&mut buf, MSG_KILL as u64).unwrap();
        encode_uint(&mut buf, 4).unwrap();
        let whole = buf.filled();
        for split in 0..whole.len() {
            let prefix = &whole[..split];
            assert_eq!(parse(prefix).unwrap().map(|_| ()), None);
        }
        assert!(parse(whole).unwrap().is_some());
    }
}
