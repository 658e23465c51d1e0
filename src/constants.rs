//! Fixed-size limits and wire-format constants for the agent protocol.
//!
//! Nothing here is configurable at runtime; the agent consults no environment variables and
//! parses no command-line flags (§6).

/// Maximum number of concurrent child slots. Part of the wire protocol: slot ids are a single
/// byte, and this limit must not change without a protocol version bump.
pub const MAX_SLOTS: usize = 127;

/// `ARG_MAX`-class constant (matches Linux's historical `ARG_MAX`), the basis for every
/// per-slot scratch arena size below.
pub const ARG_MAX: usize = 131_072;

/// Capacity of a slot's `args` scratch, holding NUL-separated argv strings.
pub const ARGS_SCRATCH_SIZE: usize = ARG_MAX / 2;

/// Maximum number of argv entries (including the trailing `NULL` terminator slot) per exec.
pub const MAX_ARGV: usize = 256;

/// Capacity of a slot's (or `ProcessEnv`'s) packed env key store.
pub const ENV_KEYS_SIZE: usize = ARG_MAX / 16;

/// Capacity of a slot's (or `ProcessEnv`'s) packed env value store.
pub const ENV_VALS_SIZE: usize = ARG_MAX / 2;

/// Number of env entries a slot (or `ProcessEnv`) may hold; offset tables are sized
/// `MAX_ENV_ENTRIES + 1` to hold the trailing end sentinel.
pub const MAX_ENV_ENTRIES: usize = 256;

/// Capacity of `in_buf`/`out_buf`. Large enough to hold several framed messages plus a child
/// output chunk without constant draining.
pub const BUFFER_CAPACITY: usize = 16 * 1024;

/// Bytes reserved ahead of a child-output payload in `out_buf` for its backfilled
/// `[array, type, slot, ts, str-header]` prefix (§4.F, §9).
pub const LOG_HEADER_RESERVE: usize = 32;

/// Largest chunk read from a child's output pipe in one go.
pub const CHILD_CHUNK_SIZE: usize = 1024;

/// `epoll_wait` timeout, milliseconds.
pub const EPOLL_TIMEOUT_MILLIS: i32 = 100;

/// Fraction (numerator over `BACKPRESSURE_DENOM`) of `out_buf` capacity that triggers an
/// opportunistic mid-parse drain.
pub const BACKPRESSURE_NUM: usize = 1;
pub const BACKPRESSURE_DENOM: usize = 4;

// MessagePack subset format bytes (§4.B). Fixed points of the wire protocol, not renegotiable.
pub const FMT_FIXINT0: u8 = 0x00;
pub const FMT_FIXARRAY0: u8 = 0x90;
pub const FMT_FIXSTR0: u8 = 0xA0;
pub const FMT_NIL: u8 = 0xC0;
pub const FMT_BIN8: u8 = 0xC4;
pub const FMT_BIN16: u8 = 0xC5;
pub const FMT_BIN32: u8 = 0xC6;
pub const FMT_UINT8: u8 = 0xCC;
pub const FMT_UINT16: u8 = 0xCD;
pub const FMT_UINT32: u8 = 0xCE;
pub const FMT_UINT64: u8 = 0xCF;
pub const FMT_STR8: u8 = 0xD9;
pub const FMT_STR16: u8 = 0xDA;
pub const FMT_STR32: u8 = 0xDB;
pub const FMT_ARRAY16: u8 = 0xDC;

/// Largest fixarray/fixstr length representable without a wider format byte.
pub const FIX_MAX: usize = 15;
pub const FIXSTR_MAX: usize = 31;
pub const FIXINT_MAX: u64 = 0x7F;

// Message type codes (§6), in protocol order.
pub const MSG_PING: u8 = 0;
pub const MSG_PONG: u8 = 1;
pub const MSG_ENV: u8 = 2;
pub const MSG_EXEC: u8 = 3;
pub const MSG_LOG: u8 = 4;
pub const MSG_RESULT: u8 = 5;
pub const MSG_GET_FILE: u8 = 6;
pub const MSG_SET_FILE: u8 = 7;
pub const MSG_DATA: u8 = 8;
pub const MSG_KILL: u8 = 9;
pub const MSG_VERSION: u8 = 10;

/// Message types the controller is never allowed to send; the agent aborts if one arrives.
pub const CONTROLLER_FORBIDDEN_TYPES: [u8; 4] = [MSG_PONG, MSG_LOG, MSG_RESULT, MSG_DATA];

pub const VERSION_STRING: &str = "LTX Version=1.0.0";

/// Upper bound on a combined `envp` scratch: two `EnvStore`s' worth of `KEY=VALUE\0` strings.
pub const ENVP_SCRATCH_SIZE: usize = 2 * (ENV_KEYS_SIZE + ENV_VALS_SIZE + 2 * MAX_ENV_ENTRIES);

/// Upper bound on combined `envp` pointer slots (both stores' entries, plus the trailing NULL).
pub const ENVP_MAX_ENTRIES: usize = 2 * MAX_ENV_ENTRIES + 1;

/// Longest path accepted from the controller for `get_file`/`set_file`, matching Linux's own
/// `PATH_MAX`. Longer paths are truncated rather than rejected outright.
pub const PATH_MAX: usize = 4096;
