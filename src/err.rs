//! # Error handling
//!
//! The agent is never PID 1 and never owns shared system state beyond its own fds, so the only
//! unrecoverable scenario is: display a diagnostic and exit 1.
//!
//! Our print machinery does not support typical Rust `{}`-formatting. Instead, we have
//! specialized functions here for expected multi-field errors such as printing the file path
//! associated with an error message.

use crate::os::*;
use crate::types::*;

pub type Errno = syscalls::Errno;

/// Fixed text mirrored to the controller as a `log` message ahead of exit (§7). The `Print`
/// machinery above only knows how to write a value straight to an `Fd`, not render it into a
/// contiguous byte slice, so the framed copy can't carry the same dynamic message as the fd 2
/// diagnostic; it exists to tell the controller *that* the agent died, not carry the full detail.
const FATAL_LOG_TEXT: &[u8] = b"fatal error, see stderr";

/// Best-effort: only ever called from the original process, never a forked child (which has its
/// own abort path in `agent::spawn` that skips this step, per §7's "must not emit a framed
/// protocol message on fd1" rule for a child that fails pre-exec).
fn notify_controller_fatal() {
    let mut buf = crate::buffer::Buffer::new();
    let ts = now_ns().unwrap_or(0);
    if crate::message::write_log_text(&mut buf, None, ts, FATAL_LOG_TEXT).is_err() {
        return;
    }
    let _ = STDOUT.set_blocking();
    let _ = STDOUT.write(buf.filled());
}

fn abort() -> ! {
    notify_controller_fatal();
    exit(1);
}

pub fn abort_with_msg(msg: &str) -> ! {
    eprint("ERROR: ");
    eprint(msg);
    eprint("\n");

    abort()
}

pub trait OrAbortResult<T> {
    fn or_abort<M: Print>(self, msg: M) -> T;
    fn or_fs_abort(self, operation: &str, path: &CStr) -> T;
}

impl<T> OrAbortResult<T> for Result<T, Errno> {
    fn or_abort<M: Print>(self, msg: M) -> T {
        let e = match self {
            Ok(t) => return t,
            Err(e) => e,
        };

        eprint("ERROR: ");
        eprint(msg);
        if let Some(e) = e.description() {
            eprint(": ");
            eprint(e);
        }
        eprint("\n");

        abort();
    }

    fn or_fs_abort(self, operation: &str, path: &CStr) -> T {
        let e = match self {
            Ok(t) => return t,
            Err(e) => e,
        };

        eprint("ERROR: Unable to ");
        eprint(operation);
        eprint(" ");
        eprint(path);
        if let Some(e) = e.description() {
            eprint(": ");
            eprint(e);
        }
        eprint("\n");

        abort();
    }
}

pub trait OrAbortOption<T> {
    fn or_abort<M: Print>(self, msg: M) -> T;
    fn or_fs_abort(self, operation: &str, path: &CStr) -> T;
}

impl<T> OrAbortOption<T> for Option<T> {
    fn or_abort<M: Print>(self, msg: M) -> T {
        if let Some(t) = self {
            return t;
        };

        eprint("ERROR: ");
        eprint(msg);
        eprint("\n");

        abort();
    }

    fn or_fs_abort(self, operation: &str, path: &CStr) -> T {
        if let Some(t) = self {
            return t;
        };

        eprint("ERROR: Unable to ");
        eprint(operation);
        eprint(" ");
        eprint(path);
        eprint("\n");

        abort();
    }
}
