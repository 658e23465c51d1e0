//! Bulk file transfer paths (§4.E): `sendfile` for `get_file` and the read-back half of
//! `set_file`, `splice` for absorbing `set_file`'s payload straight from stdin into the
//! destination file.

use crate::err::Errno;
use crate::os::Fd;
use crate::types::off_t;

/// Sends the entirety of `file` to `out` via `sendfile`, switching `out` to blocking mode for the
/// duration so the whole transfer completes in one synchronous pass (§4.E, §9): the controller is
/// already waiting on this reply, so no other I/O needs servicing in the meantime.
pub fn sendfile_all(out: &Fd, file: &Fd, len: usize) -> Result<(), Errno> {
    out.set_blocking()?;
    let mut offset: off_t = 0;
    let mut remaining = len;
    while remaining > 0 {
        let n = file.sendfile_to(out, &mut offset, remaining)?;
        if n == 0 {
            break;
        }
        remaining -= n;
    }
    out.set_nonblocking()?;
    Ok(())
}

/// Moves `len` bytes directly from `src` (a pipe, typically stdin) into `dst` via `splice`,
/// bypassing `in_buf` entirely. `src` is switched to blocking for the duration, mirroring
/// `sendfile_all`'s rationale: the transfer is synchronous by design.
pub fn splice_all(src: &Fd, dst: &Fd, len: usize) -> Result<(), Errno> {
    src.set_blocking()?;
    let mut remaining = len;
    while remaining > 0 {
        let n = src.splice_to(dst, remaining)?;
        if n == 0 {
            break;
        }
        remaining -= n;
    }
    src.set_nonblocking()?;
    Ok(())
}
