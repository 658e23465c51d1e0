use crate::err::*;
use crate::types::*;

pub use crate::syscall::Stat;

/// Passed as `flags` to newfstatat to stat an open fd directly (empty pathname relative to it)
/// instead of a path.
const AT_EMPTY_PATH: c_int = 0x1000;

/// Size of a regular file, via `fstat`-equivalent on an already-open fd.
///
/// `get_file` needs the size of the file it just opened, not a path lookup, so this goes through
/// `newfstatat(fd, "", ..., AT_EMPTY_PATH)` rather than a path-based stat.
#[inline]
pub fn fstat_size(fd: &crate::os::Fd) -> Result<off_t, Errno> {
    let mut statbuf = Stat::default();
    // SAFETY: fd is a valid, open file descriptor; statbuf is a valid local we just created.
    unsafe {
        crate::syscall::fstatat(fd.as_raw(), c"", &mut statbuf, AT_EMPTY_PATH)?;
    }
    Ok(statbuf.st_size)
}
