use crate::err::*;
use crate::types::{c_int, off_t};
use syscalls::{Sysno, syscall};

// `man 2 sendfile`:
//
// SYNOPSIS
//        ssize_t sendfile(int out_fd, int in_fd, off_t *_Nullable offset, size_t count);
//
// RETURN VALUE
//        On success, sendfile() returns the number of bytes written to out_fd. ... On error,
//        -1 is returned, and errno is set to indicate the error.
pub unsafe fn sendfile(
    out_fd: c_int,
    in_fd: c_int,
    offset: Option<&mut off_t>,
    count: usize,
) -> Result<usize, Errno> {
    let offset_ptr = match offset {
        Some(o) => o as *mut off_t as usize,
        None => 0,
    };
    syscall!(Sysno::sendfile, out_fd, in_fd, offset_ptr, count)
}
