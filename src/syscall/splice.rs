use crate::err::*;
use crate::types::{c_int, off_t};
use syscalls::{Sysno, syscall};

#[derive(Clone, Copy)]
pub struct SpliceFlags(u32);

impl SpliceFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

// `man 2 splice`:
//
// SYNOPSIS
//        ssize_t splice(int fd_in, off_t *_Nullable off_in,
//                        int fd_out, off_t *_Nullable off_out,
//                        size_t len, unsigned int flags);
//
// RETURN VALUE
//        Upon successful completion, splice() returns the number of bytes spliced to or from
//        the pipe. ... On error, splice() returns -1 and errno is set to indicate the error.
pub unsafe fn splice(
    fd_in: c_int,
    off_in: Option<&mut off_t>,
    fd_out: c_int,
    off_out: Option<&mut off_t>,
    len: usize,
    flags: SpliceFlags,
) -> Result<usize, Errno> {
    let off_in_ptr = off_in.map_or(0, |o| o as *mut off_t as usize);
    let off_out_ptr = off_out.map_or(0, |o| o as *mut off_t as usize);
    syscall!(
        Sysno::splice,
        fd_in,
        off_in_ptr,
        fd_out,
        off_out_ptr,
        len,
        flags.bits()
    )
}
