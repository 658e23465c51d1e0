use crate::err::*;
use crate::types::c_int;
use syscalls::{Sysno, syscall};

#[allow(non_camel_case_types)]
#[repr(C)]
pub enum FcntlCmd {
    F_GETFL = 3,
    F_SETFL = 4,
}

// `man 2 fcntl`:
//
// SYNOPSIS
//        int fcntl(int fd, int cmd, ... /* arg */ );
//
// RETURN VALUE
//        For a successful call, the return value depends on the operation. ... On error, -1 is
//        returned, and errno is set to indicate the error.
//
// fcntl for F_GETFL/F_SETFL, which take/return integer flags.
pub unsafe fn fcntl_flags(fd: c_int, cmd: FcntlCmd, flags: c_int) -> Result<c_int, Errno> {
    syscall!(Sysno::fcntl, fd, cmd, flags).map(|ret| ret as c_int)
}
