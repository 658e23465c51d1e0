use crate::err::*;
use crate::types::c_int;
use core::ops::BitOr;
use syscalls::{Sysno, syscall};

#[derive(Clone, Copy)]
pub struct EpollCreateFlags(c_int);

impl EpollCreateFlags {
    pub const EPOLL_CLOEXEC: Self = Self(0o2000000);

    pub const fn bits(self) -> c_int {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EpollEvents(u32);

impl EpollEvents {
    pub const EPOLLIN: Self = Self(0x001);
    pub const EPOLLOUT: Self = Self(0x004);
    pub const EPOLLERR: Self = Self(0x008);
    pub const EPOLLHUP: Self = Self(0x010);
    pub const EPOLLET: Self = Self(1 << 31);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for EpollEvents {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[allow(non_camel_case_types)]
#[repr(C)]
pub enum EpollOp {
    EPOLL_CTL_ADD = 1,
    EPOLL_CTL_DEL = 2,
    EPOLL_CTL_MOD = 3,
}

/// Matches the kernel's `struct epoll_event` layout (packed on x86_64, natural elsewhere; the
/// `data` union member is always a plain u64 we use to stash a tag, so alignment never matters).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct EpollEvent {
    pub events: u32,
    pub data: u64,
}
const _: () = assert!(core::mem::size_of::<EpollEvent>() == 12);

// `man 2 epoll_create1`:
//
// SYNOPSIS
//        int epoll_create1(int flags);
//
// RETURN VALUE
//        On success, these system calls return a file descriptor. On error, -1 is returned, and
//        errno is set to indicate the error.
pub unsafe fn epoll_create1(flags: EpollCreateFlags) -> Result<c_int, Errno> {
    syscall!(Sysno::epoll_create1, flags.bits()).map(|fd| fd as c_int)
}

// `man 2 epoll_ctl`:
//
// SYNOPSIS
//        int epoll_ctl(int epfd, int op, int fd, struct epoll_event *_Nullable event);
//
// RETURN VALUE
//        When successful, epoll_ctl() returns zero. When an error occurs, epoll_ctl() returns
//        -1 and errno is set to indicate the error.
pub unsafe fn epoll_ctl(
    epfd: c_int,
    op: EpollOp,
    fd: c_int,
    event: &mut EpollEvent,
) -> Result<(), Errno> {
    syscall!(
        Sysno::epoll_ctl,
        epfd,
        op as c_int,
        fd,
        event as *mut EpollEvent
    )
    .map(|_| ())
}

// `man 2 epoll_wait`:
//
// SYNOPSIS
//        int epoll_wait(int epfd, struct epoll_event *events, int maxevents, int timeout);
//
// RETURN VALUE
//        On success, epoll_wait() returns the number of file descriptors ready for the
//        requested I/O, or zero if no file descriptor became ready during the requested
//        timeout milliseconds. On failure, epoll_wait() returns -1.
pub unsafe fn epoll_wait(
    epfd: c_int,
    events: &mut [EpollEvent],
    timeout_millis: c_int,
) -> Result<usize, Errno> {
    syscall!(
        Sysno::epoll_wait,
        epfd,
        events.as_mut_ptr(),
        events.len(),
        timeout_millis
    )
}
