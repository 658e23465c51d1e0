use crate::err::*;
use crate::syscall::*;
use crate::types::*;

pub const STDIN: Fd = Fd(0);
pub const STDOUT: Fd = Fd(1);
pub const STDERR: Fd = Fd(2);

pub use crate::syscall::OpenFlags;

/// File descriptor
#[derive(Clone, Copy)]
pub struct Fd(c_int);

impl Fd {
    pub fn open(path: &CStr, flags: OpenFlags, mode: c_int) -> Result<Self, Errno> {
        unsafe { openat(AT_FDCWD, path, flags, mode).map(Self) }
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        unsafe { read(self.0, buf) }
    }

    pub fn write(&self, buf: &[u8]) -> Result<usize, Errno> {
        unsafe { write(self.0, buf) }
    }

    pub fn close(self) -> Result<(), Errno> {
        unsafe { close(self.0) }
    }

    /// Zero-copy bulk transfer from this fd into `out`, tracking `offset` so repeated calls walk
    /// forward through the source file without disturbing its read/write position.
    pub fn sendfile_to(&self, out: &Fd, offset: &mut off_t, count: usize) -> Result<usize, Errno> {
        unsafe { sendfile(out.0, self.0, Some(offset), count) }
    }

    /// Zero-copy bulk transfer from this fd (must be a pipe end) into `out`, bypassing user
    /// space entirely.
    pub fn splice_to(&self, out: &Fd, len: usize) -> Result<usize, Errno> {
        unsafe { splice(self.0, None, out.0, None, len, SpliceFlags::empty()) }
    }

    pub fn set_blocking(&self) -> Result<(), Errno> {
        let flags = unsafe { fcntl_flags(self.0, FcntlCmd::F_GETFL, 0) }?;
        let new_flags = flags & !(OpenFlags::O_NONBLOCK.bits());
        unsafe { fcntl_flags(self.0, FcntlCmd::F_SETFL, new_flags) }?;
        Ok(())
    }

    pub fn set_nonblocking(&self) -> Result<(), Errno> {
        let flags = unsafe { fcntl_flags(self.0, FcntlCmd::F_GETFL, 0) }?;
        let new_flags = flags | OpenFlags::O_NONBLOCK.bits();
        unsafe { fcntl_flags(self.0, FcntlCmd::F_SETFL, new_flags) }?;
        Ok(())
    }

    pub fn dup(&self, new_fd: c_int, flags: OpenFlags) -> Result<Self, Errno> {
        unsafe { dup3(self.0, new_fd, flags).map(Self) }
    }

    /// Install this fd onto `new_fd`, closing whatever `new_fd` previously referred to. Used
    /// pre-exec to wire a child's pipe write end onto stdout/stderr.
    pub fn dup_onto(&self, new_fd: c_int) -> Result<Self, Errno> {
        self.dup(new_fd, OpenFlags::empty())
    }

    pub fn into_raw(self) -> c_int {
        self.0
    }

    pub fn from_raw(fd: c_int) -> Self {
        Self(fd)
    }

    pub fn as_raw(&self) -> c_int {
        self.0
    }

    pub fn new_pipe(flags: OpenFlags) -> Result<(Self, Self), Errno> {
        let mut fds: [c_int; 2] = [0, 0];
        unsafe { pipe2(&mut fds, flags)? };
        Ok((Self::from_raw(fds[0]), Self::from_raw(fds[1])))
    }
}

// Naively, one might expect us to close an Fd on drop. We don't: a pipe's write end is
// deliberately handed to a forked child across the fork boundary with no Rust-side owner left to
// run a destructor, and otherwise fds are closed explicitly at well-defined protocol points (EOF,
// reap).
//
// impl Drop for Fd {
//     fn drop(&mut self) {
//         self.close();
//     }
// }
