use crate::err::*;
use crate::os::Fd;
pub use crate::syscall::SigInfo;
use crate::syscall::{SignalFdFlags, signalfd};
use crate::types::*;

/// Maximum number of `signalfd_siginfo` records read in a single batch; matches the child-slot
/// count, since at most 127 children can be pending reap at once.
pub const MAX_SIGINFO_BATCH: usize = 127;

pub struct SignalFd(Fd);

impl SignalFd {
    /// Create a signalfd that delivers only `SIGCHLD`. The caller is responsible for blocking
    /// `SIGCHLD` in the process signal mask first so it is never delivered via the traditional
    /// handler mechanism.
    pub fn new() -> Result<Self, Errno> {
        let mut signals = sigset_t::new_empty_set();
        signals |= Signal::SIGCHLD;

        let flags = SignalFdFlags::SFD_CLOEXEC;
        let fd = unsafe { signalfd(-1, &signals, flags)? };
        Ok(Self(Fd::from_raw(fd)))
    }

    /// Read as many pending `signalfd_siginfo` records as are available, up to the capacity of
    /// `out`, in a single `read()`. Returns the number of records filled in.
    ///
    /// A signalfd read always returns a whole number of fixed-size records; a partial record
    /// would indicate a kernel ABI mismatch with `SigInfo`'s layout.
    pub fn read_batch(&mut self, out: &mut [SigInfo; MAX_SIGINFO_BATCH]) -> Result<usize, Errno> {
        let raw_buf = unsafe {
            core::slice::from_raw_parts_mut(
                out.as_mut_ptr() as *mut u8,
                core::mem::size_of_val(out),
            )
        };
        let bytes = self.0.read(raw_buf)?;
        if !bytes.is_multiple_of(core::mem::size_of::<SigInfo>()) {
            return Err(Errno::EINVAL);
        }
        Ok(bytes / core::mem::size_of::<SigInfo>())
    }

    pub fn as_raw(&self) -> c_int {
        self.0.as_raw()
    }
}
