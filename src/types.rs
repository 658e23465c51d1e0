//! System call types that are strongly associated with specific system calls are defined in the
//! corresponding system call file.  Those shared across many are defined here.

/// When serializing strings, a prefix used to indicate their length
pub type StrLen = u16;

#[allow(non_camel_case_types)]
pub type pid_t = i32;

#[allow(non_camel_case_types)]
pub type uid_t = u32;

#[allow(non_camel_case_types)]
pub type gid_t = u32;

#[allow(non_camel_case_types)]
pub type mode_t = u32;

#[allow(non_camel_case_types)]
pub type off_t = i64;

#[allow(non_camel_case_types)]
pub type c_int = core::ffi::c_int;

#[allow(non_camel_case_types)]
pub type c_short = core::ffi::c_short;

#[allow(non_camel_case_types)]
pub type c_char = core::ffi::c_char;

pub type CStr = core::ffi::CStr;

#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}
const _: () = assert!(core::mem::size_of::<timespec>() == 16);

impl timespec {
    pub fn millis_since(self, earlier: timespec) -> i64 {
        self.tv_sec
            .wrapping_sub(earlier.tv_sec)
            .saturating_mul(1000)
            .saturating_add(self.tv_nsec.wrapping_sub(earlier.tv_nsec) / 1_000_000)
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq)]
#[repr(u32)]
// Only implementing the ones we care about to make matches simpler
pub enum Signal {
    SIGKILL = 9,
    SIGCHLD = 17,
    UNRECOGNIZED = u32::MAX,
}

impl Signal {
    pub fn as_bitmask(self) -> usize {
        debug_assert!(self != Self::UNRECOGNIZED);

        1 << (self as usize - 1)
    }
}

/// Documentation on this type has inconsistent descriptions of its size and format.
/// Possibilities appear to be:
/// - It it should be 1024 bits, one for each 1024 signals
/// - It it should be more than 1024 bits to track information other than signals, but only pass
///   the first 1024 bits to the kernel.
/// - It it should be the machine pointer size.
///
/// In testing, the last was the only one that didn't get an EINVAL from the Linux kernel.  However,
/// more research should be done here to clarify the matter.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct sigset_t(usize);

impl sigset_t {
    pub fn new_empty_set() -> Self {
        Self(0)
    }
}

impl core::ops::BitOr<Signal> for sigset_t {
    type Output = Self;

    fn bitor(self, signal: Signal) -> Self::Output {
        Self(self.0 | signal.as_bitmask())
    }
}

impl core::ops::BitOrAssign<Signal> for sigset_t {
    fn bitor_assign(&mut self, signal: Signal) {
        self.0 |= signal.as_bitmask();
    }
}

impl core::ops::BitAnd<Signal> for sigset_t {
    type Output = Self;

    fn bitand(self, signal: Signal) -> Self::Output {
        Self(self.0 & signal.as_bitmask())
    }
}

