//! Safe(r) abstraction over a single epoll set (§4.F). The dispatcher tags every registration
//! with a `u64` so a ready event can be routed without a second lookup; see `agent/dispatch.rs`
//! for the tag scheme.

use crate::err::*;
use crate::os::Fd;
pub use crate::syscall::{EpollEvent, EpollEvents};
use crate::syscall::{EpollCreateFlags, EpollOp, epoll_create1, epoll_ctl, epoll_wait};
use crate::types::c_int;

pub struct Epoll(Fd);

impl Epoll {
    pub fn new() -> Result<Self, Errno> {
        let fd = unsafe { epoll_create1(EpollCreateFlags::EPOLL_CLOEXEC) }?;
        Ok(Self(Fd::from_raw(fd)))
    }

    pub fn add(&self, fd: &Fd, events: EpollEvents, tag: u64) -> Result<(), Errno> {
        let mut event = EpollEvent {
            events: events.bits(),
            data: tag,
        };
        unsafe { epoll_ctl(self.0.as_raw(), EpollOp::EPOLL_CTL_ADD, fd.as_raw(), &mut event) }
    }

    pub fn modify(&self, fd: &Fd, events: EpollEvents, tag: u64) -> Result<(), Errno> {
        let mut event = EpollEvent {
            events: events.bits(),
            data: tag,
        };
        unsafe { epoll_ctl(self.0.as_raw(), EpollOp::EPOLL_CTL_MOD, fd.as_raw(), &mut event) }
    }

    pub fn remove(&self, fd: &Fd) -> Result<(), Errno> {
        let mut event = EpollEvent { events: 0, data: 0 };
        unsafe { epoll_ctl(self.0.as_raw(), EpollOp::EPOLL_CTL_DEL, fd.as_raw(), &mut event) }
    }

    /// Waits up to `timeout_millis`, filling the front of `events` and returning the ready slice.
    pub fn wait<'a>(
        &self,
        events: &'a mut [EpollEvent],
        timeout_millis: c_int,
    ) -> Result<&'a [EpollEvent], Errno> {
        let n = unsafe { epoll_wait(self.0.as_raw(), events, timeout_millis) }?;
        Ok(&events[..n])
    }
}
