//! Bundles the dispatcher's owned state (§5: everything lives on one thread, no locks, no
//! shared memory beyond this struct).

use ltx_agent::buffer::Buffer;
use ltx_agent::child::{ChildTable, EnvStore};
use ltx_agent::os::{Epoll, SignalFd};

/// Tags stashed in `epoll_event.data` (§4.F). Child pipes are tagged `EV_CHILD_BASE + slot_id`,
/// so a ready event routes straight to its slot without a second lookup.
pub const EV_STDIN: u64 = 0;
pub const EV_STDOUT: u64 = 1;
pub const EV_SIGNALFD: u64 = 2;
pub const EV_CHILD_BASE: u64 = 3;

pub struct Agent {
    pub in_buf: Buffer,
    pub out_buf: Buffer,
    pub children: ChildTable,
    pub process_env: EnvStore,
    pub epoll: Epoll,
    pub signalfd: SignalFd,
    /// Set once a write to stdout has returned `EAGAIN`; cleared when `EV_STDOUT` fires again.
    /// While set, `out_buf` is left to grow (up to its own overflow check) rather than retried.
    pub stdout_blocked: bool,
}

impl Agent {
    pub fn new(epoll: Epoll, signalfd: SignalFd) -> Self {
        Self {
            in_buf: Buffer::new(),
            out_buf: Buffer::new(),
            children: ChildTable::new(),
            process_env: EnvStore::new(),
            epoll,
            signalfd,
            stdout_blocked: false,
        }
    }
}
