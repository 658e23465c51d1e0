#![cfg_attr(not(test), allow(unused_attributes))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

// Implementation of features Rust core expects from libc.
//
// This conflicts with anything that uses std, including unit tests. To avoid this conflict, the
// `ltx` binary `mod`s this directly rather than `mod`ing it in the shared `lib.rs`.
#[cfg(not(test))]
#[path = "../libc_shim/mod.rs"]
mod libc_shim;

mod dispatch;
mod handlers;
mod reaper;
mod spawn;
mod state;

use ltx_agent::err::*;
use ltx_agent::os::*;
use state::Agent;

/// # Safety
///
/// Platform ABI guarantees incoming C-style format.
#[cfg(not(test))]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn main(
    _argc: isize,
    _argv: *const *const core::ffi::c_char,
    _envp: *const *const core::ffi::c_char,
) -> isize {
    block_signals().or_abort("Unable to block signals");

    let signalfd = SignalFd::new().or_abort("Unable to create signalfd");
    let epoll = Epoll::new().or_abort("Unable to create epoll set");

    STDOUT
        .set_nonblocking()
        .or_abort("Unable to switch stdout to non-blocking mode");
    STDIN
        .set_nonblocking()
        .or_abort("Unable to switch stdin to non-blocking mode");

    let mut agent = Agent::new(epoll, signalfd);
    dispatch::register_static(&agent).or_abort("Unable to register static epoll fds");
    dispatch::run(&mut agent);
}
