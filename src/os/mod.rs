//! Safe(r) abstractions built on top of `crate::syscall`.

mod block_signals;
mod epoll;
mod exit;
mod fd;
mod fork;
mod kill;
mod print;
mod signalfd;
mod stat;
mod time;

pub use block_signals::*;
pub use epoll::*;
pub use exit::*;
pub use fd::*;
pub use fork::*;
pub use kill::*;
pub use print::*;
pub use signalfd::*;
pub use stat::*;
pub use time::*;
