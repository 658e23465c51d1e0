//! Raw Linux syscall wrappers.
//!
//! Every function here is a thin, `unsafe`, one-to-one wrapper around a single syscall. Safer
//! abstractions live in `crate::os`.

mod clock_gettime;
mod close;
mod dup;
mod epoll;
mod exec;
mod exit;
mod fcntl;
mod fork;
mod fstatat;
mod kill;
mod open;
mod pipe;
mod read;
mod sendfile;
mod signalfd;
mod sigprocmask;
mod splice;
mod write;

pub use clock_gettime::*;
pub use close::*;
pub use dup::*;
pub use epoll::*;
pub use exec::*;
pub use exit::*;
pub use fcntl::*;
pub use fork::*;
pub use fstatat::*;
pub use kill::*;
pub use open::*;
pub use pipe::*;
pub use read::*;
pub use sendfile::*;
pub use signalfd::*;
pub use sigprocmask::*;
pub use splice::*;
pub use write::*;
