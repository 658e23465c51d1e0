//! Child process setup, run in the forked child between `fork()` and `execve()` (§4.D "exec").

use ltx_agent::child::{ChildSlot, EnvStore, build_envp};
use ltx_agent::constants::{ENVP_MAX_ENTRIES, ENVP_SCRATCH_SIZE, MAX_ARGV};
use ltx_agent::os::{Fd, STDERR, STDOUT};
use ltx_agent::types::CStr;

/// Runs in the freshly forked child. Never returns: either `execve` takes over, or setup failed
/// and the child exits 1. Per §7, a child that fails between `fork` and `exec` must never write
/// a framed protocol message to fd 1 — only `execve`'d process output goes through the pipe.
pub fn exec_child(slot: &ChildSlot, process_env: &EnvStore, pipe_write: &Fd) -> ! {
    if pipe_write.dup_onto(STDOUT.as_raw()).is_err() || pipe_write.dup_onto(STDERR.as_raw()).is_err() {
        ltx_agent::os::exit(1);
    }
    let _ = pipe_write.close();

    let mut argv_ptrs = [core::ptr::null(); MAX_ARGV + 1];
    // SAFETY: we are the freshly forked child; `slot` outlives the `execve` call below, and
    // nothing else mutates it concurrently (single-threaded).
    unsafe { slot.build_argv(&mut argv_ptrs) };

    let mut envp_scratch = [0u8; ENVP_SCRATCH_SIZE];
    let mut envp_ptrs = [core::ptr::null(); ENVP_MAX_ENTRIES];
    // SAFETY: same as above; `envp_scratch`/`envp_ptrs` outlive the `execve` call.
    if unsafe { build_envp(&slot.env, process_env, &mut envp_scratch, &mut envp_ptrs) }.is_err() {
        ltx_agent::os::exit(1);
    }

    // SAFETY: `argv_ptrs[0]` was NUL-terminated by `set_argv`/`build_argv`.
    let pathname = unsafe { CStr::from_ptr(argv_ptrs[0]) };
    // SAFETY: `argv_ptrs`/`envp_ptrs` are NULL-terminated pointer arrays built just above.
    let _ = unsafe { ltx_agent::syscall::execve(pathname, argv_ptrs.as_ptr(), envp_ptrs.as_ptr()) };
    ltx_agent::os::exit(1);
}
