//! SIGCHLD reaping via signalfd (§4.G). Deliberately never calls `wait`/`waitpid`/`waitid`: the
//! exit status travels to the controller entirely through the `signalfd_siginfo` record itself.

use ltx_agent::buffer::Buffer;
use ltx_agent::child::ChildTable;
use ltx_agent::err::*;
use ltx_agent::message;
use ltx_agent::os::{MAX_SIGINFO_BATCH, SigInfo, SignalFd, now_ns};
use ltx_agent::types::Signal;

pub fn reap(children: &mut ChildTable, out_buf: &mut Buffer, signalfd: &mut SignalFd) {
    let mut batch = [SigInfo::new(); MAX_SIGINFO_BATCH];
    let n = signalfd.read_batch(&mut batch).or_abort("Unable to read signalfd");

    for info in &batch[..n] {
        if info.signal() != Signal::SIGCHLD {
            continue;
        }

        let Some(slot) = children.find_by_pid(info.pid()) else {
            continue; // not one of ours (shouldn't happen; we only ever fork exec children)
        };

        let ts = now_ns().or_abort("Unable to get current time");
        message::write_result(out_buf, slot, ts, info.code(), info.status())
            .or_abort("out_buf overflow (result)");
        children.clear_pid(slot);
    }
}
