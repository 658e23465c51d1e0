//! Per-message-type handlers (§4.D). Each function receives only the `Agent` fields it needs,
//! borrowed independently by the caller in `dispatch.rs`, plus data already copied or borrowed
//! out of the just-parsed `Inbound` message.

use ltx_agent::buffer::Buffer;
use ltx_agent::child::{ChildTable, EnvStore};
use ltx_agent::constants::PATH_MAX;
use ltx_agent::err::*;
use ltx_agent::message::{self, SlotId};
use ltx_agent::os::{Epoll, EpollEvents, Fd, OpenFlags, STDIN, STDOUT, fork, kill, now_ns};
use ltx_agent::os::{ForkResult, fstat_size};
use ltx_agent::transfer;
use ltx_agent::types::{CStr, Signal};

use crate::state::EV_CHILD_BASE;

pub const PATH_BUF_SIZE: usize = PATH_MAX + 1;

pub fn handle_ping(out_buf: &mut Buffer) {
    let ts = now_ns().or_abort("Unable to get current time");
    message::write_pong(out_buf, ts).or_abort("out_buf overflow (pong)");
}

pub fn handle_version(out_buf: &mut Buffer) {
    let ts = now_ns().or_abort("Unable to get current time");
    message::write_version_log(out_buf, ts).or_abort("out_buf overflow (version log)");
}

pub fn handle_env(
    children: &mut ChildTable,
    process_env: &mut EnvStore,
    slot: Option<SlotId>,
    key: &[u8],
    value: &[u8],
) {
    match slot {
        None => process_env
            .set(key, value)
            .or_abort("Unable to set process environment variable"),
        Some(id) => {
            let slot = children.slot_mut(id).or_abort("env: slot id out of range");
            slot.env
                .set(key, value)
                .or_abort("Unable to set slot environment variable");
        }
    }
}

pub fn handle_exec(
    children: &mut ChildTable,
    process_env: &EnvStore,
    epoll: &Epoll,
    slot_id: SlotId,
    argv: &[&[u8]],
) {
    {
        let slot = children.slot_mut(slot_id).or_abort("exec: slot id out of range");
        slot.set_argv(argv).or_abort("Unable to store argv");
    }

    let (read_fd, write_fd) = Fd::new_pipe(OpenFlags::O_CLOEXEC).or_abort("Unable to create child pipe");

    match fork().or_abort("Unable to fork") {
        ForkResult::Child => {
            let slot = children.slot(slot_id).or_abort("exec: slot id out of range");
            crate::spawn::exec_child(slot, process_env, &write_fd);
        }
        ForkResult::Parent(pid) => {
            let _ = write_fd.close();
            read_fd
                .set_nonblocking()
                .or_abort("Unable to set child pipe non-blocking");
            epoll
                .add(&read_fd, EpollEvents::EPOLLIN, EV_CHILD_BASE + slot_id as u64)
                .or_abort("Unable to register child pipe");
            children.set_running(slot_id, pid, read_fd);
        }
    }
}

pub fn handle_get_file(out_buf: &mut Buffer, path: &[u8]) {
    let mut path_buf = [0u8; PATH_BUF_SIZE];
    // SAFETY: the protocol never embeds a NUL byte in a path string.
    let cpath = unsafe { path_to_cstr(path, &mut path_buf) };

    let file = Fd::open(cpath, OpenFlags::O_RDONLY | OpenFlags::O_CLOEXEC, 0).or_fs_abort("open", cpath);
    let len = fstat_size(&file).or_fs_abort("stat", cpath) as usize;

    message::write_data_header(out_buf, len).or_abort("out_buf overflow (data header)");
    flush_blocking(out_buf);
    transfer::sendfile_all(&STDOUT, &file, len).or_fs_abort("sendfile", cpath);

    let _ = file.close();
}

/// Handles `set_file` (§4.E). `in_buf` has already had the message header (but not the payload)
/// consumed by the caller, so whatever payload bytes already arrived sit at its front; the rest
/// is pulled straight from stdin via `splice`.
pub fn handle_set_file(in_buf: &mut Buffer, out_buf: &mut Buffer, path: &[u8], payload_len: usize) {
    let mut path_buf = [0u8; PATH_BUF_SIZE];
    // SAFETY: the protocol never embeds a NUL byte in a path string.
    let cpath = unsafe { path_to_cstr(path, &mut path_buf) };

    let flags = OpenFlags::O_RDWR | OpenFlags::O_CREAT | OpenFlags::O_TRUNC | OpenFlags::O_CLOEXEC;
    let file = Fd::open(cpath, flags, 0o600).or_fs_abort("open", cpath);

    let buffered = in_buf.len().min(payload_len);
    if buffered > 0 {
        let mut written = 0;
        while written < buffered {
            let n = file.write(&in_buf.filled()[written..buffered]).or_fs_abort("write", cpath);
            written += n;
        }
        in_buf.consume(buffered);
    }

    let remaining = payload_len - buffered;
    if remaining > 0 {
        transfer::splice_all(&STDIN, &file, remaining).or_fs_abort("splice", cpath);
    }

    message::write_set_file_reply_header(out_buf, path, payload_len)
        .or_abort("out_buf overflow (set_file reply)");
    flush_blocking(out_buf);
    transfer::sendfile_all(&STDOUT, &file, payload_len).or_fs_abort("sendfile", cpath);

    let _ = file.close();
}

pub fn handle_kill(children: &ChildTable, slot_id: SlotId) {
    let slot = children.slot(slot_id).or_abort("kill: slot id out of range");
    if slot.pid == 0 {
        return;
    }
    match kill(slot.pid, Signal::SIGKILL) {
        Ok(()) => {}
        Err(Errno::ESRCH) => {} // already exited; tolerated (§7)
        Err(e) => Err(e).or_abort("Unable to kill child"),
    }
}

/// Drains `out_buf` to stdout under blocking I/O, guaranteeing ordering ahead of a direct
/// `sendfile`/`splice` transfer that bypasses `out_buf` entirely (§4.E, §9).
fn flush_blocking(out_buf: &mut Buffer) {
    STDOUT.set_blocking().or_abort("Unable to switch stdout to blocking mode");
    while !out_buf.is_empty() {
        let n = STDOUT.write(out_buf.filled()).or_abort("Unable to write to stdout");
        out_buf.consume(n);
    }
    out_buf.compact();
}

/// Copies `path` (not NUL-terminated on the wire) into `buf`, NUL-terminating it. Truncates to
/// `PATH_MAX` bytes, matching Linux's own path length limit.
///
/// # Safety
/// `path` must not contain an interior NUL byte.
unsafe fn path_to_cstr<'a>(path: &[u8], buf: &'a mut [u8; PATH_BUF_SIZE]) -> &'a CStr {
    let len = path.len().min(PATH_MAX);
    buf[..len].copy_from_slice(&path[..len]);
    buf[len] = 0;
    unsafe { CStr::from_bytes_with_nul_unchecked(&buf[..=len]) }
}
