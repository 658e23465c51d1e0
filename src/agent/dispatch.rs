//! The epoll-driven main loop (§4.F): multiplexes controller I/O, child-process output, and
//! SIGCHLD on a single thread, preserving message order and honoring backpressure.

use crate::handlers;
use crate::reaper;
use crate::state::{Agent, EV_CHILD_BASE, EV_SIGNALFD, EV_STDIN, EV_STDOUT};
use ltx_agent::constants::*;
use ltx_agent::err::*;
use ltx_agent::message::{self, Inbound, LOG_HEADER_FIXED_SIZE, ParseError};
use ltx_agent::os::*;

const MAX_EVENTS: usize = 16;

/// Registers the three fds that live for the agent's entire lifetime. Child pipes are added and
/// removed dynamically by `handlers::handle_exec` and `handle_child_output`. Stdout starts with
/// no interest registered; `drain_stdout` arms `EPOLLOUT` only once a write returns `EAGAIN`, to
/// avoid a level-triggered busy loop on an fd that is almost always writable.
pub fn register_static(agent: &Agent) -> Result<(), Errno> {
    agent.epoll.add(&STDIN, EpollEvents::EPOLLIN, EV_STDIN)?;
    agent.epoll.add(&STDOUT, EpollEvents::empty(), EV_STDOUT)?;
    agent
        .epoll
        .add(&Fd::from_raw(agent.signalfd.as_raw()), EpollEvents::EPOLLIN, EV_SIGNALFD)
}

pub fn run(agent: &mut Agent) -> ! {
    let mut events = [EpollEvent { events: 0, data: 0 }; MAX_EVENTS];
    loop {
        let ready = agent
            .epoll
            .wait(&mut events, EPOLL_TIMEOUT_MILLIS)
            .or_abort("epoll_wait failed");

        // Copy out of the borrow of `agent.epoll` before dispatching, since handlers need
        // `&mut agent` as a whole.
        let mut ready_buf = [(0u64, EpollEvents::empty()); MAX_EVENTS];
        let n = ready.len();
        for (dst, src) in ready_buf.iter_mut().zip(ready.iter()) {
            *dst = (src.data, EpollEvents::from_bits(src.events));
        }

        for &(tag, ev) in &ready_buf[..n] {
            dispatch_one(agent, tag, ev);
        }

        // §4.F step 2: attempt a drain every iteration regardless of how full `out_buf` is; the
        // mid-parse threshold check inside `drain_messages` (§5) only additionally covers a
        // single iteration that parses a long burst of messages before returning here.
        if !agent.stdout_blocked && !agent.out_buf.is_empty() {
            drain_stdout(agent);
        }

        drain_messages(agent);
    }
}

fn dispatch_one(agent: &mut Agent, tag: u64, events: EpollEvents) {
    match tag {
        EV_STDIN => handle_stdin(agent, events),
        EV_STDOUT => {
            agent.stdout_blocked = false;
            agent
                .epoll
                .modify(&STDOUT, EpollEvents::empty(), EV_STDOUT)
                .or_abort("Unable to disarm stdout epoll interest");
            drain_stdout(agent);
        }
        EV_SIGNALFD => {
            let Agent {
                children,
                out_buf,
                signalfd,
                ..
            } = agent;
            reaper::reap(children, out_buf, signalfd);
        }
        other => handle_child_output(agent, (other - EV_CHILD_BASE) as u8, events),
    }
}

fn handle_stdin(agent: &mut Agent, events: EpollEvents) {
    if events.contains(EpollEvents::EPOLLIN) {
        agent.in_buf.compact();
        match STDIN.read(agent.in_buf.spare_mut()) {
            Ok(0) => exit(0),
            Ok(n) => agent.in_buf.advance(n),
            Err(Errno::EAGAIN) => {}
            Err(e) => Err(e).or_abort("Unable to read from stdin"),
        }
    }
    if events.contains(EpollEvents::EPOLLHUP) && agent.in_buf.is_empty() {
        exit(0);
    }
}

/// Drains `out_buf` to stdout, arming `EPOLLOUT` interest and marking the agent blocked if
/// stdout can't take it all right now (§5).
fn drain_stdout(agent: &mut Agent) {
    loop {
        if agent.out_buf.is_empty() {
            agent.out_buf.compact();
            return;
        }
        match STDOUT.write(agent.out_buf.filled()) {
            Ok(n) => agent.out_buf.consume(n),
            Err(Errno::EAGAIN) => {
                agent.stdout_blocked = true;
                agent
                    .epoll
                    .modify(&STDOUT, EpollEvents::EPOLLOUT, EV_STDOUT)
                    .or_abort("Unable to arm stdout epoll interest");
                agent.out_buf.compact();
                return;
            }
            Err(e) => Err(e).or_abort("Unable to write to stdout"),
        }
    }
}

/// Parses and handles every complete message currently sitting in `in_buf`, echoing each raw
/// frame ahead of its handler's own reply (§4.C). Drains `out_buf` opportunistically once it
/// crosses the backpressure threshold (§5).
fn drain_messages(agent: &mut Agent) {
    loop {
        if !agent.stdout_blocked
            && agent.out_buf.len() * BACKPRESSURE_DENOM >= agent.out_buf.capacity() * BACKPRESSURE_NUM
        {
            drain_stdout(agent);
        }

        if agent.in_buf.len() < 2 {
            break;
        }

        let Agent {
            in_buf,
            out_buf,
            children,
            process_env,
            epoll,
            ..
        } = &mut *agent;

        let parsed = match message::parse(in_buf.filled()) {
            Ok(Some(p)) => p,
            Ok(None) | Err(ParseError::Incomplete) => break,
            Err(ParseError::Malformed) => abort_with_msg("malformed frame from controller"),
        };
        let raw_len = parsed.len;

        out_buf
            .push(&in_buf.filled()[..raw_len])
            .or_abort("out_buf overflow (echo)");

        match parsed.message {
            Inbound::Ping => {
                handlers::handle_ping(out_buf);
                in_buf.consume(raw_len);
            }
            Inbound::Version => {
                handlers::handle_version(out_buf);
                in_buf.consume(raw_len);
            }
            Inbound::Env { slot, key, value } => {
                handlers::handle_env(children, process_env, slot, key, value);
                in_buf.consume(raw_len);
            }
            Inbound::Exec { slot, argv, argv_count } => {
                handlers::handle_exec(children, process_env, epoll, slot, &argv[..argv_count]);
                in_buf.consume(raw_len);
            }
            Inbound::GetFile { path } => {
                handlers::handle_get_file(out_buf, path);
                in_buf.consume(raw_len);
            }
            Inbound::SetFile { path, payload_len } => {
                let mut path_buf = [0u8; PATH_MAX + 1];
                let path_len = path.len().min(PATH_MAX);
                path_buf[..path_len].copy_from_slice(&path[..path_len]);
                in_buf.consume(raw_len);
                handlers::handle_set_file(in_buf, out_buf, &path_buf[..path_len], payload_len);
            }
            Inbound::Kill { slot } => {
                handlers::handle_kill(children, slot);
                in_buf.consume(raw_len);
            }
        }
    }
    agent.in_buf.compact();
}

/// Reads one chunk of a child's merged stdout/stderr into `out_buf`'s true final position,
/// backfilling the now-known-length header only after the read (§4.F's "principal
/// copy-avoidance trick"; see `message::LOG_HEADER_FIXED_SIZE` for why the header is fixed-width).
fn handle_child_output(agent: &mut Agent, slot_id: u8, events: EpollEvents) {
    if !(events.contains(EpollEvents::EPOLLIN) || events.contains(EpollEvents::EPOLLHUP)) {
        return;
    }

    let Agent {
        children,
        out_buf,
        epoll,
        ..
    } = &mut *agent;

    let out_fd = match children.slot(slot_id) {
        Ok(slot) => match slot.out_fd {
            Some(fd) => fd,
            None => return,
        },
        Err(_) => return,
    };

    let Some(header_pos) = out_buf.reserve(LOG_HEADER_FIXED_SIZE) else {
        return; // out_buf full; retry once it drains
    };
    let chunk = out_buf
        .available()
        .saturating_sub(LOG_HEADER_FIXED_SIZE)
        .min(CHILD_CHUNK_SIZE);
    if chunk == 0 {
        return;
    }

    match out_fd.read(&mut out_buf.spare_after(LOG_HEADER_FIXED_SIZE)[..chunk]) {
        Ok(0) => {
            let _ = epoll.remove(&out_fd);
            let _ = out_fd.close();
            // Leaves pid bookkeeping alone: the matching SIGCHLD may not have been read yet
            // (§4.G), and the reaper still needs `find_by_pid` to resolve this slot when it is.
            children.clear_out_fd(slot_id);
        }
        Ok(n) => {
            out_buf.advance(LOG_HEADER_FIXED_SIZE + n);
            let ts = now_ns().or_abort("Unable to get current time");
            let mut header = [0u8; LOG_HEADER_FIXED_SIZE];
            message::write_log_header_fixed(&mut header, slot_id, ts, n);
            out_buf.write_at(header_pos, &header);
        }
        Err(Errno::EAGAIN) => {}
        Err(e) => Err(e).or_abort("Unable to read child output"),
    }
}
