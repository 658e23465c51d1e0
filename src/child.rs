//! The child-slot table (§3, component D): 127 fixed slots, each with its own argv scratch and
//! packed environment store, plus the process-wide `ProcessEnv` merged into every exec (§4.D).

use crate::constants::*;
use crate::err::Errno;
use crate::os::Fd;
use crate::types::pid_t;
use core::ffi::c_char;

/// A packed, NUL-delimited key/value store with parallel offset tables (§3). Shared shape for
/// both a slot's own environment and the process-wide `ProcessEnv`.
pub struct EnvStore {
    keys: [u8; ENV_KEYS_SIZE],
    keys_off: [u32; MAX_ENV_ENTRIES + 1],
    vals: [u8; ENV_VALS_SIZE],
    vals_off: [u32; MAX_ENV_ENTRIES + 1],
    count: usize,
}

impl EnvStore {
    pub const fn new() -> Self {
        Self {
            keys: [0; ENV_KEYS_SIZE],
            keys_off: [0; MAX_ENV_ENTRIES + 1],
            vals: [0; ENV_VALS_SIZE],
            vals_off: [0; MAX_ENV_ENTRIES + 1],
            count: 0,
        }
    }

    fn find(&self, key: &[u8]) -> Option<usize> {
        (0..self.count).find(|&i| {
            let start = self.keys_off[i] as usize;
            let end = self.keys_off[i + 1] as usize;
            &self.keys[start..end] == key
        })
    }

    /// Applies the env append policy of §4.D: reuse an existing entry for `key`, or append a new
    /// one; a value of a different length than the one it replaces shifts the store's tail by
    /// `new_len - old_len` (§9).
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), Errno> {
        let idx = match self.find(key) {
            Some(i) => i,
            None => {
                if self.count >= MAX_ENV_ENTRIES {
                    return Err(Errno::ENOSPC);
                }
                let i = self.count;
                let key_start = self.keys_off[i] as usize;
                let key_end = key_start + key.len();
                if key_end > self.keys.len() {
                    return Err(Errno::ENOSPC);
                }
                self.keys[key_start..key_end].copy_from_slice(key);
                self.keys_off[i + 1] = key_end as u32;
                // Zero-length value placeholder; the replace logic below fills it in uniformly.
                self.vals_off[i + 1] = self.vals_off[i];
                self.count += 1;
                i
            }
        };

        let old_start = self.vals_off[idx] as usize;
        let old_end = self.vals_off[idx + 1] as usize;
        let old_len = old_end - old_start;
        let new_len = value.len();
        let high_water = self.vals_off[self.count] as usize;

        if new_len != old_len {
            let delta = new_len as i64 - old_len as i64;
            let new_high = high_water as i64 + delta;
            if new_high < 0 || new_high as usize > self.vals.len() {
                return Err(Errno::ENOSPC);
            }
            if old_end < high_water {
                let tail_len = high_water - old_end;
                let dst_start = (old_end as i64 + delta) as usize;
                self.vals.copy_within(old_end..old_end + tail_len, dst_start);
            }
            for off in self.vals_off.iter_mut().take(self.count + 1).skip(idx + 1) {
                *off = (*off as i64 + delta) as u32;
            }
        }

        let new_start = self.vals_off[idx] as usize;
        self.vals[new_start..new_start + new_len].copy_from_slice(value);
        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let i = self.find(key)?;
        let start = self.vals_off[i] as usize;
        let end = self.vals_off[i + 1] as usize;
        Some(&self.vals[start..end])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn entry(&self, i: usize) -> (&[u8], &[u8]) {
        let ks = self.keys_off[i] as usize;
        let ke = self.keys_off[i + 1] as usize;
        let vs = self.vals_off[i] as usize;
        let ve = self.vals_off[i + 1] as usize;
        (&self.keys[ks..ke], &self.vals[vs..ve])
    }
}

/// One of 127 fixed child-process slots.
pub struct ChildSlot {
    /// 0 when free, positive while a child is alive.
    pub pid: pid_t,
    /// Read end of the child's merged stdout/stderr pipe.
    pub out_fd: Option<Fd>,
    args: [u8; ARGS_SCRATCH_SIZE],
    args_len: usize,
    argv_offsets: [u32; MAX_ARGV],
    argv_count: usize,
    pub env: EnvStore,
}

impl ChildSlot {
    pub const fn new() -> Self {
        Self {
            pid: 0,
            out_fd: None,
            args: [0; ARGS_SCRATCH_SIZE],
            args_len: 0,
            argv_offsets: [0; MAX_ARGV],
            argv_count: 0,
            env: EnvStore::new(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.pid == 0
    }

    /// Copies each argv entry NUL-terminated into the slot's scratch (§4.D "Argv parsing"),
    /// replacing whatever a prior exec of this slot left behind.
    pub fn set_argv(&mut self, argv: &[&[u8]]) -> Result<(), Errno> {
        if argv.is_empty() || argv.len() > MAX_ARGV {
            return Err(Errno::EINVAL);
        }
        self.args_len = 0;
        self.argv_count = argv.len();
        for (i, arg) in argv.iter().enumerate() {
            let start = self.args_len;
            let end = start + arg.len() + 1;
            if end > self.args.len() {
                return Err(Errno::ENOSPC);
            }
            self.args[start..start + arg.len()].copy_from_slice(arg);
            self.args[start + arg.len()] = 0;
            self.argv_offsets[i] = start as u32;
            self.args_len = end;
        }
        Ok(())
    }

    /// Builds the NULL-terminated `argv` pointer array for `execve`, valid only as long as
    /// `self` isn't mutated (pointers alias `self.args`).
    ///
    /// # Safety
    /// Must only be called in the forked child right before `execve`; the returned pointers
    /// alias `self`, which must outlive the `execve` call.
    pub unsafe fn build_argv(&self, out: &mut [*const c_char; MAX_ARGV + 1]) -> usize {
        for i in 0..self.argv_count {
            out[i] = unsafe { self.args.as_ptr().add(self.argv_offsets[i] as usize) } as *const c_char;
        }
        out[self.argv_count] = core::ptr::null();
        self.argv_count
    }
}

pub struct ChildTable {
    slots: [ChildSlot; MAX_SLOTS],
    /// `pid_by_slot[i] == slots[i].pid` for any alive slot; invariant maintained by
    /// `set_running`/`clear_pid`.
    pid_by_slot: [pid_t; MAX_SLOTS],
}

impl ChildTable {
    pub const fn new() -> Self {
        const FREE: ChildSlot = ChildSlot::new();
        Self {
            slots: [FREE; MAX_SLOTS],
            pid_by_slot: [0; MAX_SLOTS],
        }
    }

    pub fn slot(&self, id: u8) -> Result<&ChildSlot, Errno> {
        self.slots.get(id as usize).ok_or(Errno::EINVAL)
    }

    pub fn slot_mut(&mut self, id: u8) -> Result<&mut ChildSlot, Errno> {
        self.slots.get_mut(id as usize).ok_or(Errno::EINVAL)
    }

    pub fn set_running(&mut self, id: u8, pid: pid_t, out_fd: Fd) {
        let slot = &mut self.slots[id as usize];
        slot.pid = pid;
        slot.out_fd = Some(out_fd);
        self.pid_by_slot[id as usize] = pid;
    }

    pub fn find_by_pid(&self, pid: pid_t) -> Option<u8> {
        self.pid_by_slot
            .iter()
            .position(|&p| p == pid)
            .map(|i| i as u8)
    }

    /// Clears a slot's pid bookkeeping only, leaving `out_fd` registered and untouched (§4.G).
    /// Called at SIGCHLD time, once the reaper has matched a `signalfd_siginfo` record back to
    /// this slot via `find_by_pid` and emitted its `result` message: the child has exited, but
    /// its log pipe may still hold buffered output and hasn't hit EOF yet, so the output handler
    /// must keep draining it until `clear_out_fd`.
    pub fn clear_pid(&mut self, id: u8) {
        self.slots[id as usize].pid = 0;
        self.pid_by_slot[id as usize] = 0;
    }

    /// Clears a slot's output registration once its log pipe has hit EOF and been closed (§3).
    /// Deliberately leaves `pid`/`pid_by_slot` untouched: pipe EOF and the matching `SIGCHLD`
    /// can be observed in either order (§4.G), and if EOF comes first, the reaper still needs
    /// `find_by_pid` to resolve this slot when the `signalfd_siginfo` record shows up afterward.
    /// Only `clear_pid` ever zeroes the pid side; a slot is fully free once both have run.
    pub fn clear_out_fd(&mut self, id: u8) {
        self.slots[id as usize].out_fd = None;
    }
}

/// Writes `KEY=VALUE\0` for every entry in `slot_env` then every entry in `process_env` into
/// `scratch`, filling `ptrs` with pointers to each and a trailing NULL (§4.D: slot-specific
/// entries first, so they win on key collision via first-occurrence-wins `getenv` semantics).
///
/// # Safety
/// `ptrs`' pointers alias `scratch`; both must outlive the `execve` call that consumes `ptrs`.
pub unsafe fn build_envp(
    slot_env: &EnvStore,
    process_env: &EnvStore,
    scratch: &mut [u8; ENVP_SCRATCH_SIZE],
    ptrs: &mut [*const c_char; ENVP_MAX_ENTRIES],
) -> Result<usize, Errno> {
    let mut pos = 0usize;
    let mut count = 0usize;

    for store in [slot_env, process_env] {
        for i in 0..store.len() {
            let (key, value) = store.entry(i);
            let entry_len = key.len() + 1 + value.len() + 1;
            if pos + entry_len > scratch.len() || count >= ENVP_MAX_ENTRIES - 1 {
                return Err(Errno::ENOSPC);
            }
            let start = pos;
            scratch[pos..pos + key.len()].copy_from_slice(key);
            pos += key.len();
            scratch[pos] = b'=';
            pos += 1;
            scratch[pos..pos + value.len()].copy_from_slice(value);
            pos += value.len();
            scratch[pos] = 0;
            pos += 1;

            ptrs[count] = unsafe { scratch.as_ptr().add(start) } as *const c_char;
            count += 1;
        }
    }

    ptrs[count] = core::ptr::null();
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_latest_value() {
        let mut env = EnvStore::new();
        env.set(b"FOO", b"bar").unwrap();
        assert_eq!(env.get(b"FOO"), Some(&b"bar"[..]));
        env.set(b"FOO", b"baz").unwrap();
        assert_eq!(env.get(b"FOO"), Some(&b"baz"[..]));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn set_shrinking_value_shifts_following_entries() {
        let mut env = EnvStore::new();
        env.set(b"A", b"111111").unwrap();
        env.set(b"B", b"2").unwrap();
        env.set(b"A", b"x").unwrap();
        assert_eq!(env.get(b"A"), Some(&b"x"[..]));
        assert_eq!(env.get(b"B"), Some(&b"2"[..]));
    }

    #[test]
    fn set_growing_value_shifts_following_entries() {
        let mut env = EnvStore::new();
        env.set(b"A", b"1").unwrap();
        env.set(b"B", b"2").unwrap();
        env.set(b"A", b"11111111").unwrap();
        assert_eq!(env.get(b"A"), Some(&b"11111111"[..]));
        assert_eq!(env.get(b"B"), Some(&b"2"[..]));
    }

    #[test]
    fn unrelated_keys_survive_many_updates() {
        let mut env = EnvStore::new();
        env.set(b"PATH", b"/bin").unwrap();
        env.set(b"HOME", b"/root").unwrap();
        for v in [b"a".as_slice(), b"ab", b"a", b"abcd"] {
            env.set(b"PATH", v).unwrap();
        }
        assert_eq!(env.get(b"HOME"), Some(&b"/root"[..]));
    }

    #[test]
    fn child_slot_argv_scratch_is_nul_terminated() {
        let mut slot = ChildSlot::new();
        slot.set_argv(&[b"/bin/true", b"-x"]).unwrap();
        let mut ptrs = [core::ptr::null(); MAX_ARGV + 1];
        let n = unsafe { slot.build_argv(&mut ptrs) };
        assert_eq!(n, 2);
        assert!(!ptrs[0].is_null());
        assert!(!ptrs[1].is_null());
        assert!(ptrs[2].is_null());
    }

    #[test]
    fn clear_pid_then_clear_out_fd_frees_the_slot() {
        let mut table = ChildTable::new();
        let fd = Fd::from_raw(3);
        table.set_running(0, 42, fd);
        assert_eq!(table.find_by_pid(42), Some(0));
        table.clear_pid(0);
        table.clear_out_fd(0);
        assert_eq!(table.find_by_pid(42), None);
        assert!(table.slot(0).unwrap().is_free());
    }

    #[test]
    fn clear_pid_leaves_out_fd_registered_for_the_output_handler() {
        let mut table = ChildTable::new();
        let fd = Fd::from_raw(3);
        table.set_running(0, 42, fd);
        table.clear_pid(0);
        assert_eq!(table.find_by_pid(42), None);
        assert!(table.slot(0).unwrap().out_fd.is_some());
    }

    #[test]
    fn clear_out_fd_before_clear_pid_still_lets_the_reaper_find_the_slot() {
        // Pipe EOF observed before the matching SIGCHLD record: find_by_pid must still resolve.
        let mut table = ChildTable::new();
        let fd = Fd::from_raw(3);
        table.set_running(0, 42, fd);
        table.clear_out_fd(0);
        assert_eq!(table.find_by_pid(42), Some(0));
        assert!(table.slot(0).unwrap().out_fd.is_none());
        table.clear_pid(0);
        assert_eq!(table.find_by_pid(42), None);
    }

    #[test]
    fn slot_id_out_of_range_is_rejected() {
        let table = ChildTable::new();
        assert!(table.slot(200).is_err());
    }

    #[test]
    fn build_envp_puts_slot_entries_before_process_entries() {
        let mut slot_env = EnvStore::new();
        slot_env.set(b"FOO", b"slot").unwrap();
        let mut process_env = EnvStore::new();
        process_env.set(b"FOO", b"process").unwrap();
        process_env.set(b"BAR", b"baz").unwrap();

        let mut scratch = [0u8; ENVP_SCRATCH_SIZE];
        let mut ptrs = [core::ptr::null(); ENVP_MAX_ENTRIES];
        let count = unsafe { build_envp(&slot_env, &process_env, &mut scratch, &mut ptrs).unwrap() };
        assert_eq!(count, 2);

        // First occurrence of FOO= wins, matching getenv's linear-scan semantics.
        let first = unsafe { core::ffi::CStr::from_ptr(ptrs[0]) };
        assert_eq!(first.to_bytes(), b"FOO=slot");
    }
}
