use crate::err::*;
use crate::syscall::{ClockId, clock_gettime};
use crate::types::timespec;

/// Get monotonically increasing time.
///
/// Prefers `CLOCK_MONOTONIC_RAW` (unaffected by NTP slewing); falls back to `CLOCK_MONOTONIC`
/// on kernels/architectures where the raw clock id is rejected.
///
/// Returns a timespec with tv_sec (seconds) and tv_nsec (nanoseconds).
#[inline]
pub fn get_time_monotonic() -> Result<timespec, Errno> {
    let mut tp = timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };

    // Safety: `tp` is a valid pointer to stack memory we just created.
    if unsafe { clock_gettime(ClockId::CLOCK_MONOTONIC_RAW, &mut tp) }.is_ok() {
        return Ok(tp);
    }

    unsafe { clock_gettime(ClockId::CLOCK_MONOTONIC, &mut tp) }?;
    Ok(tp)
}

/// Monotonic time as nanoseconds, the unit every wire timestamp uses.
#[inline]
pub fn now_ns() -> Result<u64, Errno> {
    let tp = get_time_monotonic()?;
    Ok((tp.tv_sec as u64)
        .saturating_mul(1_000_000_000)
        .saturating_add(tp.tv_nsec as u64))
}
