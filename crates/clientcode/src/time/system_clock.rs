use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// Wall-clock milliseconds since the Unix epoch.
///
/// Unlike a monotonic clock this follows system time adjustments, which is
/// what both the contingency generator (it only looks at the low digits) and
/// cache expiry need. A clock set before 1970 reads as `0` instead of
/// panicking.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource<u64> for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
