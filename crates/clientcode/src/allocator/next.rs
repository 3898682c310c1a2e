#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::ClientCode;

/// Occupancy of the whole code range, one slot per code.
struct InUse([bool; ClientCode::RANGE as usize]);

impl InUse {
    fn new(codes: &[ClientCode]) -> Self {
        let mut slots = [false; ClientCode::RANGE as usize];
        for code in codes {
            slots[code.index()] = true;
        }
        Self(slots)
    }

    const fn contains(&self, code: ClientCode) -> bool {
        self.0[code.index()]
    }
}

/// Returns the code to allocate after the given in-use codes.
///
/// The candidate is one past the largest code in use, wrapping `999` to `1`
/// (and `1` for an empty slice). If the candidate is taken, the range is
/// probed upward from it with [`probe_from`]. Order of `in_use` does not
/// matter.
///
/// Returns `None` only when every code in `[1, 999]` is in use.
///
/// Out-of-range values never get here: [`RecentCodes`](crate::RecentCodes)
/// drops them on ingest. A stray `1500` in the cache is therefore ignored
/// rather than pushing the candidate past `999` and wrapping to `1`, so
/// `[1500, 3]` yields `4`.
///
/// # Example
///
/// ```
/// use clientcode::{ClientCode, next_code};
///
/// let in_use: Vec<ClientCode> = [5, 3, 1].into_iter().filter_map(ClientCode::new).collect();
/// assert_eq!(next_code(&in_use).map(ClientCode::get), Some(6));
///
/// let wrapped: Vec<ClientCode> = [999, 998].into_iter().filter_map(ClientCode::new).collect();
/// assert_eq!(next_code(&wrapped), Some(ClientCode::MIN));
/// ```
#[must_use]
pub fn next_code(in_use: &[ClientCode]) -> Option<ClientCode> {
    let candidate = in_use
        .iter()
        .copied()
        .max()
        .map_or(ClientCode::MIN, ClientCode::wrapping_next);

    if in_use.contains(&candidate) {
        probe_from(in_use, candidate)
    } else {
        Some(candidate)
    }
}

/// Scans the cyclic range upward from `start` for a code not in `in_use`.
///
/// `start` itself is the first candidate and `999` wraps to `1`. The scan is
/// capped at one full lap, so it terminates for any input and returns `None`
/// when the range is exhausted.
#[must_use]
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(in_use), fields(in_use = in_use.len())))]
pub fn probe_from(in_use: &[ClientCode], start: ClientCode) -> Option<ClientCode> {
    let occupied = InUse::new(in_use);
    let mut candidate = start;
    for _ in 0..ClientCode::RANGE {
        if !occupied.contains(candidate) {
            return Some(candidate);
        }
        candidate = candidate.wrapping_next();
    }
    None
}
