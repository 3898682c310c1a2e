#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ClientCode, RandSource, SystemClock, ThreadRandom, TimeSource};

/// Degraded-mode code generator with no dependency on cache or store.
///
/// The code is built from the last two digits of the millisecond timestamp
/// followed by the last digit of a random draw in `[0, 99]`, then folded into
/// range as `(value mod 999) + 1`.
///
/// Results are **not** checked against codes already in use. A contingency
/// code may collide with a live one.
///
/// # Example
///
/// ```
/// use clientcode::{ContingencyGenerator, RandSource, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_456
///     }
/// }
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn rand(&self) -> u64 {
///         7
///     }
/// }
///
/// let generator = ContingencyGenerator::new(FixedTime, FixedRand);
/// // "56" ++ "7" = 567, folded to 568
/// assert_eq!(generator.next_code().get(), 568);
/// ```
#[derive(Default, Clone, Debug)]
pub struct ContingencyGenerator<T = SystemClock, R = ThreadRandom> {
    time: T,
    rng: R,
}

impl<T, R> ContingencyGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    /// Creates a generator reading from `time` and `rng`.
    pub const fn new(time: T, rng: R) -> Self {
        Self { time, rng }
    }

    /// Returns a best-effort code in `[1, 999]`. Never fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_code(&self) -> ClientCode {
        let millis = self.time.current_millis();
        let draw = self.rng.rand() % 100;
        ClientCode::reduce((millis % 100) * 10 + draw % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTime(u64);

    impl TimeSource<u64> for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    struct FixedRand(u64);

    impl RandSource<u64> for FixedRand {
        fn rand(&self) -> u64 {
            self.0
        }
    }

    fn code_for(millis: u64, draw: u64) -> u16 {
        ContingencyGenerator::new(FixedTime(millis), FixedRand(draw))
            .next_code()
            .get()
    }

    #[test]
    fn concatenates_timestamp_and_random_digits() {
        assert_eq!(code_for(1_700_000_000_456, 47), 568);
        assert_eq!(code_for(1_700_000_000_042, 5), 426);
    }

    #[test]
    fn short_timestamps_keep_their_digits() {
        // 5 ++ 3 = 53
        assert_eq!(code_for(5, 3), 54);
        assert_eq!(code_for(0, 0), 1);
    }

    #[test]
    fn only_the_last_random_digit_counts() {
        assert_eq!(code_for(12, 9), code_for(12, 89));
        assert_eq!(code_for(12, 9), code_for(12, 1_000_009));
    }

    #[test]
    fn largest_value_wraps_to_one() {
        // 99 ++ 9 = 999, and 999 mod 999 = 0
        assert_eq!(code_for(99, 9), 1);
        assert_eq!(code_for(99, 8), 999);
    }

    #[test]
    fn always_in_range() {
        for millis in [0, 1, 9, 10, 99, 100, 123_456_789, u64::MAX] {
            for draw in [0, 1, 9, 10, 99, 100, u64::MAX] {
                let code = code_for(millis, draw);
                assert!((1..=999).contains(&code), "{millis}/{draw} -> {code}");
            }
        }
    }

    #[test]
    fn default_sources_stay_in_range() {
        let generator = ContingencyGenerator::<SystemClock, ThreadRandom>::default();
        for _ in 0..1_000 {
            let code = generator.next_code();
            assert!(code >= ClientCode::MIN && code <= ClientCode::MAX);
        }
    }
}
