use ::rand::{Rng, rng};

use crate::RandSource;

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This type does **not** store the RNG itself; it accesses the thread-local
/// generator on each call, so it is a zero-sized, `Send + Sync` value that can
/// live inside a shared allocator.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
