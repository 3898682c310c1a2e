use core::future::Future;

use crate::{Allocation, ClientCode};

/// A minimal interface for allocating client codes
pub trait ClientCodeGenerator {
    /// Allocates a code and reports where it came from.
    fn next_allocation(&self) -> impl Future<Output = Allocation> + Send;

    /// Allocates a code. Never fails; degraded paths yield a contingency
    /// code.
    fn next_code(&self) -> impl Future<Output = ClientCode> + Send;
}
