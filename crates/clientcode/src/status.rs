use crate::ClientCode;

/// Where an authoritative code's in-use list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSource {
    /// The cached recent-codes list was warm.
    Cache,
    /// The cache was cold and the record store was queried.
    Store,
}

/// Why the allocator fell back to a contingency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContingencyReason {
    /// The record store returned an error.
    StoreUnavailable,
    /// Every code in `[1, 999]` was already in use.
    Exhausted,
    /// Anything else, such as a panicking collaborator.
    Unexpected,
}

/// The outcome of a single allocation.
///
/// Both variants carry a valid [`ClientCode`]; callers that only want the code
/// use [`Allocation::code`]. The variant tells authoritative allocations,
/// which were checked against known in-use codes and written back to the
/// cache, apart from contingency codes, which were derived from time and
/// randomness alone and may collide with a code already in use.
///
/// ```
/// use clientcode::{Allocation, ClientCode, CodeSource};
///
/// let allocation = Allocation::Authoritative {
///     code: ClientCode::MIN,
///     source: CodeSource::Store,
/// };
/// assert_eq!(allocation.code(), ClientCode::MIN);
/// assert!(!allocation.is_contingency());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// A collision-checked code.
    Authoritative {
        /// The allocated code.
        code: ClientCode,
        /// Where the in-use list was read from.
        source: CodeSource,
    },
    /// A best-effort code produced in degraded mode.
    Contingency {
        /// The fallback code.
        code: ClientCode,
        /// What forced the fallback.
        reason: ContingencyReason,
    },
}

impl Allocation {
    /// Returns the allocated code regardless of provenance.
    #[must_use]
    pub const fn code(self) -> ClientCode {
        match self {
            Self::Authoritative { code, .. } | Self::Contingency { code, .. } => code,
        }
    }

    /// Returns `true` if this code came from the fallback generator.
    #[must_use]
    pub const fn is_contingency(self) -> bool {
        matches!(self, Self::Contingency { .. })
    }
}
