use core::fmt;

use crate::InvalidCode;

/// Integer form of a code as exchanged with caches and record stores.
///
/// Collaborators may hand back anything a database column can hold (zero,
/// negatives, values past the range), so raw values are only trusted after
/// passing through [`ClientCode::try_from`].
pub type RawCode = i64;

/// A client code in the closed range `[1, 999]`.
///
/// The range is enforced at construction, so any `ClientCode` in hand is a
/// valid code.
///
/// # Example
///
/// ```
/// use clientcode::ClientCode;
///
/// let code = ClientCode::new(42).unwrap();
/// assert_eq!(code.get(), 42);
/// assert!(ClientCode::new(0).is_none());
/// assert!(ClientCode::new(1000).is_none());
/// assert_eq!(ClientCode::MAX.wrapping_next(), ClientCode::MIN);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
pub struct ClientCode(u16);

impl ClientCode {
    /// Smallest code, and the first one handed out from an empty history.
    pub const MIN: Self = Self(1);

    /// Largest code. The successor of `MAX` is [`Self::MIN`].
    pub const MAX: Self = Self(999);

    /// Number of distinct codes.
    pub const RANGE: u16 = 999;

    /// Returns the code for `value`, or `None` if it lies outside `[1, 999]`.
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Returns the next code on the cycle, wrapping `999` back to `1`.
    #[must_use]
    pub const fn wrapping_next(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MIN
        } else {
            Self(self.0 + 1)
        }
    }

    /// Folds an arbitrary value into the range as `(value mod 999) + 1`.
    pub(crate) const fn reduce(value: u64) -> Self {
        Self((value % Self::RANGE as u64) as u16 + 1)
    }

    /// Zero-based slot of this code, for range-sized lookup tables.
    pub(crate) const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for ClientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<ClientCode> for u16 {
    fn from(code: ClientCode) -> Self {
        code.0
    }
}

impl From<ClientCode> for RawCode {
    fn from(code: ClientCode) -> Self {
        Self::from(code.0)
    }
}

impl TryFrom<u16> for ClientCode {
    type Error = InvalidCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidCode(RawCode::from(value)))
    }
}

impl TryFrom<RawCode> for ClientCode {
    type Error = InvalidCode;

    fn try_from(value: RawCode) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidCode(value))
    }
}
