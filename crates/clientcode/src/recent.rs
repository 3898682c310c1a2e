use crate::{ClientCode, CodeRecord, RawCode};

/// Number of recent codes kept in the cache by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Recently allocated codes, newest first.
///
/// This is the collision universe for the next allocation. Values outside
/// `[1, 999]`, including the `0` some stores use for "empty", are dropped on
/// ingest since no allocation can ever collide with them.
///
/// # Example
///
/// ```
/// use clientcode::{ClientCode, RecentCodes};
///
/// let mut recent = RecentCodes::from_raw([5, 0, 3, 1, 2000]);
/// assert_eq!(recent.to_raw(), vec![5, 3, 1]);
///
/// recent.push_front(ClientCode::new(6).unwrap(), 3);
/// assert_eq!(recent.to_raw(), vec![6, 5, 3]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentCodes {
    codes: Vec<ClientCode>,
}

impl RecentCodes {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Builds a list from raw values, keeping order and dropping anything
    /// outside the code range.
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawCode>,
    {
        Self {
            codes: raw
                .into_iter()
                .filter_map(|value| ClientCode::try_from(value).ok())
                .collect(),
        }
    }

    /// Builds a list from store records, skipping records without a usable
    /// code.
    pub fn from_records(records: &[CodeRecord]) -> Self {
        Self::from_raw(records.iter().filter_map(|record| record.code))
    }

    /// Prepends `code` and keeps at most `limit` entries.
    pub fn push_front(&mut self, code: ClientCode, limit: usize) {
        self.codes.insert(0, code);
        self.codes.truncate(limit);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ClientCode] {
        &self.codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns the codes in their raw form, as written to the cache.
    #[must_use]
    pub fn to_raw(&self) -> Vec<RawCode> {
        self.codes.iter().copied().map(RawCode::from).collect()
    }
}

impl FromIterator<ClientCode> for RecentCodes {
    fn from_iter<I: IntoIterator<Item = ClientCode>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}
