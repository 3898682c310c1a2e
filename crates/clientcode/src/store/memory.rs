use core::{convert::Infallible, future::Future};

use parking_lot::RwLock;

use crate::{ClientCode, CodeRecord, CodeStore, RawCode};

/// An in-process [`CodeStore`] over a list of records.
///
/// Useful in tests and in single-node deployments where records never leave
/// the process. Records are kept in insertion order; queries sort by
/// `created_at`, and among equal timestamps the later insert counts as newer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CodeRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw record.
    pub fn insert(&self, record: CodeRecord) {
        self.records.write().push(record);
    }

    /// Records that `code` was attached to a record created at `created_at`.
    pub fn push(&self, code: ClientCode, created_at: u64) {
        self.insert(CodeRecord::new(Some(RawCode::from(code)), created_at));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Returns up to `limit` records with a code, newest first.
    pub fn recent(&self, limit: usize) -> Vec<CodeRecord> {
        let mut recent: Vec<CodeRecord> = self
            .records
            .read()
            .iter()
            .rev()
            .filter(|record| record.code.is_some())
            .copied()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        recent
    }
}

impl FromIterator<CodeRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = CodeRecord>>(iter: I) -> Self {
        Self {
            records: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl CodeStore for MemoryStore {
    type Error = Infallible;

    fn recent_codes(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CodeRecord>, Self::Error>> + Send {
        core::future::ready(Ok(self.recent(limit)))
    }
}
