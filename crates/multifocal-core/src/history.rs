//! The calculation history service.
//!
//! [`History`] owns the ordered list of records (newest first) and the store
//! it is persisted to. Every mutation writes the full list under one key
//! before the in-memory list is committed, so memory and storage agree after
//! each completed call, and a failed write leaves both as they were.

use std::time::Instant;

use crate::error::HistoryError;
use crate::export;
use crate::model::CalculationRecord;
use crate::notice::{Notice, MESSAGE_TTL};
use crate::pagination::{self, Page, DEFAULT_PAGE_SIZE};
use crate::storage::KeyValueStore;

/// Storage key the history is persisted under.
pub const HISTORY_KEY: &str = "calculation-history";

const DELETED_MESSAGE: &str = "Calculation deleted successfully!";
const CLEARED_MESSAGE: &str = "History cleared successfully!";

/// Ordered, persisted list of past calculations.
pub struct History<S: KeyValueStore> {
    store: S,
    key: String,
    records: Vec<CalculationRecord>,
    page_size: usize,
    clear_pending: bool,
    notice: Notice,
}

impl<S: KeyValueStore> History<S> {
    /// Hydrate from `store` under [`HISTORY_KEY`] with the default page size.
    pub fn load(store: S) -> Result<Self, HistoryError> {
        Self::open(store, HISTORY_KEY, DEFAULT_PAGE_SIZE)
    }

    /// Hydrate from `store` under `key`.
    ///
    /// A missing value yields an empty history. A value that is not a valid
    /// history is logged and ignored; it stays in storage until the next
    /// mutation overwrites it.
    pub fn open(store: S, key: &str, page_size: usize) -> Result<Self, HistoryError> {
        let records = match store.get(key)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<CalculationRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(key, "ignoring unreadable history: {e}");
                    Vec::new()
                }
            },
        };
        tracing::debug!(key, count = records.len(), "history loaded");

        Ok(Self {
            store,
            key: key.to_string(),
            records,
            page_size: page_size.max(1),
            clear_pending: false,
            notice: Notice::default(),
        })
    }

    /// All records, newest first.
    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CalculationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// An id for a record created at `millis` that sorts before every
    /// existing record.
    pub fn next_id(&self, millis: i64) -> String {
        let newest = self
            .records
            .first()
            .and_then(|r| r.id.parse::<i64>().ok());
        match newest {
            Some(newest) if millis <= newest => (newest + 1).to_string(),
            _ => millis.to_string(),
        }
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let json = serde_json::to_string(&self.records)?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }

    /// Add a record as the newest entry.
    pub fn append(&mut self, record: CalculationRecord) -> Result<(), HistoryError> {
        let id = record.id.clone();
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        tracing::info!(id = %id, count = self.records.len(), "calculation saved");
        Ok(())
    }

    /// Remove the record with `id`. Returns `false` if there was none.
    ///
    /// The success notice is shown from `now`.
    pub fn delete(&mut self, id: &str, now: Instant) -> Result<bool, HistoryError> {
        let Some(pos) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = self.records.remove(pos);
        if let Err(e) = self.persist() {
            self.records.insert(pos, removed);
            return Err(e);
        }
        tracing::info!(id, count = self.records.len(), "calculation deleted");
        self.notice.show(DELETED_MESSAGE, now, MESSAGE_TTL);
        Ok(true)
    }

    /// First phase of clearing: ask for confirmation.
    pub fn request_clear(&mut self) {
        self.clear_pending = true;
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Second phase of clearing: drop every record and the persisted value.
    ///
    /// Returns the number of records removed.
    pub fn confirm_clear(&mut self, now: Instant) -> Result<usize, HistoryError> {
        if !self.clear_pending {
            return Err(HistoryError::ClearNotRequested);
        }
        self.store.remove(&self.key)?;
        let removed = self.records.len();
        self.records.clear();
        self.clear_pending = false;
        tracing::info!(removed, "history cleared");
        self.notice.show(CLEARED_MESSAGE, now, MESSAGE_TTL);
        Ok(removed)
    }

    /// The success message of the last delete or clear, while still visible.
    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.notice.current(now)
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.records.len(), self.page_size)
    }

    /// Page `number` (1-based) of the records in current order.
    pub fn page(&self, number: usize) -> Result<Page<'_, CalculationRecord>, HistoryError> {
        pagination::paginate(&self.records, number, self.page_size)
    }

    pub fn export_text(&self) -> String {
        export::export_text(&self.records)
    }

    pub fn speech_text(&self) -> String {
        export::speech_text(&self.records)
    }
}
