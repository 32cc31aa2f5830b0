//! In-memory mock implementation of `WaitlistRepo`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepo,
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry},
};

#[derive(Default)]
struct Table {
    entries: Vec<WaitlistEntry>,
    last_id: i64,
}

/// In-memory implementation of WaitlistRepo for testing.
/// Mirrors the SQLite table: autoincrement ids and a case-insensitive unique email.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    table: Mutex<Table>,
    unavailable: AtomicBool,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial entries for testing.
    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            table: Mutex::new(Table { entries, last_id }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Get all entries in insertion order (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistEntry> {
        self.table.lock().unwrap().entries.clone()
    }

    /// Make every call fail like a lost database connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn insert(
        &self,
        entry: &NewWaitlistEntry,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<i64> {
        self.check_available()?;
        let mut table = self.table.lock().unwrap();

        if table
            .entries
            .iter()
            .any(|e| e.email.eq_ignore_ascii_case(entry.email()))
        {
            return Err(AppError::DuplicateEmail);
        }

        table.last_id += 1;
        let id = table.last_id;
        table.entries.push(entry.clone().into_entry(id, submitted_at));
        Ok(id)
    }

    async fn list_all(&self) -> AppResult<Vec<WaitlistEntry>> {
        self.check_available()?;
        let mut entries = self.get_all();
        entries.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    async fn count(&self) -> AppResult<i64> {
        self.check_available()?;
        Ok(self.table.lock().unwrap().entries.len() as i64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        self.check_available()?;
        let table = self.table.lock().unwrap();
        Ok(table
            .entries
            .iter()
            .filter(|e| e.submitted_at >= since)
            .count() as i64)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        self.check_available()?;
        let mut table = self.table.lock().unwrap();
        let before = table.entries.len();
        table.entries.retain(|e| e.id != id);
        Ok(table.entries.len() < before)
    }

    async fn clear_all(&self) -> AppResult<u64> {
        self.check_available()?;
        let mut table = self.table.lock().unwrap();
        let cleared = table.entries.len() as u64;
        table.entries.clear();
        Ok(cleared)
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}
