use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};
use waitlist_types::render_csv;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::backup::BackupUseCases,
    domain::entities::{
        backup::BackupTrigger,
        waitlist_entry::{NewWaitlistEntry, WaitlistEntry, WaitlistStats, WaitlistSubmission},
    },
};

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    /// Store a new entry and return its id.
    /// A case-insensitive email collision must surface as `AppError::DuplicateEmail`.
    async fn insert(
        &self,
        entry: &NewWaitlistEntry,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<i64>;
    /// All entries, newest first.
    async fn list_all(&self) -> AppResult<Vec<WaitlistEntry>>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64>;
    /// Returns whether a row was deleted.
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
    /// Returns the number of deleted rows.
    async fn clear_all(&self) -> AppResult<u64>;
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepo>,
    backups: Arc<BackupUseCases>,
    backup_every_n_inserts: u64,
    backup_before_clear: bool,
}

impl WaitlistUseCases {
    pub fn new(
        repo: Arc<dyn WaitlistRepo>,
        backups: Arc<BackupUseCases>,
        backup_every_n_inserts: u64,
        backup_before_clear: bool,
    ) -> Self {
        Self {
            repo,
            backups,
            backup_every_n_inserts,
            backup_before_clear,
        }
    }

    #[instrument(skip(self, submission))]
    pub async fn submit(&self, submission: WaitlistSubmission) -> AppResult<i64> {
        let entry = NewWaitlistEntry::parse(submission)?;
        let id = self.repo.insert(&entry, Utc::now()).await?;

        info!(id, "New waitlist entry");

        if self.backup_every_n_inserts > 0
            && id > 0
            && (id as u64) % self.backup_every_n_inserts == 0
        {
            self.backups.spawn(BackupTrigger::Milestone);
        }

        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> AppResult<Vec<WaitlistEntry>> {
        self.repo.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        self.repo.count().await
    }

    pub async fn stats(&self) -> AppResult<WaitlistStats> {
        self.stats_at(Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn stats_at(&self, now: DateTime<Utc>) -> AppResult<WaitlistStats> {
        let start_of_day = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| AppError::Internal("invalid start of day".into()))?;

        Ok(WaitlistStats {
            total: self.repo.count().await?,
            today: self.repo.count_since(start_of_day).await?,
            this_week: self.repo.count_since(now - Duration::days(7)).await?,
        })
    }

    /// Export every entry as CSV, in list order.
    #[instrument(skip(self))]
    pub async fn export_csv(&self) -> AppResult<String> {
        let entries = self.repo.list_all().await?;
        info!(rows = entries.len(), "Exported waitlist as CSV");
        Ok(render_csv(&entries))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete_by_id(id).await? {
            return Err(AppError::NotFound);
        }
        info!(id, "Deleted waitlist entry");
        Ok(())
    }

    /// Delete every entry, taking a backup first when configured.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> AppResult<u64> {
        if self.backup_before_clear
            && self
                .backups
                .run_logged(BackupTrigger::BeforeClear)
                .await
                .is_none()
        {
            warn!("Clearing waitlist without a fresh backup");
        }

        let cleared = self.repo.clear_all().await?;
        info!(cleared, "Cleared waitlist");
        Ok(cleared)
    }

    pub async fn database_healthy(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Database health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::TimeZone;

    use super::*;
    use crate::test_utils::{
        InMemoryWaitlistRepo, MemorySnapshotWriter, create_test_entry, create_test_submission,
    };

    struct Harness {
        use_cases: WaitlistUseCases,
        repo: Arc<InMemoryWaitlistRepo>,
        writer: Arc<MemorySnapshotWriter>,
        _dir: tempfile::TempDir,
    }

    fn harness(repo: InMemoryWaitlistRepo, every_n: u64, before_clear: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(repo);
        let writer = Arc::new(MemorySnapshotWriter::new());
        let backups = Arc::new(BackupUseCases::new(
            writer.clone(),
            dir.path().to_path_buf(),
            7,
        ));
        Harness {
            use_cases: WaitlistUseCases::new(repo.clone(), backups, every_n, before_clear),
            repo,
            writer,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn submit_returns_positive_id_and_persists() {
        let h = harness(InMemoryWaitlistRepo::new(), 0, false);

        let id = h
            .use_cases
            .submit(create_test_submission(|_| {}))
            .await
            .unwrap();

        assert!(id > 0);
        let entries = h.repo.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let h = harness(InMemoryWaitlistRepo::new(), 0, false);

        h.use_cases
            .submit(create_test_submission(|s| s.email = "ada@example.com".into()))
            .await
            .unwrap();
        let err = h
            .use_cases
            .submit(create_test_submission(|s| s.email = " ADA@Example.com ".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(h.repo.get_all().len(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_creates_no_row() {
        let h = harness(InMemoryWaitlistRepo::new(), 0, false);

        let err = h
            .use_cases
            .submit(create_test_submission(|s| s.name.clear()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(h.repo.get_all().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let h = harness(
            InMemoryWaitlistRepo::with_entries(vec![create_test_entry(1, |_| {})]),
            0,
            false,
        );

        assert!(matches!(
            h.use_cases.delete(42).await,
            Err(AppError::NotFound)
        ));
        assert_eq!(h.repo.get_all().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_only_that_row() {
        let h = harness(
            InMemoryWaitlistRepo::with_entries(vec![
                create_test_entry(1, |_| {}),
                create_test_entry(2, |_| {}),
                create_test_entry(3, |_| {}),
            ]),
            0,
            false,
        );

        h.use_cases.delete(2).await.unwrap();

        let mut ids: Vec<i64> = h.repo.get_all().iter().map(|e| e.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn export_has_header_and_one_line_per_entry() {
        let h = harness(
            InMemoryWaitlistRepo::with_entries(vec![
                create_test_entry(1, |_| {}),
                create_test_entry(2, |e| e.interest = Some("Food, water".into())),
            ]),
            0,
            false,
        );

        let csv = h.use_cases.export_csv().await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ID,Name,Email,Phone,Interest,Submitted At");
        assert_eq!(
            lines.len() - 1,
            h.use_cases.count().await.unwrap() as usize
        );
    }

    #[tokio::test]
    async fn clear_all_backs_up_first() {
        let h = harness(
            InMemoryWaitlistRepo::with_entries(vec![
                create_test_entry(1, |_| {}),
                create_test_entry(2, |_| {}),
            ]),
            0,
            true,
        );

        let cleared = h.use_cases.clear_all().await.unwrap();

        assert_eq!(cleared, 2);
        assert_eq!(h.writer.calls.load(Ordering::SeqCst), 1);
        assert!(h.repo.get_all().is_empty());
    }

    #[tokio::test]
    async fn every_nth_insert_triggers_backup() {
        let h = harness(InMemoryWaitlistRepo::new(), 2, false);

        for i in 0..4 {
            h.use_cases
                .submit(create_test_submission(|s| s.email = format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        // Milestone backups run in the background.
        for _ in 0..50 {
            if h.writer.calls.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(h.writer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stats_count_today_and_week() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let h = harness(
            InMemoryWaitlistRepo::with_entries(vec![
                create_test_entry(1, |e| e.submitted_at = now - Duration::days(30)),
                create_test_entry(2, |e| e.submitted_at = now - Duration::days(3)),
                create_test_entry(3, |e| e.submitted_at = now - Duration::hours(1)),
            ]),
            0,
            false,
        );

        let stats = h.use_cases.stats_at(now).await.unwrap();

        assert_eq!(
            stats,
            WaitlistStats {
                total: 3,
                today: 1,
                this_week: 2
            }
        );
    }

    #[tokio::test]
    async fn health_reflects_repo_availability() {
        let h = harness(InMemoryWaitlistRepo::new(), 0, false);
        assert!(h.use_cases.database_healthy().await);

        h.repo.set_unavailable(true);
        assert!(!h.use_cases.database_healthy().await);
    }
}
