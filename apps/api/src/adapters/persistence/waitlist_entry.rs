use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    adapters::persistence::SqlitePersistence,
    app_error::{AppError, AppResult},
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry},
    use_cases::waitlist::WaitlistRepo,
};

// Waitlist entry as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub struct WaitlistEntryDb {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<WaitlistEntryDb> for WaitlistEntry {
    fn from(row: WaitlistEntryDb) -> Self {
        WaitlistEntry {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            interest: row.interest,
            submitted_at: row.submitted_at,
        }
    }
}

const SQL_INSERT: &str = r#"
INSERT INTO waitlist_entries (name, email, phone, interest, submitted_at)
VALUES (?, ?, ?, ?, ?)
RETURNING id
"#;

const SQL_LIST_ALL: &str = r#"
SELECT id, name, email, phone, interest, submitted_at
FROM waitlist_entries
ORDER BY submitted_at DESC, id DESC
"#;

#[async_trait]
impl WaitlistRepo for SqlitePersistence {
    async fn insert(
        &self,
        entry: &NewWaitlistEntry,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(SQL_INSERT)
            .bind(entry.name())
            .bind(entry.email())
            .bind(entry.phone())
            .bind(entry.interest())
            .bind(submitted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<WaitlistEntry>> {
        let rows = sqlx::query_as::<_, WaitlistEntryDb>(SQL_LIST_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(WaitlistEntry::from).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM waitlist_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM waitlist_entries WHERE submitted_at >= ?",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM waitlist_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM waitlist_entries")
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{
        adapters::persistence::test_pool::memory_pool, test_utils::create_test_submission,
    };

    async fn persistence() -> SqlitePersistence {
        SqlitePersistence::new(memory_pool().await)
    }

    fn new_entry(email: &str) -> NewWaitlistEntry {
        NewWaitlistEntry::parse(create_test_submission(|s| s.email = email.to_string())).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_returns_increasing_ids() {
        let db = persistence().await;

        let first = db.insert(&new_entry("a@example.com"), at(1)).await.unwrap();
        let second = db.insert(&new_entry("b@example.com"), at(2)).await.unwrap();

        assert!(first > 0);
        assert!(second > first);
        assert_eq!(db.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let db = persistence().await;
        db.insert(&new_entry("ada@example.com"), at(1)).await.unwrap();

        // Bypass normalization to prove the storage layer enforces it too.
        let err = sqlx::query(
            "INSERT INTO waitlist_entries (name, email, submitted_at) VALUES ('Ada', 'Ada@Example.com', '2024-05-01T02:00:00+00:00')",
        )
        .execute(db.pool())
        .await
        .map_err(AppError::from)
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let err = db
            .insert(&new_entry("ada@example.com"), at(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_round_trips_fields() {
        let db = persistence().await;
        let entry = NewWaitlistEntry::parse(
            create_test_submission(|s| s.email = "old@example.com".into())
                .with_phone("+1 555 0100")
                .with_interest("Volunteering"),
        )
        .unwrap();
        db.insert(&entry, at(1)).await.unwrap();
        db.insert(&new_entry("new@example.com"), at(5)).await.unwrap();

        let entries = db.list_all().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].email, "new@example.com");
        assert_eq!(entries[1].phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(entries[1].interest.as_deref(), Some("Volunteering"));
        assert_eq!(entries[1].submitted_at, at(1));
    }

    #[tokio::test]
    async fn count_since_filters_by_time() {
        let db = persistence().await;
        db.insert(&new_entry("a@example.com"), at(1)).await.unwrap();
        db.insert(&new_entry("b@example.com"), at(10)).await.unwrap();

        assert_eq!(db.count_since(at(5)).await.unwrap(), 1);
        assert_eq!(db.count_since(at(0) - Duration::days(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_by_id_only_removes_target() {
        let db = persistence().await;
        let a = db.insert(&new_entry("a@example.com"), at(1)).await.unwrap();
        let b = db.insert(&new_entry("b@example.com"), at(2)).await.unwrap();

        assert!(db.delete_by_id(a).await.unwrap());
        assert!(!db.delete_by_id(a).await.unwrap());

        let remaining = db.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
    }

    #[tokio::test]
    async fn clear_all_reports_rows_removed() {
        let db = persistence().await;
        db.insert(&new_entry("a@example.com"), at(1)).await.unwrap();
        db.insert(&new_entry("b@example.com"), at(2)).await.unwrap();

        assert_eq!(db.clear_all().await.unwrap(), 2);
        assert_eq!(db.count().await.unwrap(), 0);
        db.ping().await.unwrap();
    }
}
