//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::waitlist_entry::{WaitlistEntry, WaitlistSubmission};

/// A fixed point in time so tests don't depend on the clock.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap()
}

/// Create a valid signup payload.
pub fn create_test_submission(
    overrides: impl FnOnce(&mut WaitlistSubmission),
) -> WaitlistSubmission {
    let mut submission = WaitlistSubmission::new("Ada Lovelace", "ada@example.com");
    overrides(&mut submission);
    submission
}

/// Create a stored entry. The email is derived from `id` so seeded entries never collide.
pub fn create_test_entry(id: i64, overrides: impl FnOnce(&mut WaitlistEntry)) -> WaitlistEntry {
    let mut entry = WaitlistEntry {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        phone: None,
        interest: None,
        submitted_at: test_datetime(),
    };
    overrides(&mut entry);
    entry
}
