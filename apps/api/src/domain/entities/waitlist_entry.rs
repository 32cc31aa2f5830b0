pub use waitlist_types::{NewWaitlistEntry, WaitlistEntry, WaitlistStats, WaitlistSubmission};
