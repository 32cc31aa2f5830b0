pub mod backup;
pub mod waitlist_entry;
