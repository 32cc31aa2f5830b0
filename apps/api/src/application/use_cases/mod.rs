pub mod backup;
pub mod maintenance;
pub mod waitlist;
