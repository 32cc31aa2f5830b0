pub mod backup;
pub mod http;
pub mod persistence;
