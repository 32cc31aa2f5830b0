//! Test utilities shared by unit and HTTP tests.
//!
//! This module provides:
//! - Test data factories for creating valid fixtures
//! - In-memory repository and snapshot writer doubles
//! - `TestAppStateBuilder` for HTTP-level tests

mod app_state_builder;
mod backup_mocks;
mod factories;
mod waitlist_mocks;

pub use app_state_builder::*;
pub use backup_mocks::*;
pub use factories::*;
pub use waitlist_mocks::*;
