//! Rust client for the waitlist API.
//!
//! # Features
//!
//! - **Remote store** - submit signups to a running API (`client` feature)
//! - **Local cache** - keep signups in a JSON file while the API is unreachable
//! - **Fallback** - use the cache only when the API cannot be reached, and sync later
//!
//! # Example
//!
//! ```rust,ignore
//! use waitlist_client::{FallbackStore, LocalCache, RemoteStore, WaitlistStore};
//! use waitlist_types::WaitlistSubmission;
//!
//! let store = FallbackStore::new(
//!     RemoteStore::new("http://localhost:3001/api")?,
//!     LocalCache::new("waitlist-cache.json"),
//! );
//!
//! let outcome = store
//!     .submit(&WaitlistSubmission::new("Ada Lovelace", "ada@example.com"))
//!     .await?;
//! println!("{} (id {})", outcome.message, outcome.id);
//! ```

mod error;
mod fallback;
mod local;
#[cfg(feature = "client")]
mod remote;
mod store;

pub use error::ClientError;
pub use fallback::{FallbackStore, SyncReport};
pub use local::LocalCache;
#[cfg(feature = "client")]
pub use remote::RemoteStore;
pub use store::{SubmitOutcome, WaitlistStore};

// Re-export shared types for convenience
pub use waitlist_types::{ErrorCode, ValidationError, WaitlistEntry, WaitlistSubmission};
