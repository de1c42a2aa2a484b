//! On-disk result cache for critic.
//!
//! Keys are `(analyzer name, sha256 of file contents)`, so a cache hit
//! is valid no matter where the file moved or what the job looked like.
//! Entries past the age horizon are dropped at load time.

pub mod store;
pub mod types;

pub use store::{CacheStore, StoreError};
pub use types::{content_hash, CacheEntry, CacheState, DEFAULT_MAX_AGE_DAYS};
