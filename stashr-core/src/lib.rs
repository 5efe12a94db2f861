//! # Stashr Core
//!
//! An in-memory key-value store with per-key TTL (time-to-live) support.
//!
//! ## Features
//!
//! - A single `HashMap` behind one reader/writer lock
//! - Expiration on access (lazy removal on `get` and `delete`)
//! - A background sweeper that removes expired entries on a fixed interval
//! - Deadlines stored as absolute instants, never as relative durations
//!
//! ## Example
//!
//! ```rust,no_run
//! use stashr_core::{Store, StoreConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Sweep every 500ms instead of the default 1s
//!     let config = StoreConfig::default()
//!         .with_sweep_interval(Duration::from_millis(500));
//!     let store = Store::with_config(config);
//!
//!     // Store a value that expires after one minute
//!     store.set("user:123", "John Doe", Some(Duration::from_secs(60)));
//!
//!     // And one that never expires
//!     store.set("motd", "hello", None);
//!
//!     if let Some(value) = store.get("user:123") {
//!         println!("User: {}", value);
//!     }
//!
//!     let deleted = store.delete("user:123");
//!     assert!(deleted);
//!
//!     println!("live keys: {:?}", store.list());
//!
//!     // Stop the background sweeper before shutting down
//!     store.stop().await;
//! }
//! ```

mod config;
mod entry;
mod store;
mod sweeper;

pub use config::{StoreConfig, DEFAULT_SWEEP_INTERVAL};
pub use entry::Entry;
pub use store::Store;
pub use sweeper::SweeperState;
