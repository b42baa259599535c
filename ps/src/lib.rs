//! PlanStore - file-backed JSON key-value store
//!
//! Every key is a JSON document on disk. Record collections (for example the
//! list of saved plans) are a single key holding a JSON array, so the store
//! behaves like a browser's local storage with typed helpers on top.
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! ├── .lock            # fs2 advisory lock (shared for reads, exclusive for writes)
//! ├── plans.json       # Record collection: JSON array
//! └── reminders.json   # Plain key-value document
//! ```
//!
//! # Example
//!
//! ```ignore
//! use planstore::Store;
//!
//! let store = Store::open(".planstore")?;
//! store.append(&plan)?;
//! let plans: Vec<Plan> = store.list()?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{Record, Store, StoreStats};

/// File extension used for every stored key
pub const KEY_EXTENSION: &str = "json";

/// Name of the advisory lock file inside the store directory
pub const LOCK_FILE: &str = ".lock";
