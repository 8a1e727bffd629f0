//! Store-engine contract for non-volatile key-value flash storage.
//!
//! This crate defines the seam between firmware code that wants to persist
//! small blobs and the wear-leveled flash key-value engine that actually owns
//! them. It contains no flash management of its own:
//!
//! 1. [`StoreEngine`] — the capability surface an open namespace handle must
//!    provide (blob get/set, size query, key and bulk erase, commit).
//! 2. [`EngineError`] — the status taxonomy, keeping "key absent" and "buffer
//!    too small" distinct from engine-level failures.
//! 3. [`MemoryEngine`] — a host-side engine with staged-commit semantics and
//!    power-loss simulation, for tests and as a reference for device
//!    bindings.
//!
//! Device firmware implements [`StoreEngine`] over its vendor bindings and
//! hands the open handle to the access layer; nothing here opens, closes, or
//! formats a partition.
//!
//! # Example
//!
//! ```rust
//! use nvblob_engine::{MemoryEngine, StoreEngine};
//!
//! # fn main() -> nvblob_engine::Result<()> {
//! let mut engine = MemoryEngine::builder()
//!     .namespace("storage")?
//!     .capacity(4096)
//!     .build();
//!
//! engine.set_blob("token", &[0xAA; 16])?;
//! assert_eq!(engine.blob_len("token")?, 16);
//!
//! // Staged data is lost unless committed.
//! engine.power_cycle();
//! assert!(engine.blob_len("token").is_err());
//! # Ok(())
//! # }
//! ```

mod builder;
mod contract;
mod error;
mod memory;

pub use builder::{MemoryEngineBuilder, NamespaceName};
pub use contract::{MAX_KEY_LEN, StoreEngine};
pub use error::{EngineError, Result};
pub use memory::MemoryEngine;
