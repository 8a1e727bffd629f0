//! Verified small-blob persistence over a flash key-value engine.
//!
//! This crate is a thin convenience layer for firmware-style code that
//! persists small blobs (identifiers, tokens, calibration data) across power
//! cycles in a non-volatile key-value store. The store engine itself — wear
//! leveling, page management, commit durability — is an external collaborator
//! behind the [`StoreEngine`] trait; this layer only orchestrates it, adding
//! the two protocols worth centralizing:
//!
//! - **Redundant-write avoidance**: [`Accessor::write`] compares the new
//!   value against the stored one and skips the flash write when they are
//!   identical, sparing erase cycles on values that rarely change.
//! - **Write verification with rollback-by-erase**:
//!   [`Accessor::confirmed_write`] re-reads what the engine stored, commits
//!   only on confirmed byte-for-byte equality, and erases the key on any
//!   discrepancy — a failed write leaves the key absent, never half-written.
//!
//! All operations are synchronous and stateless between calls; the caller
//! owns the engine handle and serializes access to it.
//!
//! # Examples
//!
//! ```rust
//! use nvblob::{Accessor, MemoryEngine, AccessError};
//!
//! # fn main() -> nvblob::Result<()> {
//! // On a device this handle would wrap the vendor NVS bindings; on a host
//! // the in-memory engine stands in.
//! let mut engine = MemoryEngine::builder().namespace("storage")?.build();
//! let mut store = Accessor::new(&mut engine);
//!
//! // Write with post-hoc verification and commit.
//! store.confirmed_write("calib", &[0x10, 0x20, 0x30, 0x40])?;
//!
//! // Reads state the expected length explicitly; values carry no metadata.
//! let calib = store.read("calib", 4)?;
//! assert_eq!(calib, [0x10, 0x20, 0x30, 0x40]);
//!
//! // Absence and wrong-size reads are distinct, non-fatal error kinds.
//! assert!(matches!(store.read("missing", 4), Err(AccessError::NotFound { .. })));
//! assert!(matches!(store.read("calib", 8), Err(AccessError::SizeMismatch { .. })));
//! # Ok(())
//! # }
//! ```
//!
//! ```rust
//! # use nvblob::{Accessor, MemoryEngine};
//! # fn main() -> nvblob::Result<()> {
//! # let mut engine = MemoryEngine::builder().namespace("storage")?.build();
//! # let mut store = Accessor::new(&mut engine);
//! // The size query is three-valued: present (with length), absent, or
//! // engine failure. A stored empty value is not the same as no value.
//! store.write("empty", b"")?;
//! assert_eq!(store.stored_len("empty")?, Some(0));
//! assert_eq!(store.stored_len("never_written")?, None);
//!
//! // Erasing an absent key is benign.
//! store.erase_key("never_written")?;
//! # Ok(())
//! # }
//! ```

mod accessor;
mod error;

pub use accessor::{Accessor, WriteOutcome};
pub use error::{AccessError, Result, VerifyFailure};
pub use nvblob_engine::{EngineError, MAX_KEY_LEN, MemoryEngine, StoreEngine};
