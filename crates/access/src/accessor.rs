//! The key-value accessor: verified blob access over an open engine handle.
//!
//! This module contains the primary [`Accessor`] type, a stateless per-call
//! view over a caller-owned [`StoreEngine`] handle. It interprets the
//! engine's status codes into the access-level error taxonomy and carries the
//! two protocols worth having a crate for: redundant-write avoidance and
//! write verification with rollback-by-erase.

use crate::error::{AccessError, Result, VerifyFailure};
use nvblob_engine::{EngineError, StoreEngine};
use tracing::{debug, warn};

/// Outcome of a successful [`write`] or [`confirmed_write`].
///
/// [`write`]: Accessor::write
/// [`confirmed_write`]: Accessor::confirmed_write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was handed to the engine.
    Written,
    /// The stored value was already byte-for-byte identical; the engine was
    /// not asked to write.
    Unchanged,
}

/// A stateless accessor for small blobs in one open namespace.
///
/// `Accessor` borrows the engine handle mutably for its lifetime, so the
/// borrow checker enforces the concurrency model: at most one in-flight
/// operation per handle, serialized by the caller. It holds no state of its
/// own — no cache, no retries — and is cheap to construct at every call site
/// that owns the handle.
///
/// # Example
///
/// ```rust
/// use nvblob::{Accessor, MemoryEngine, WriteOutcome};
///
/// # fn main() -> nvblob::Result<()> {
/// let mut engine = MemoryEngine::builder().namespace("storage")?.build();
/// let mut store = Accessor::new(&mut engine);
///
/// store.confirmed_write("device_id", b"ab12-cd34")?;
/// assert_eq!(store.read("device_id", 9)?, b"ab12-cd34");
///
/// // A second identical write is detected and skipped.
/// assert_eq!(store.write("device_id", b"ab12-cd34")?, WriteOutcome::Unchanged);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Accessor<'e, E: StoreEngine> {
    engine: &'e mut E,
}

impl<'e, E: StoreEngine> Accessor<'e, E> {
    /// Wraps an open, caller-owned engine handle.
    ///
    /// The handle must refer to a currently open namespace; the accessor
    /// never opens or closes it.
    pub fn new(engine: &'e mut E) -> Self {
        Self { engine }
    }

    /// Reads the value stored under `key`, which the caller expects to be
    /// exactly `expected_len` bytes.
    ///
    /// Values carry no type or length metadata for the caller's benefit, so
    /// the expected length is part of the read contract: a stored value of
    /// any other length is a [`SizeMismatch`], whichever side it misses on.
    ///
    /// # Errors
    ///
    /// * [`AccessError::NotFound`] — no value under `key`.
    /// * [`AccessError::SizeMismatch`] — stored length differs from
    ///   `expected_len`.
    /// * [`AccessError::Engine`] — engine-level failure, unrecoverable for
    ///   this operation.
    ///
    /// [`SizeMismatch`]: AccessError::SizeMismatch
    pub fn read(&mut self, key: &str, expected_len: usize) -> Result<Vec<u8>> {
        self.read_internal(key, expected_len, true)
    }

    /// Read with miss-logging control: the redundancy probe in [`write`]
    /// expects absent or differently-sized prior values and must not warn
    /// about them.
    ///
    /// [`write`]: Accessor::write
    fn read_internal(&mut self, key: &str, expected_len: usize, log_misses: bool) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; expected_len];
        match self.engine.get_blob(key, &mut buf) {
            Ok(stored) if stored == expected_len => Ok(buf),
            Ok(stored) => {
                if log_misses {
                    warn!(key, expected = expected_len, stored, "Stored data has unexpected size");
                }
                Err(AccessError::SizeMismatch { key: key.to_owned(), expected: expected_len, stored })
            },
            Err(EngineError::InvalidLength { stored, .. }) => {
                if log_misses {
                    warn!(key, expected = expected_len, stored, "Stored data has unexpected size");
                }
                Err(AccessError::SizeMismatch { key: key.to_owned(), expected: expected_len, stored })
            },
            Err(EngineError::NotFound { .. }) => {
                if log_misses {
                    warn!(key, "No stored data found");
                }
                Err(AccessError::NotFound { key: key.to_owned() })
            },
            Err(source) => Err(AccessError::engine(format!("read {key}"), source)),
        }
    }

    /// Queries the stored length of `key` without retrieving the value.
    ///
    /// Returns `Ok(Some(len))` when the key exists, `Ok(None)` when it does
    /// not. A stored empty value is `Ok(Some(0))`, distinct from absence.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Engine`] on engine-level failure.
    pub fn stored_len(&mut self, key: &str) -> Result<Option<usize>> {
        self.stored_len_internal(key, true)
    }

    fn stored_len_internal(&mut self, key: &str, log_misses: bool) -> Result<Option<usize>> {
        match self.engine.blob_len(key) {
            Ok(len) => Ok(Some(len)),
            Err(EngineError::NotFound { .. }) => {
                if log_misses {
                    warn!(key, "No stored data found");
                }
                Ok(None)
            },
            Err(source) => Err(AccessError::engine(format!("size query {key}"), source)),
        }
    }

    /// Stores `data` under `key`, skipping the flash write when the stored
    /// value is already identical.
    ///
    /// Flash writes are the expensive, wear-inducing part of this layer, so
    /// the operation first probes the stored value: same length and
    /// byte-for-byte equal content mean the store is already in the desired
    /// state and [`WriteOutcome::Unchanged`] is returned without touching the
    /// engine's write path. The probe tolerates absent and differently-sized
    /// prior values silently; those are expected preconditions, not
    /// anomalies.
    ///
    /// The write is *not* committed here; pair with an engine commit or use
    /// [`confirmed_write`] for durability with verification.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Engine`] if the probe or the write itself fails
    /// at the engine level.
    ///
    /// [`confirmed_write`]: Accessor::confirmed_write
    pub fn write(&mut self, key: &str, data: &[u8]) -> Result<WriteOutcome> {
        if self.matches_stored(key, data)? {
            debug!(key, len = data.len(), "Input data equals stored data, write skipped");
            return Ok(WriteOutcome::Unchanged);
        }

        match self.engine.set_blob(key, data) {
            Ok(()) => {
                debug!(key, len = data.len(), "Blob write successful");
                Ok(WriteOutcome::Written)
            },
            Err(source) => Err(AccessError::engine(format!("write {key}"), source)),
        }
    }

    /// Whether the stored value equals `data`, for the redundancy probe.
    ///
    /// Lookup misses answer `false`; only engine-level failures propagate.
    fn matches_stored(&mut self, key: &str, data: &[u8]) -> Result<bool> {
        let Some(stored) = self.stored_len_internal(key, false)? else {
            return Ok(false);
        };
        if stored != data.len() {
            return Ok(false);
        }
        match self.read_internal(key, stored, false) {
            Ok(existing) => Ok(existing == data),
            Err(AccessError::NotFound { .. } | AccessError::SizeMismatch { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Stores `data` under `key` and confirms it landed intact before
    /// committing; rolls the key back on any discrepancy.
    ///
    /// The sequence is: [`write`] (redundancy-avoiding), stored-size check,
    /// independent read-back, byte-for-byte comparison, engine commit. The
    /// commit happens **only on confirmed equality**. Every verification
    /// discrepancy erases the key before returning, so a failed confirmed
    /// write never leaves a partially-written or unconfirmed value behind —
    /// the key either holds the confirmed value or does not exist.
    ///
    /// # Errors
    ///
    /// * [`AccessError::Verification`] — size or content discrepancy, or an
    ///   unreadable value, after the write; the key has been erased.
    /// * [`AccessError::Engine`] — engine-level failure at any step,
    ///   including the final commit (the key is erased before a commit
    ///   failure is propagated).
    ///
    /// [`write`]: Accessor::write
    pub fn confirmed_write(&mut self, key: &str, data: &[u8]) -> Result<WriteOutcome> {
        let outcome = self.write(key, data).inspect_err(|_| {
            warn!(key, "Error while writing blob");
        })?;

        let written = data.len();
        match self.stored_len_internal(key, false) {
            Ok(Some(stored)) if stored == written => {},
            Ok(Some(stored)) => {
                return self.rollback(key, VerifyFailure::Length { written, stored });
            },
            Ok(None) => return self.rollback(key, VerifyFailure::Unreadable),
            Err(err) => {
                warn!(key, "Size check failed after write, erasing key");
                self.erase_key(key)?;
                return Err(err);
            },
        }

        let confirmed = match self.read_internal(key, written, false) {
            Ok(read_back) => read_back == data,
            Err(AccessError::NotFound { .. } | AccessError::SizeMismatch { .. }) => {
                return self.rollback(key, VerifyFailure::Unreadable);
            },
            Err(err) => {
                warn!(key, "Read-back failed after write, erasing key");
                self.erase_key(key)?;
                return Err(err);
            },
        };
        if !confirmed {
            return self.rollback(key, VerifyFailure::Content);
        }

        if let Err(source) = self.engine.commit() {
            warn!(key, error = %source, "Commit failed after verified write, erasing key");
            self.erase_key(key)?;
            return Err(AccessError::engine(format!("commit {key}"), source));
        }

        debug!(key, len = written, "Blob written and confirmed");
        Ok(outcome)
    }

    /// Erases an unconfirmed key and reports the verification failure.
    fn rollback<T>(&mut self, key: &str, failure: VerifyFailure) -> Result<T> {
        warn!(key, ?failure, "Write verification failed, erasing key");
        self.erase_key(key)?;
        Err(AccessError::Verification { key: key.to_owned(), failure })
    }

    /// Removes `key` from the namespace.
    ///
    /// Erasing a key that does not exist is a benign no-op: from the caller's
    /// perspective the desired state ("key absent") already holds.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Engine`] on engine-level failure.
    pub fn erase_key(&mut self, key: &str) -> Result<()> {
        match self.engine.erase_key(key) {
            Ok(()) => {
                debug!(key, "Key erased");
                Ok(())
            },
            Err(EngineError::NotFound { .. }) => {
                debug!(key, "Key already absent");
                Ok(())
            },
            Err(source) => Err(AccessError::engine(format!("erase {key}"), source)),
        }
    }

    /// Erases every key in the namespace and commits the erasure.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Engine`] if either the bulk erase or the
    /// commit fails.
    pub fn erase_all(&mut self) -> Result<()> {
        self.engine
            .erase_all()
            .map_err(|source| AccessError::engine("erase all", source))?;
        self.engine
            .commit()
            .map_err(|source| AccessError::engine("commit erase all", source))?;
        debug!("Namespace erased");
        Ok(())
    }
}
