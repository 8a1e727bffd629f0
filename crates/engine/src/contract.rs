//! The capability surface an open flash key-value namespace must provide.
//!
//! This trait is the seam between the access layer and whatever actually owns
//! the flash: vendor NVS bindings on a device, or [`MemoryEngine`] on a host.
//! Implementations are expected to be synchronous and blocking; every method
//! runs to completion on the calling thread.
//!
//! [`MemoryEngine`]: crate::MemoryEngine

use crate::error::Result;

/// Maximum key length in bytes enforced by NVS-style engines.
pub const MAX_KEY_LEN: usize = 15;

/// An open, caller-owned handle onto one logical namespace of a non-volatile
/// key-value store.
///
/// The handle is a capability: opening and closing the namespace is the
/// caller's (or the firmware bootstrap's) responsibility, and every method
/// assumes the namespace is currently open. Mutations may be buffered until
/// [`commit`] is called; reads through the same handle observe buffered
/// mutations.
///
/// # Contract
///
/// * [`get_blob`] copies the stored value into `out` and returns the stored
///   length when `stored_len <= out.len()`. A stored value *shorter* than the
///   buffer is a success with the shorter length returned. A stored value
///   that does not fit is [`EngineError::InvalidLength`].
/// * [`blob_len`] reports the stored length without retrieving the value.
/// * Absent keys are [`EngineError::NotFound`] from [`get_blob`],
///   [`blob_len`], and [`erase_key`]; callers decide whether absence is an
///   anomaly.
/// * Any other failure is an engine-level error and must never be masked as
///   one of the benign variants.
///
/// [`get_blob`]: StoreEngine::get_blob
/// [`blob_len`]: StoreEngine::blob_len
/// [`erase_key`]: StoreEngine::erase_key
/// [`commit`]: StoreEngine::commit
/// [`EngineError::NotFound`]: crate::EngineError::NotFound
/// [`EngineError::InvalidLength`]: crate::EngineError::InvalidLength
pub trait StoreEngine {
    /// Copies the value stored under `key` into `out`.
    ///
    /// Returns the stored length, which may be smaller than `out.len()`.
    fn get_blob(&mut self, key: &str, out: &mut [u8]) -> Result<usize>;

    /// Returns the stored length of the value under `key` without copying it.
    fn blob_len(&mut self, key: &str) -> Result<usize>;

    /// Stores `data` under `key`, replacing any previous value.
    fn set_blob(&mut self, key: &str, data: &[u8]) -> Result<()>;

    /// Removes `key` from the namespace.
    fn erase_key(&mut self, key: &str) -> Result<()>;

    /// Removes every key in the namespace.
    fn erase_all(&mut self) -> Result<()>;

    /// Makes all buffered mutations durable.
    fn commit(&mut self) -> Result<()>;
}
