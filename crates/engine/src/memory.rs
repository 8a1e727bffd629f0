//! Host-side reference implementation of the store-engine contract.
//!
//! [`MemoryEngine`] emulates the observable behavior of a wear-leveled flash
//! key-value namespace: staged mutations that become durable on `commit`,
//! NVS-style key naming limits, optional capacity accounting, and read-only
//! handles. It backs the crate's tests, benches, and doctests, and doubles as
//! a behavioral reference for authors of real device bindings.

use crate::builder::MemoryEngineBuilder;
use crate::contract::{MAX_KEY_LEN, StoreEngine};
use crate::error::{EngineError, Result};
use std::collections::HashMap;
use tracing::debug;

/// A staged, not-yet-durable mutation for one key.
#[derive(Debug, Clone)]
enum Slot {
    Value(Vec<u8>),
    Erased,
}

/// An in-memory flash key-value namespace with explicit commit semantics.
///
/// Mutations (`set_blob`, `erase_key`, `erase_all`) land in a staging overlay
/// that reads through the same handle observe immediately; [`commit`] folds
/// the overlay into durable state. [`power_cycle`] discards the overlay,
/// which is how tests simulate losing power before a commit.
///
/// # Example
///
/// ```rust
/// use nvblob_engine::{MemoryEngine, StoreEngine};
///
/// # fn main() -> nvblob_engine::Result<()> {
/// let mut engine = MemoryEngine::builder().namespace("boot")?.build();
///
/// engine.set_blob("serial", b"A1B2C3")?;
/// engine.commit()?;
///
/// let mut buf = [0u8; 6];
/// let len = engine.get_blob("serial", &mut buf)?;
/// assert_eq!(&buf[..len], b"A1B2C3");
/// # Ok(())
/// # }
/// ```
///
/// [`commit`]: StoreEngine::commit
/// [`power_cycle`]: MemoryEngine::power_cycle
#[derive(Debug)]
pub struct MemoryEngine {
    pub(crate) namespace: String,
    pub(crate) read_only: bool,
    pub(crate) capacity: Option<usize>,
    committed: HashMap<String, Vec<u8>>,
    staged: HashMap<String, Slot>,
    erase_all_pending: bool,
}

impl MemoryEngine {
    /// Returns a new [`MemoryEngineBuilder`] to configure the engine.
    #[must_use = "The engine is not usable until you call .build()"]
    pub fn builder() -> MemoryEngineBuilder {
        MemoryEngineBuilder::new()
    }

    pub(crate) fn from_builder(
        namespace: String,
        read_only: bool,
        capacity: Option<usize>,
    ) -> Self {
        Self {
            namespace,
            read_only,
            capacity,
            committed: HashMap::new(),
            staged: HashMap::new(),
            erase_all_pending: false,
        }
    }

    /// The namespace this handle is bound to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Discards every staged, uncommitted mutation.
    ///
    /// Emulates a power loss between `set_blob`/`erase_key` and `commit`:
    /// committed state survives, the staging overlay does not.
    pub fn power_cycle(&mut self) {
        let dropped = self.staged.len();
        self.staged.clear();
        self.erase_all_pending = false;
        debug!(namespace = %self.namespace, dropped, "Power cycle, staged mutations discarded");
    }

    /// Number of staged mutations awaiting commit.
    #[must_use]
    pub fn staged_mutations(&self) -> usize {
        self.staged.len() + usize::from(self.erase_all_pending)
    }

    /// Effective value under `key` as observed through this handle.
    fn lookup(&self, key: &str) -> Option<&[u8]> {
        match self.staged.get(key) {
            Some(Slot::Value(v)) => Some(v),
            Some(Slot::Erased) => None,
            None if self.erase_all_pending => None,
            None => self.committed.get(key).map(Vec::as_slice),
        }
    }

    /// Bytes of value payload currently held, staged state included.
    fn used_bytes(&self) -> usize {
        let committed: usize = if self.erase_all_pending {
            0
        } else {
            self.committed
                .iter()
                .filter(|(k, _)| !self.staged.contains_key(*k))
                .map(|(_, v)| v.len())
                .sum()
        };
        let staged: usize = self
            .staged
            .values()
            .map(|slot| match slot {
                Slot::Value(v) => v.len(),
                Slot::Erased => 0,
            })
            .sum();
        committed + staged
    }

    fn check_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(EngineError::InvalidKey { key: key.to_owned(), reason: "empty".into() });
        }
        if key.len() > MAX_KEY_LEN {
            return Err(EngineError::InvalidKey {
                key: key.to_owned(),
                reason: "longer than 15 bytes".into(),
            });
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(EngineError::ReadOnly { namespace: self.namespace.clone() });
        }
        Ok(())
    }

    fn check_space(&self, key: &str, incoming: usize) -> Result<()> {
        let Some(capacity) = self.capacity else { return Ok(()) };
        let displaced = self.lookup(key).map_or(0, <[u8]>::len);
        let occupied = self.used_bytes() - displaced;
        if occupied + incoming > capacity {
            return Err(EngineError::NoSpace {
                needed: incoming,
                available: capacity.saturating_sub(occupied),
            });
        }
        Ok(())
    }
}

impl StoreEngine for MemoryEngine {
    fn get_blob(&mut self, key: &str, out: &mut [u8]) -> Result<usize> {
        self.check_key(key)?;
        let value = self
            .lookup(key)
            .ok_or_else(|| EngineError::NotFound { key: key.to_owned() })?;
        if value.len() > out.len() {
            return Err(EngineError::InvalidLength {
                key: key.to_owned(),
                stored: value.len(),
                capacity: out.len(),
            });
        }
        out[..value.len()].copy_from_slice(value);
        Ok(value.len())
    }

    fn blob_len(&mut self, key: &str) -> Result<usize> {
        self.check_key(key)?;
        self.lookup(key)
            .map(<[u8]>::len)
            .ok_or_else(|| EngineError::NotFound { key: key.to_owned() })
    }

    fn set_blob(&mut self, key: &str, data: &[u8]) -> Result<()> {
        self.check_key(key)?;
        self.check_writable()?;
        self.check_space(key, data.len())?;
        self.staged.insert(key.to_owned(), Slot::Value(data.to_vec()));
        Ok(())
    }

    fn erase_key(&mut self, key: &str) -> Result<()> {
        self.check_key(key)?;
        self.check_writable()?;
        if self.lookup(key).is_none() {
            return Err(EngineError::NotFound { key: key.to_owned() });
        }
        self.staged.insert(key.to_owned(), Slot::Erased);
        Ok(())
    }

    fn erase_all(&mut self) -> Result<()> {
        self.check_writable()?;
        self.staged.clear();
        self.erase_all_pending = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.erase_all_pending {
            self.committed.clear();
            self.erase_all_pending = false;
        }
        let applied = self.staged.len();
        for (key, slot) in self.staged.drain() {
            match slot {
                Slot::Value(v) => {
                    self.committed.insert(key, v);
                },
                Slot::Erased => {
                    self.committed.remove(&key);
                },
            }
        }
        debug!(namespace = %self.namespace, applied, "Committed staged mutations");
        Ok(())
    }
}
