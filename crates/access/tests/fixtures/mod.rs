use nvblob::{EngineError, MemoryEngine, StoreEngine};

/// Opens an in-memory engine on the default test namespace.
///
/// # Panics
/// * If the namespace name is rejected, the function will panic.
#[must_use]
pub fn setup_engine() -> MemoryEngine {
    MemoryEngine::builder().namespace("storage").expect("Engine setup failed").build()
}

/// Engine wrapper that counts calls into the mutation path.
///
/// Lets tests assert *how many* flash writes an operation performed, which is
/// what the redundant-write-avoidance guarantee is about.
#[derive(Debug)]
pub struct CountingEngine<E> {
    pub inner: E,
    pub set_calls: usize,
    pub erase_calls: usize,
    pub commit_calls: usize,
}

impl<E: StoreEngine> CountingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, set_calls: 0, erase_calls: 0, commit_calls: 0 }
    }
}

impl<E: StoreEngine> StoreEngine for CountingEngine<E> {
    fn get_blob(&mut self, key: &str, out: &mut [u8]) -> Result<usize, EngineError> {
        self.inner.get_blob(key, out)
    }

    fn blob_len(&mut self, key: &str) -> Result<usize, EngineError> {
        self.inner.blob_len(key)
    }

    fn set_blob(&mut self, key: &str, data: &[u8]) -> Result<(), EngineError> {
        self.set_calls += 1;
        self.inner.set_blob(key, data)
    }

    fn erase_key(&mut self, key: &str) -> Result<(), EngineError> {
        self.erase_calls += 1;
        self.inner.erase_key(key)
    }

    fn erase_all(&mut self) -> Result<(), EngineError> {
        self.erase_calls += 1;
        self.inner.erase_all()
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        self.commit_calls += 1;
        self.inner.commit()
    }
}

/// How the next write through a [`FlakyEngine`] should go wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteFault {
    /// Behave normally.
    #[default]
    None,
    /// Store the value with its first byte flipped.
    CorruptContent,
    /// Store the value truncated by one byte.
    Truncate,
    /// Report success without storing anything.
    Drop,
    /// Fail the write with a bus error.
    BusError,
}

/// Engine wrapper with fault injection on writes and commits.
///
/// Emulates the flash misbehavior the verification protocol exists for:
/// corrupted or partial writes that the engine itself did not notice.
#[derive(Debug)]
pub struct FlakyEngine {
    pub inner: MemoryEngine,
    pub write_fault: WriteFault,
    pub fail_commit: bool,
    /// `Some(n)` lets `n` calls to `blob_len` pass, then fails the next one.
    pub blob_len_fault_in: Option<usize>,
    /// `Some(n)` lets `n` calls to `get_blob` pass, then fails the next one.
    pub get_blob_fault_in: Option<usize>,
}

impl FlakyEngine {
    pub fn new(inner: MemoryEngine) -> Self {
        Self {
            inner,
            write_fault: WriteFault::None,
            fail_commit: false,
            blob_len_fault_in: None,
            get_blob_fault_in: None,
        }
    }

    fn countdown_fault(counter: &mut Option<usize>, message: &'static str) -> Result<(), EngineError> {
        match counter {
            Some(0) => {
                *counter = None;
                Err(EngineError::Bus { message: message.into() })
            },
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            },
            None => Ok(()),
        }
    }
}

impl StoreEngine for FlakyEngine {
    fn get_blob(&mut self, key: &str, out: &mut [u8]) -> Result<usize, EngineError> {
        Self::countdown_fault(&mut self.get_blob_fault_in, "injected read fault")?;
        self.inner.get_blob(key, out)
    }

    fn blob_len(&mut self, key: &str) -> Result<usize, EngineError> {
        Self::countdown_fault(&mut self.blob_len_fault_in, "injected length fault")?;
        self.inner.blob_len(key)
    }

    fn set_blob(&mut self, key: &str, data: &[u8]) -> Result<(), EngineError> {
        // Each fault fires once, then the engine behaves again.
        match std::mem::take(&mut self.write_fault) {
            WriteFault::None => self.inner.set_blob(key, data),
            WriteFault::CorruptContent => {
                let mut corrupted = data.to_vec();
                if let Some(first) = corrupted.first_mut() {
                    *first = !*first;
                }
                self.inner.set_blob(key, &corrupted)
            },
            WriteFault::Truncate => {
                let truncated = &data[..data.len().saturating_sub(1)];
                self.inner.set_blob(key, truncated)
            },
            WriteFault::Drop => Ok(()),
            WriteFault::BusError => Err(EngineError::Bus { message: "injected write fault".into() }),
        }
    }

    fn erase_key(&mut self, key: &str) -> Result<(), EngineError> {
        self.inner.erase_key(key)
    }

    fn erase_all(&mut self) -> Result<(), EngineError> {
        self.inner.erase_all()
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        if self.fail_commit {
            self.fail_commit = false;
            return Err(EngineError::Bus { message: "injected commit fault".into() });
        }
        self.inner.commit()
    }
}
