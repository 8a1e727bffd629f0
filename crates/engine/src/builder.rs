use crate::contract::MAX_KEY_LEN;
use crate::error::EngineError;
use crate::memory::MemoryEngine;
use private::Sealed;
use std::fmt;

/// A validated namespace name.
///
/// Namespace names share the key naming rules of NVS-style engines: non-empty
/// and at most 15 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(pub String);

impl TryFrom<String> for NamespaceName {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, EngineError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for NamespaceName {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, EngineError> {
        if value.is_empty() {
            return Err(EngineError::InvalidNamespace {
                name: value.to_owned(),
                reason: "empty".into(),
            });
        }
        if value.len() > MAX_KEY_LEN {
            return Err(EngineError::InvalidNamespace {
                name: value.to_owned(),
                reason: "longer than 15 bytes".into(),
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
struct EngineConfig {
    read_only: bool,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
pub struct NoNamespace;
#[derive(Debug)]
pub struct WithNamespace(NamespaceName);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoNamespace {}
impl Sealed for WithNamespace {}

/// A builder for [`MemoryEngine`].
///
/// The namespace is the one mandatory piece of configuration; the type state
/// keeps `.build()` unreachable until it has been supplied and validated.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct MemoryEngineBuilder<S: Sealed = NoNamespace> {
    state: S,
    config: EngineConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> MemoryEngineBuilder<S> {
    /// Opens the handle read-only; every mutation will be refused with
    /// [`EngineError::ReadOnly`].
    #[must_use = "Sets the read-only mode of the engine handle"]
    pub const fn read_only(mut self, enable: bool) -> Self {
        self.config.read_only = enable;
        self
    }

    /// Caps the total value payload the namespace can hold, in bytes.
    ///
    /// Writes that would exceed the cap fail with [`EngineError::NoSpace`],
    /// emulating an exhausted flash partition.
    #[must_use = "Sets the capacity limit of the emulated partition"]
    pub const fn capacity(mut self, bytes: usize) -> Self {
        self.config.capacity = Some(bytes);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> MemoryEngineBuilder<N> {
        MemoryEngineBuilder { state, config: self.config }
    }
}

impl MemoryEngineBuilder<NoNamespace> {
    #[must_use = "Creates a new engine builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the engine to a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidNamespace`] if the name is empty or
    /// longer than 15 bytes.
    pub fn namespace<N>(self, name: N) -> Result<MemoryEngineBuilder<WithNamespace>, EngineError>
    where
        N: TryInto<NamespaceName, Error = EngineError>,
    {
        let ns = name.try_into()?;
        Ok(self.transition(WithNamespace(ns)))
    }
}

impl MemoryEngineBuilder<WithNamespace> {
    /// Consumes the configuration and returns an open engine handle.
    #[must_use = "Builds the configured engine handle"]
    pub fn build(self) -> MemoryEngine {
        MemoryEngine::from_builder(self.state.0.0, self.config.read_only, self.config.capacity)
    }
}
