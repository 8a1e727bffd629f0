//! Error taxonomy for the store-engine contract.
//!
//! The accessor layer above distinguishes "expected" outcomes ([`NotFound`],
//! [`InvalidLength`]) from engine-level fatals; implementations must keep that
//! distinction intact when mapping their native status codes.
//!
//! [`NotFound`]: EngineError::NotFound
//! [`InvalidLength`]: EngineError::InvalidLength

use std::borrow::Cow;

/// A specialized `Result` type for store-engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Status surface of a flash key-value engine.
///
/// Mirrors the result-code contract of wear-leveled flash stores: a key lookup
/// either succeeds, reports the key as absent, reports a caller-side sizing or
/// naming problem, or fails at the engine/hardware level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The key does not exist in the open namespace.
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// The stored value does not fit into the caller-provided buffer.
    #[error("value for {key} is {stored} bytes, buffer holds {capacity}")]
    InvalidLength { key: String, stored: usize, capacity: usize },

    /// The key violates the engine's naming rules (empty or too long).
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: Cow<'static, str> },

    /// The namespace name violates the engine's naming rules.
    #[error("invalid namespace {name:?}: {reason}")]
    InvalidNamespace { name: String, reason: Cow<'static, str> },

    /// The handle was opened read-only; mutation was refused.
    #[error("namespace {namespace} is open read-only")]
    ReadOnly { namespace: String },

    /// The partition cannot hold the value.
    #[error("out of flash space: {needed} bytes needed, {available} available")]
    NoSpace { needed: usize, available: usize },

    /// Engine- or hardware-level failure; unrecoverable for this operation.
    #[error("flash engine failure: {message}")]
    Bus { message: Cow<'static, str> },
}

impl EngineError {
    /// Whether this error is an expected lookup outcome rather than an
    /// engine-level failure.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidLength { .. })
    }
}
