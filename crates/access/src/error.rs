//! # Access errors
//!
//! This module defines the [`AccessError`] enum and [`Result`] type used by
//! the accessor for reporting lookup misses, sizing mismatches, failed write
//! verification, and engine-level faults.

use nvblob_engine::EngineError;
use std::borrow::Cow;

/// A specialized `Result` type for accessor operations.
pub type Result<T> = std::result::Result<T, AccessError>;

/// What a failed [`confirmed_write`] verification step observed before the
/// key was rolled back.
///
/// [`confirmed_write`]: crate::Accessor::confirmed_write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// The stored length after the write differs from the input length.
    Length { written: usize, stored: usize },
    /// The written value could not be read back at all.
    Unreadable,
    /// The read-back bytes differ from the input bytes.
    Content,
}

/// A specialized [`AccessError`] enum for blob-access failures.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No value is stored under the key.
    ///
    /// An expected outcome for first-boot reads; never fatal.
    #[error("no stored data for key {key}")]
    NotFound { key: String },

    /// A value is stored, but its length differs from the caller's
    /// expectation.
    ///
    /// Signals a read with the wrong assumed size, or data overwritten with
    /// different-sized content. Never fatal.
    #[error("stored data for {key} is {stored} bytes, expected {expected}")]
    SizeMismatch { key: String, expected: usize, stored: usize },

    /// Post-write verification failed and the key was erased.
    ///
    /// The rollback already ran by the time the caller sees this: the key no
    /// longer holds the unconfirmed value.
    #[error("write verification failed for {key}, key rolled back")]
    Verification { key: String, failure: VerifyFailure },

    /// The engine reported a failure beyond the expected lookup outcomes.
    ///
    /// Unrecoverable for this operation; the caller owns the recovery or
    /// restart strategy.
    #[error("store engine failure ({context}): {source}")]
    Engine {
        context: Cow<'static, str>,
        source: EngineError,
    },
}

impl AccessError {
    pub(crate) fn engine(context: impl Into<Cow<'static, str>>, source: EngineError) -> Self {
        Self::Engine { context: context.into(), source }
    }
}

/// Lets callers use `?` on engine-level calls (handle construction, direct
/// engine access) inside functions returning the access-level [`Result`].
impl From<EngineError> for AccessError {
    fn from(source: EngineError) -> Self {
        Self::Engine { context: "engine".into(), source }
    }
}
