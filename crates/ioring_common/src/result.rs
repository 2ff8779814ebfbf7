//! Internal error type of the compiler.

/// Result of an operation that can only fail through a compiler bug.
///
/// Problems with a requirement never surface here: they become diagnostics
/// and the compile call still returns `Ok`.
pub type IoRingResult<T> = Result<T, InternalError>;

/// A broken compiler invariant.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// A stage received input an earlier stage should have rejected.
    #[error("internal compiler error: {0}")]
    Invariant(String),
    /// The intent graph could not be serialized.
    #[error("internal compiler error: serializing intent graph: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl InternalError {
    /// Creates an [`Invariant`](Self::Invariant) error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}
