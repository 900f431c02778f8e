//! Common error types used across the workspace.
//!
//! Each layer converts into [`HearthError`] via `#[from]`; adapters decide
//! how a variant is surfaced on the wire.

/// Top-level error for every fallible operation in hearth.
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("stream error")]
    Stream(#[from] StreamError),
}

/// A request carried a value outside of its accepted domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid room number: {0}")]
    InvalidRoom(String),

    #[error("invalid security action: {0}")]
    InvalidSecurityAction(String),

    #[error("invalid device action: {0}")]
    InvalidDeviceAction(String),

    #[error("device type must not be empty")]
    EmptyDeviceType,
}

/// Failure of a single streaming call. Only the affected stream terminates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// An inbound frame could not be decoded into the expected message.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// The underlying transport failed while reading or writing.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The peer went away before signalling end-of-stream.
    #[error("peer disconnected before end of stream")]
    Disconnected,
}
