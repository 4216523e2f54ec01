//! Centralized error types for OpenPad.
//!
//! Errors are organized by domain:
//!
//! - [`validation`]: rejected parameter values (properties, effect
//!   parameters, coordinates)
//! - [`device`]: physical device conditions surfaced to callers
//! - [`parse`]: mapper definition string parse failures
//!
//! The top-level [`OpenpadError`] wraps all domain errors for callers that
//! propagate across subsystem boundaries. Errors are plain values; no
//! exception-style control flow exists anywhere in the library, and hot-path
//! operations (state mapping, property application, magnitude computation)
//! have infallible signatures by design.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod device;
pub mod parse;
pub mod validation;

pub use device::DeviceError;
pub use parse::ParseError;
pub use validation::ValidationError;

/// Top-level error type wrapping all OpenPad domain errors.
#[derive(Debug, thiserror::Error)]
pub enum OpenpadError {
    /// Parameter validation errors
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Physical device errors
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Mapper definition parse errors
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl OpenpadError {
    /// Whether the operation that produced this error can be retried without
    /// any state change. Transient device errors clear on the next successful
    /// poll; everything else requires the caller to change its input.
    pub fn is_transient(&self) -> bool {
        matches!(self, OpenpadError::Device(DeviceError::Transient))
    }
}

/// A specialized `Result` type for OpenPad operations.
pub type Result<T> = std::result::Result<T, OpenpadError>;
