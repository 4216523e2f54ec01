//! Physical device error conditions.

/// Device-related errors surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The physical controller is not connected.
    #[error("device not connected")]
    NotConnected,

    /// Polling failed transiently; the next poll retries.
    #[error("transient device error")]
    Transient,

    /// The operation requires the device to be acquired first.
    #[error("device not acquired")]
    NotAcquired,

    /// The requested operation is not supported by this controller layout,
    /// for example force feedback on a layout without mapped actuators.
    #[error("operation not supported by this controller")]
    Unsupported,
}
