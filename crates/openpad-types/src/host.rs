//! Host-side output collaborators.
//!
//! Element mappers can route physical controller input to the host keyboard
//! or mouse instead of (or in addition to) virtual controller elements. The
//! traits here are the seams through which those contributions leave the
//! library; the platform layer supplies real implementations and tests supply
//! recording fakes.

use serde::{Deserialize, Serialize};

/// Host mouse axes a mapper can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseAxis {
    X,
    Y,
    WheelHorizontal,
    WheelVertical,
}

/// Host mouse buttons a mapper can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

/// Sink for synthesized host keyboard state.
pub trait HostKeyboard: Send + Sync {
    /// Submits the pressed state of one key, identified by scancode.
    fn set_key(&self, scancode: u16, pressed: bool);
}

/// Sink for synthesized host mouse state.
pub trait HostMouse: Send + Sync {
    /// Submits movement on one mouse axis.
    fn set_axis(&self, axis: MouseAxis, delta: i32);

    /// Submits the pressed state of one mouse button.
    fn set_button(&self, button: MouseButton, pressed: bool);
}

/// Level-triggered, auto-reset notification handle signalled when a virtual
/// controller's state changes.
///
/// Signalling must never block; implementations typically post to a
/// semaphore-like object the application waits on.
pub trait StateChangeNotify: Send + Sync {
    fn signal(&self);
}
