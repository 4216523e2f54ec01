//! Core types for the OpenPad virtual controller layer.
//!
//! This crate provides the vocabulary shared by every other OpenPad crate:
//! controller element enumerations, physical and virtual state records,
//! capability descriptors, the bit-exact analog/trigger/force constants of the
//! emulated input API, process-wide monotonic counters, and the collaborator
//! traits through which platform services (clocks, physical input sources,
//! host keyboard/mouse output) are injected.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod capabilities;
pub mod clock;
pub mod constants;
pub mod element;
pub mod force;
pub mod host;
pub mod sequence;
pub mod state;

pub use capabilities::{AxisCapability, Capabilities};
pub use clock::{Clock, SystemClock};
pub use constants::*;
pub use element::{
    Axis, Button, CompassDirection, ElementIdentifier, ElementType, PovComponents, PovDirection,
    AXIS_COUNT, BUTTON_COUNT_MAX,
};
pub use force::{
    EffectTimeMs, EffectValue, OrderedMagnitudeComponents, ZERO_MAGNITUDE_COMPONENTS,
};
pub use host::{HostKeyboard, HostMouse, MouseAxis, MouseButton, StateChangeNotify};
pub use sequence::{effect_identifiers, event_sequences, SequenceSource};
pub use state::{
    ActuatorOutputs, ButtonSet, PhysicalButton, PhysicalButtonSet, PhysicalDeviceStatus,
    PhysicalElement, PhysicalElementKind, PhysicalInput, PhysicalState, PhysicalStick,
    PhysicalTrigger, VirtualState, PHYSICAL_ELEMENT_COUNT,
};

/// Opaque identifier of a physical controller.
pub type ControllerId = u32;
