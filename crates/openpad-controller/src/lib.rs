//! Virtual controller objects for OpenPad.
//!
//! This crate composes the mapper and force-feedback layers into the object
//! applications interact with:
//!
//! - [`controller`]: the virtual controller itself, with per-axis property
//!   transforms, status tracking, and state-change notification
//! - [`event_buffer`]: the bounded state-change event FIFO
//! - [`properties`]: deadzone/saturation/range transform math
//! - [`math`]: raw analog and trigger transform helpers
//! - [`registry`]: force-feedback registration with back-references
//!
//! The physical-device layer polls hardware and pushes each new reading into
//! every registered virtual controller via
//! [`VirtualController::refresh_state`]; applications read state, configure
//! properties, and drain buffered events from the other side.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod controller;
pub mod event_buffer;
pub mod math;
pub mod properties;
pub mod registry;

pub use controller::{DeviceStatus, VirtualController, FF_GAIN_DEFAULT, FF_GAIN_MAX};
pub use event_buffer::{
    Event, EventData, EventValue, StateChangeEventBuffer, EVENT_BUFFER_CAPACITY_MAX,
};
pub use math::{apply_raw_analog_transform, apply_raw_trigger_transform};
pub use properties::{
    AxisProperties, AXIS_DEADZONE_DEFAULT, AXIS_SATURATION_DEFAULT, RANGE_MAX_DEFAULT,
    RANGE_MIN_DEFAULT,
};
pub use registry::ForceFeedbackRegistry;
