//! Physical-to-virtual controller layout mapping for OpenPad.
//!
//! A [`Mapper`] owns one composable [`ElementMapper`] per physical controller
//! element plus a force-feedback [`ActuatorMap`], derives the aggregate
//! [`Capabilities`](openpad_types::Capabilities) of the virtual layout it
//! implements, and exposes whole-state mapping in a single infallible call.
//!
//! # Example
//!
//! ```
//! use openpad_mapper::{AxisDirection, ElementMap, ElementMapper, Mapper};
//! use openpad_types::element::{Axis, Button};
//! use openpad_types::state::{PhysicalButton, PhysicalButtonSet, PhysicalState};
//!
//! let mapper = Mapper::new(ElementMap {
//!     stick_left_x: Some(ElementMapper::Axis {
//!         axis: Axis::X,
//!         direction: AxisDirection::Both,
//!     }),
//!     button_a: Some(ElementMapper::Button(Button::new(0).expect("index in range"))),
//!     ..Default::default()
//! })?;
//!
//! let physical = PhysicalState {
//!     buttons: PhysicalButtonSet::from_buttons([PhysicalButton::A]),
//!     ..PhysicalState::NEUTRAL
//! };
//! let state = mapper.map_state(&physical, 0);
//! assert_eq!(state.buttons.bits(), 0b1);
//! # Ok::<(), openpad_errors::ValidationError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod actuator;
pub mod element_mapper;
pub mod mapper;
pub mod registry;

pub use actuator::{ActuatorElement, ActuatorMap, DEFAULT_MOTOR_ACTUATOR};
pub use element_mapper::{
    is_analog_pressed, is_analog_pressed_negative, is_analog_pressed_positive, is_trigger_pressed,
    AxisDirection, ElementMapper, MapContext, COMPOUND_MAPPER_MAX_CHILDREN,
    ELEMENT_MAPPER_MAX_DEPTH,
};
pub use mapper::{ElementMap, Mapper, MIN_BUTTON_COUNT, REQUIRED_AXES};
pub use registry::{by_name, by_name_required, is_name_known, register};
