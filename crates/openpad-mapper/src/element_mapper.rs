//! Element mappers: composable transforms from one physical controller
//! element to contributions on virtual controller elements or host output.
//!
//! Contributions accumulate: analog contributions are summed with saturation
//! at the analog extremes, digital contributions are ORed. A single physical
//! element may therefore feed several virtual elements (through
//! [`ElementMapper::Compound`]) and several physical elements may feed the
//! same virtual element.

use openpad_types::constants::{
    ANALOG_MAX, ANALOG_MIN, ANALOG_PRESSED_THRESHOLD, ANALOG_PRESSED_THRESHOLD_NEGATIVE,
    TRIGGER_MAX, TRIGGER_PRESSED_THRESHOLD,
};
use openpad_types::element::{Axis, Button, ElementIdentifier, PovDirection};
use openpad_types::host::{HostKeyboard, HostMouse, MouseAxis, MouseButton};
use openpad_types::state::VirtualState;
use openpad_types::ControllerId;
use serde::{Deserialize, Serialize};

/// Limit on how deeply element mapper expressions may nest.
pub const ELEMENT_MAPPER_MAX_DEPTH: u32 = 4;

/// Maximum number of children a [`ElementMapper::Compound`] mapper may have.
pub const COMPOUND_MAPPER_MAX_CHILDREN: usize = 4;

/// Which half of an axis' range of motion a mapper contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisDirection {
    /// Whole range of motion.
    #[default]
    Both,
    /// Positive half only; negative input is treated as neutral.
    Positive,
    /// Negative half only; positive input is treated as neutral.
    Negative,
}

/// Destination context for one mapping pass.
///
/// Carries the virtual state accumulator alongside the optional host output
/// sinks and the identifier of the physical controller whose state is being
/// mapped.
pub struct MapContext<'a> {
    pub state: &'a mut VirtualState,
    pub source_controller: ControllerId,
    pub keyboard: Option<&'a dyn HostKeyboard>,
    pub mouse: Option<&'a dyn HostMouse>,
}

/// A transform from one physical element reading to zero or more virtual
/// element or host output contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementMapper {
    /// Contributes an analog value to a virtual axis.
    Axis { axis: Axis, direction: AxisDirection },
    /// Like `Axis` but contributes only saturated extremes, driven by a 50%
    /// press threshold.
    DigitalAxis { axis: Axis, direction: AxisDirection },
    /// Contributes a press to a virtual button.
    Button(Button),
    /// Contributes to one POV hat direction component.
    Pov(PovDirection),
    /// Forwards pressed state to a host keyboard key.
    Keyboard { scancode: u16 },
    /// Forwards analog movement to a host mouse axis.
    MouseAxis {
        axis: MouseAxis,
        direction: AxisDirection,
    },
    /// Forwards pressed state to a host mouse button.
    MouseButton(MouseButton),
    /// Negates analog input before delegating; digital input is delegated
    /// unchanged.
    Invert(Box<ElementMapper>),
    /// Routes the positive half-range to one mapper and the reflected
    /// negative half-range to another.
    Split {
        positive: Box<ElementMapper>,
        negative: Box<ElementMapper>,
    },
    /// Fans the same input out to up to four mappers.
    Compound(Vec<ElementMapper>),
    /// Produces nothing. Preserves structure where a mapper expression needs
    /// an explicit hole.
    Null,
}

/// Saturating accumulation into an axis slot.
fn accumulate_axis(state: &mut VirtualState, axis: Axis, contribution: i32) {
    let sum = state.axis(axis).saturating_add(contribution);
    state.set_axis(axis, sum.clamp(ANALOG_MIN, ANALOG_MAX));
}

/// Applies a direction filter to an analog contribution.
fn filter_direction(value: i32, direction: AxisDirection) -> i32 {
    match direction {
        AxisDirection::Both => value,
        AxisDirection::Positive => value.max(0),
        AxisDirection::Negative => value.min(0),
    }
}

/// Scales a trigger reading onto the non-negative analog half-range.
fn trigger_to_analog(value: u8) -> i32 {
    (value as i32 * ANALOG_MAX) / TRIGGER_MAX as i32
}

/// Extreme analog value contributed by a digital press, honoring the
/// direction filter.
fn digital_press_extreme(pressed: bool, direction: AxisDirection) -> i32 {
    if !pressed {
        return 0;
    }
    match direction {
        AxisDirection::Both | AxisDirection::Positive => ANALOG_MAX,
        AxisDirection::Negative => -ANALOG_MAX,
    }
}

/// Whether an analog reading counts as pressed in the positive direction.
#[inline]
pub fn is_analog_pressed_positive(value: i16) -> bool {
    value as i32 >= ANALOG_PRESSED_THRESHOLD
}

/// Whether an analog reading counts as pressed in the negative direction.
#[inline]
pub fn is_analog_pressed_negative(value: i16) -> bool {
    (value as i32) <= ANALOG_PRESSED_THRESHOLD_NEGATIVE
}

/// Whether an analog reading counts as pressed in either direction.
#[inline]
pub fn is_analog_pressed(value: i16) -> bool {
    is_analog_pressed_positive(value) || is_analog_pressed_negative(value)
}

/// Whether a trigger reading counts as pressed.
#[inline]
pub fn is_trigger_pressed(value: u8) -> bool {
    value >= TRIGGER_PRESSED_THRESHOLD
}

impl ElementMapper {
    /// Contributes one signed analog reading (a stick coordinate).
    pub fn contribute_from_analog(&self, ctx: &mut MapContext<'_>, value: i16) {
        match self {
            ElementMapper::Axis { axis, direction } => {
                accumulate_axis(
                    ctx.state,
                    *axis,
                    filter_direction(value as i32, *direction),
                );
            }
            ElementMapper::DigitalAxis { axis, direction } => {
                let contribution = if is_analog_pressed_positive(value) {
                    filter_direction(ANALOG_MAX, *direction)
                } else if is_analog_pressed_negative(value) {
                    filter_direction(-ANALOG_MAX, *direction)
                } else {
                    0
                };
                accumulate_axis(ctx.state, *axis, contribution);
            }
            ElementMapper::Button(button) => {
                ctx.state.buttons.accumulate(*button, is_analog_pressed(value));
            }
            ElementMapper::Pov(direction) => {
                if is_analog_pressed(value) {
                    ctx.state.pov.press(*direction);
                }
            }
            ElementMapper::Keyboard { scancode } => {
                if let Some(keyboard) = ctx.keyboard {
                    keyboard.set_key(*scancode, is_analog_pressed(value));
                }
            }
            ElementMapper::MouseAxis { axis, direction } => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_axis(*axis, filter_direction(value as i32, *direction));
                }
            }
            ElementMapper::MouseButton(button) => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_button(*button, is_analog_pressed(value));
                }
            }
            ElementMapper::Invert(inner) => {
                let inverted = (-(value as i32)).clamp(ANALOG_MIN, ANALOG_MAX) as i16;
                inner.contribute_from_analog(ctx, inverted);
            }
            ElementMapper::Split { positive, negative } => {
                positive.contribute_from_analog(ctx, value.max(0));
                let reflected = (-(value as i32)).clamp(0, ANALOG_MAX) as i16;
                negative.contribute_from_analog(ctx, reflected);
            }
            ElementMapper::Compound(children) => {
                for child in children {
                    child.contribute_from_analog(ctx, value);
                }
            }
            ElementMapper::Null => {}
        }
    }

    /// Contributes one trigger reading.
    pub fn contribute_from_trigger(&self, ctx: &mut MapContext<'_>, value: u8) {
        match self {
            ElementMapper::Axis { axis, direction } => {
                accumulate_axis(
                    ctx.state,
                    *axis,
                    filter_direction(trigger_to_analog(value), *direction),
                );
            }
            ElementMapper::DigitalAxis { axis, direction } => {
                let contribution = if is_trigger_pressed(value) {
                    filter_direction(ANALOG_MAX, *direction)
                } else {
                    0
                };
                accumulate_axis(ctx.state, *axis, contribution);
            }
            ElementMapper::Button(button) => {
                ctx.state.buttons.accumulate(*button, is_trigger_pressed(value));
            }
            ElementMapper::Pov(direction) => {
                if is_trigger_pressed(value) {
                    ctx.state.pov.press(*direction);
                }
            }
            ElementMapper::Keyboard { scancode } => {
                if let Some(keyboard) = ctx.keyboard {
                    keyboard.set_key(*scancode, is_trigger_pressed(value));
                }
            }
            ElementMapper::MouseAxis { axis, direction } => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_axis(*axis, filter_direction(trigger_to_analog(value), *direction));
                }
            }
            ElementMapper::MouseButton(button) => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_button(*button, is_trigger_pressed(value));
                }
            }
            ElementMapper::Invert(inner) => {
                inner.contribute_from_trigger(ctx, TRIGGER_MAX - value);
            }
            ElementMapper::Split { positive, negative } => {
                positive.contribute_from_trigger(ctx, value);
                negative.contribute_from_trigger(ctx, 0);
            }
            ElementMapper::Compound(children) => {
                for child in children {
                    child.contribute_from_trigger(ctx, value);
                }
            }
            ElementMapper::Null => {}
        }
    }

    /// Contributes one digital button reading.
    pub fn contribute_from_button(&self, ctx: &mut MapContext<'_>, pressed: bool) {
        match self {
            ElementMapper::Axis { axis, direction }
            | ElementMapper::DigitalAxis { axis, direction } => {
                accumulate_axis(ctx.state, *axis, digital_press_extreme(pressed, *direction));
            }
            ElementMapper::Button(button) => {
                ctx.state.buttons.accumulate(*button, pressed);
            }
            ElementMapper::Pov(direction) => {
                if pressed {
                    ctx.state.pov.press(*direction);
                }
            }
            ElementMapper::Keyboard { scancode } => {
                if let Some(keyboard) = ctx.keyboard {
                    keyboard.set_key(*scancode, pressed);
                }
            }
            ElementMapper::MouseAxis { axis, direction } => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_axis(*axis, digital_press_extreme(pressed, *direction));
                }
            }
            ElementMapper::MouseButton(button) => {
                if let Some(mouse) = ctx.mouse {
                    mouse.set_button(*button, pressed);
                }
            }
            ElementMapper::Invert(inner) => {
                inner.contribute_from_button(ctx, pressed);
            }
            ElementMapper::Split { positive, negative } => {
                positive.contribute_from_button(ctx, pressed);
                negative.contribute_from_button(ctx, false);
            }
            ElementMapper::Compound(children) => {
                for child in children {
                    child.contribute_from_button(ctx, pressed);
                }
            }
            ElementMapper::Null => {}
        }
    }

    /// Virtual elements this mapper could contribute to, recursively.
    /// Host-output mappers contribute to no virtual element.
    pub fn target_elements(&self) -> Vec<ElementIdentifier> {
        match self {
            ElementMapper::Axis { axis, .. } | ElementMapper::DigitalAxis { axis, .. } => {
                vec![ElementIdentifier::Axis(*axis)]
            }
            ElementMapper::Button(button) => vec![ElementIdentifier::Button(*button)],
            ElementMapper::Pov(_) => vec![ElementIdentifier::Pov],
            ElementMapper::Keyboard { .. }
            | ElementMapper::MouseAxis { .. }
            | ElementMapper::MouseButton(_)
            | ElementMapper::Null => Vec::new(),
            ElementMapper::Invert(inner) => inner.target_elements(),
            ElementMapper::Split { positive, negative } => {
                let mut targets = positive.target_elements();
                targets.extend(negative.target_elements());
                targets
            }
            ElementMapper::Compound(children) => children
                .iter()
                .flat_map(ElementMapper::target_elements)
                .collect(),
        }
    }

    /// Nesting depth of this mapper expression. Leaf mappers have depth 1;
    /// `Null` has depth 0 since it only marks a structural hole.
    pub fn depth(&self) -> u32 {
        match self {
            ElementMapper::Invert(inner) => 1 + inner.depth(),
            ElementMapper::Split { positive, negative } => {
                1 + positive.depth().max(negative.depth())
            }
            ElementMapper::Compound(children) => {
                1 + children.iter().map(ElementMapper::depth).max().unwrap_or(0)
            }
            ElementMapper::Null => 0,
            _ => 1,
        }
    }

    /// Checks structural invariants: nesting depth and compound arity.
    pub fn validate(&self) -> Result<(), openpad_errors::ValidationError> {
        if self.depth() > ELEMENT_MAPPER_MAX_DEPTH {
            return Err(openpad_errors::ValidationError::out_of_range(
                "element mapper depth",
                self.depth() as i64,
                1,
                ELEMENT_MAPPER_MAX_DEPTH as i64,
            ));
        }
        self.validate_arity()
    }

    fn validate_arity(&self) -> Result<(), openpad_errors::ValidationError> {
        match self {
            ElementMapper::Compound(children) => {
                if children.len() > COMPOUND_MAPPER_MAX_CHILDREN {
                    return Err(openpad_errors::ValidationError::out_of_range(
                        "compound mapper children",
                        children.len() as i64,
                        0,
                        COMPOUND_MAPPER_MAX_CHILDREN as i64,
                    ));
                }
                for child in children {
                    child.validate_arity()?;
                }
                Ok(())
            }
            ElementMapper::Invert(inner) => inner.validate_arity(),
            ElementMapper::Split { positive, negative } => {
                positive.validate_arity()?;
                negative.validate_arity()
            }
            _ => Ok(()),
        }
    }
}
