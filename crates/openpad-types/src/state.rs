//! Physical and virtual controller state records.

use serde::{Deserialize, Serialize};

use crate::constants::{ANALOG_NEUTRAL, TRIGGER_MIN};
use crate::element::{Axis, Button, PovComponents, AXIS_COUNT};
use crate::ControllerId;

/// Connection status reported by a physical input poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhysicalDeviceStatus {
    /// Device is connected and the associated state is valid.
    #[default]
    Ok,
    /// Device is not connected. Associated state is meaningless.
    NotConnected,
    /// Polling failed transiently. Associated state is meaningless.
    Error,
}

/// Digital buttons present on a physical controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PhysicalButton {
    DpadUp = 0,
    DpadDown = 1,
    DpadLeft = 2,
    DpadRight = 3,
    Start = 4,
    Back = 5,
    LS = 6,
    RS = 7,
    LB = 8,
    RB = 9,
    A = 10,
    B = 11,
    X = 12,
    Y = 13,
}

/// Number of distinct physical buttons.
pub const PHYSICAL_BUTTON_COUNT: usize = 14;

/// Set of pressed physical buttons, stored as a bitmask.
///
/// # Examples
///
/// ```
/// use openpad_types::state::{PhysicalButton, PhysicalButtonSet};
///
/// let set = PhysicalButtonSet::from_buttons([PhysicalButton::A, PhysicalButton::LB]);
/// assert!(set.contains(PhysicalButton::A));
/// assert!(!set.contains(PhysicalButton::B));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalButtonSet(u16);

impl PhysicalButtonSet {
    /// Empty set.
    pub const EMPTY: PhysicalButtonSet = PhysicalButtonSet(0);

    /// Builds a set from a list of pressed buttons.
    pub fn from_buttons<I: IntoIterator<Item = PhysicalButton>>(buttons: I) -> Self {
        let mut set = Self::EMPTY;
        for button in buttons {
            set.insert(button);
        }
        set
    }

    /// Marks a button as pressed.
    pub fn insert(&mut self, button: PhysicalButton) {
        self.0 |= 1 << (button as usize);
    }

    /// Whether a button is pressed.
    #[inline]
    pub const fn contains(self, button: PhysicalButton) -> bool {
        (self.0 >> (button as usize)) & 1 != 0
    }
}

/// Analog stick axes on a physical controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PhysicalStick {
    LeftX = 0,
    LeftY = 1,
    RightX = 2,
    RightY = 3,
}

/// Analog triggers on a physical controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PhysicalTrigger {
    Left = 0,
    Right = 1,
}

/// Snapshot of a physical controller as returned by one input poll.
///
/// Stick Y coordinates are stored with "up is positive" orientation; the
/// polling source applies that inversion before constructing this record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalState {
    pub status: PhysicalDeviceStatus,
    pub sticks: [i16; 4],
    pub triggers: [u8; 2],
    pub buttons: PhysicalButtonSet,
}

impl PhysicalState {
    /// A connected state with every element at rest.
    pub const NEUTRAL: PhysicalState = PhysicalState {
        status: PhysicalDeviceStatus::Ok,
        sticks: [ANALOG_NEUTRAL as i16; 4],
        triggers: [TRIGGER_MIN; 2],
        buttons: PhysicalButtonSet::EMPTY,
    };

    /// Reading of one stick axis.
    #[inline]
    pub const fn stick(&self, stick: PhysicalStick) -> i16 {
        self.sticks[stick as usize]
    }

    /// Reading of one trigger.
    #[inline]
    pub const fn trigger(&self, trigger: PhysicalTrigger) -> u8 {
        self.triggers[trigger as usize]
    }

    /// Whether one digital button is pressed.
    #[inline]
    pub const fn button(&self, button: PhysicalButton) -> bool {
        self.buttons.contains(button)
    }
}

/// Kind of reading a physical element produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalElementKind {
    /// Signed 16-bit stick coordinate.
    Analog,
    /// Unsigned 8-bit trigger value.
    Trigger,
    /// Pressed/released state.
    Digital,
}

/// Every mappable element of a physical controller, in element-map slot
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PhysicalElement {
    StickLeftX = 0,
    StickLeftY = 1,
    StickRightX = 2,
    StickRightY = 3,
    DpadUp = 4,
    DpadDown = 5,
    DpadLeft = 6,
    DpadRight = 7,
    TriggerLT = 8,
    TriggerRT = 9,
    ButtonA = 10,
    ButtonB = 11,
    ButtonX = 12,
    ButtonY = 13,
    ButtonLB = 14,
    ButtonRB = 15,
    ButtonBack = 16,
    ButtonStart = 17,
    ButtonLS = 18,
    ButtonRS = 19,
}

/// Number of mappable physical elements.
pub const PHYSICAL_ELEMENT_COUNT: usize = 20;

impl PhysicalElement {
    /// All physical elements in slot order.
    pub const ALL: [PhysicalElement; PHYSICAL_ELEMENT_COUNT] = [
        PhysicalElement::StickLeftX,
        PhysicalElement::StickLeftY,
        PhysicalElement::StickRightX,
        PhysicalElement::StickRightY,
        PhysicalElement::DpadUp,
        PhysicalElement::DpadDown,
        PhysicalElement::DpadLeft,
        PhysicalElement::DpadRight,
        PhysicalElement::TriggerLT,
        PhysicalElement::TriggerRT,
        PhysicalElement::ButtonA,
        PhysicalElement::ButtonB,
        PhysicalElement::ButtonX,
        PhysicalElement::ButtonY,
        PhysicalElement::ButtonLB,
        PhysicalElement::ButtonRB,
        PhysicalElement::ButtonBack,
        PhysicalElement::ButtonStart,
        PhysicalElement::ButtonLS,
        PhysicalElement::ButtonRS,
    ];

    /// Slot index of this element within an element map.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind of reading this element produces.
    pub const fn kind(self) -> PhysicalElementKind {
        match self {
            PhysicalElement::StickLeftX
            | PhysicalElement::StickLeftY
            | PhysicalElement::StickRightX
            | PhysicalElement::StickRightY => PhysicalElementKind::Analog,
            PhysicalElement::TriggerLT | PhysicalElement::TriggerRT => PhysicalElementKind::Trigger,
            _ => PhysicalElementKind::Digital,
        }
    }
}

/// Set of pressed virtual buttons, stored as a bitmask indexed by
/// [`Button::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonSet(u16);

impl ButtonSet {
    /// Empty set.
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Builds a set directly from a bitmask. Bit `n` is button index `n`.
    pub const fn from_bits(bits: u16) -> ButtonSet {
        ButtonSet(bits)
    }

    /// The underlying bitmask.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether a button is pressed.
    #[inline]
    pub const fn contains(self, button: Button) -> bool {
        (self.0 >> button.index()) & 1 != 0
    }

    /// ORs a pressed state into the set. A `false` contribution never clears
    /// a press already recorded by another mapper.
    pub fn accumulate(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.0 |= 1 << button.index();
        }
    }
}

/// Complete virtual controller state.
///
/// Axis values are *pre-property* when produced by a mapper and
/// *post-property* when produced by a virtual controller. POV components are
/// canonical (opposing directions cancelled) in any state produced by
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VirtualState {
    pub axes: [i32; AXIS_COUNT],
    pub buttons: ButtonSet,
    pub pov: PovComponents,
}

impl VirtualState {
    /// State with every element at rest.
    pub const NEUTRAL: VirtualState = VirtualState {
        axes: [ANALOG_NEUTRAL; AXIS_COUNT],
        buttons: ButtonSet::EMPTY,
        pov: PovComponents::CENTER,
    };

    /// Value of one axis.
    #[inline]
    pub const fn axis(&self, axis: Axis) -> i32 {
        self.axes[axis.index()]
    }

    /// Sets one axis value.
    #[inline]
    pub fn set_axis(&mut self, axis: Axis, value: i32) {
        self.axes[axis.index()] = value;
    }

    /// Whether one button is pressed.
    #[inline]
    pub const fn button(&self, button: Button) -> bool {
        self.buttons.contains(button)
    }
}

/// Per-actuator output values, scaled to the physical actuator range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActuatorOutputs {
    pub left_motor: u16,
    pub right_motor: u16,
    pub left_impulse_trigger: u16,
    pub right_impulse_trigger: u16,
}

impl ActuatorOutputs {
    /// All actuators off.
    pub const NONE: ActuatorOutputs = ActuatorOutputs {
        left_motor: 0,
        right_motor: 0,
        left_impulse_trigger: 0,
        right_impulse_trigger: 0,
    };
}

/// Source of physical controller input and sink for actuator output.
///
/// Implemented by the platform layer that talks to real hardware; tests use
/// scripted fakes.
pub trait PhysicalInput: Send + Sync {
    /// Returns the current state of the identified controller atomically.
    fn poll(&self, controller: ControllerId) -> PhysicalState;

    /// Writes per-actuator force-feedback output to the identified
    /// controller.
    fn write_actuators(&self, controller: ControllerId, outputs: ActuatorOutputs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_states_are_default() {
        assert_eq!(PhysicalState::default(), PhysicalState::NEUTRAL);
        assert_eq!(VirtualState::default(), VirtualState::NEUTRAL);
    }

    #[test]
    fn button_set_accumulate_is_or() {
        let b0 = Button::new(0).expect("in range");
        let mut set = ButtonSet::EMPTY;

        set.accumulate(b0, true);
        set.accumulate(b0, false);
        assert!(set.contains(b0));
        assert_eq!(set.bits(), 0b1);
    }

    #[test]
    fn physical_element_slot_order_is_stable() {
        for (index, element) in PhysicalElement::ALL.iter().enumerate() {
            assert_eq!(element.index(), index);
        }
    }

    #[test]
    fn physical_element_kinds() {
        assert_eq!(
            PhysicalElement::StickRightY.kind(),
            PhysicalElementKind::Analog
        );
        assert_eq!(
            PhysicalElement::TriggerLT.kind(),
            PhysicalElementKind::Trigger
        );
        assert_eq!(PhysicalElement::DpadUp.kind(), PhysicalElementKind::Digital);
        assert_eq!(
            PhysicalElement::ButtonRS.kind(),
            PhysicalElementKind::Digital
        );
    }
}
