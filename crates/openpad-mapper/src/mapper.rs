//! The mapper: a complete physical-to-virtual controller layout.
//!
//! A mapper owns one optional element mapper per physical controller element
//! plus a force-feedback actuator map. Its aggregate capabilities are derived
//! once at construction; instances are immutable afterwards and normally live
//! for the lifetime of the process.

use openpad_errors::ValidationError;
use openpad_types::capabilities::{AxisCapability, Capabilities};
use openpad_types::element::{Axis, Button, ElementIdentifier};
use openpad_types::force::{EffectValue, OrderedMagnitudeComponents};
use openpad_types::host::{HostKeyboard, HostMouse};
use openpad_types::state::{
    ActuatorOutputs, PhysicalDeviceStatus, PhysicalElement, PhysicalElementKind, PhysicalState,
    VirtualState,
};
use openpad_types::ControllerId;

use crate::actuator::ActuatorMap;
use crate::element_mapper::{ElementMapper, MapContext};

/// Axes reported present on every virtual controller, whether or not any
/// element mapper targets them. Unmapped required axes read neutral.
pub const REQUIRED_AXES: [Axis; 2] = [Axis::X, Axis::Y];

/// Minimum number of buttons reported on every virtual controller.
pub const MIN_BUTTON_COUNT: u8 = 2;

/// One element mapper slot per physical controller element.
///
/// Slots left `None` ignore their physical element entirely. The named
/// fields correspond one-to-one with [`PhysicalElement`] variants;
/// [`ElementMap::get`] provides the indexed view over the same data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    pub stick_left_x: Option<ElementMapper>,
    pub stick_left_y: Option<ElementMapper>,
    pub stick_right_x: Option<ElementMapper>,
    pub stick_right_y: Option<ElementMapper>,
    pub dpad_up: Option<ElementMapper>,
    pub dpad_down: Option<ElementMapper>,
    pub dpad_left: Option<ElementMapper>,
    pub dpad_right: Option<ElementMapper>,
    pub trigger_lt: Option<ElementMapper>,
    pub trigger_rt: Option<ElementMapper>,
    pub button_a: Option<ElementMapper>,
    pub button_b: Option<ElementMapper>,
    pub button_x: Option<ElementMapper>,
    pub button_y: Option<ElementMapper>,
    pub button_lb: Option<ElementMapper>,
    pub button_rb: Option<ElementMapper>,
    pub button_back: Option<ElementMapper>,
    pub button_start: Option<ElementMapper>,
    pub button_ls: Option<ElementMapper>,
    pub button_rs: Option<ElementMapper>,
}

impl ElementMap {
    /// The mapper assigned to the given physical element, if any.
    pub fn get(&self, element: PhysicalElement) -> Option<&ElementMapper> {
        match element {
            PhysicalElement::StickLeftX => self.stick_left_x.as_ref(),
            PhysicalElement::StickLeftY => self.stick_left_y.as_ref(),
            PhysicalElement::StickRightX => self.stick_right_x.as_ref(),
            PhysicalElement::StickRightY => self.stick_right_y.as_ref(),
            PhysicalElement::DpadUp => self.dpad_up.as_ref(),
            PhysicalElement::DpadDown => self.dpad_down.as_ref(),
            PhysicalElement::DpadLeft => self.dpad_left.as_ref(),
            PhysicalElement::DpadRight => self.dpad_right.as_ref(),
            PhysicalElement::TriggerLT => self.trigger_lt.as_ref(),
            PhysicalElement::TriggerRT => self.trigger_rt.as_ref(),
            PhysicalElement::ButtonA => self.button_a.as_ref(),
            PhysicalElement::ButtonB => self.button_b.as_ref(),
            PhysicalElement::ButtonX => self.button_x.as_ref(),
            PhysicalElement::ButtonY => self.button_y.as_ref(),
            PhysicalElement::ButtonLB => self.button_lb.as_ref(),
            PhysicalElement::ButtonRB => self.button_rb.as_ref(),
            PhysicalElement::ButtonBack => self.button_back.as_ref(),
            PhysicalElement::ButtonStart => self.button_start.as_ref(),
            PhysicalElement::ButtonLS => self.button_ls.as_ref(),
            PhysicalElement::ButtonRS => self.button_rs.as_ref(),
        }
    }

    /// Iterates all slots in element order.
    pub fn slots(&self) -> impl Iterator<Item = (PhysicalElement, Option<&ElementMapper>)> {
        PhysicalElement::ALL
            .into_iter()
            .map(move |element| (element, self.get(element)))
    }
}

/// Maps a physical controller layout to a virtual controller layout.
///
/// # Examples
///
/// ```
/// use openpad_mapper::{AxisDirection, ElementMap, ElementMapper, Mapper};
/// use openpad_types::element::Axis;
/// use openpad_types::state::{PhysicalState, PhysicalStick};
///
/// let mapper = Mapper::new(ElementMap {
///     stick_left_x: Some(ElementMapper::Axis {
///         axis: Axis::X,
///         direction: AxisDirection::Both,
///     }),
///     ..Default::default()
/// })?;
///
/// let mut physical = PhysicalState::NEUTRAL;
/// physical.sticks[PhysicalStick::LeftX as usize] = 1111;
///
/// let state = mapper.map_state(&physical, 0);
/// assert_eq!(state.axis(Axis::X), 1111);
/// # Ok::<(), openpad_errors::ValidationError>(())
/// ```
#[derive(Debug)]
pub struct Mapper {
    elements: ElementMap,
    actuators: ActuatorMap,
    capabilities: Capabilities,
    name: Option<String>,
}

impl Mapper {
    /// Creates a mapper with the default actuator map.
    pub fn new(elements: ElementMap) -> Result<Mapper, ValidationError> {
        Mapper::with_actuators(elements, ActuatorMap::DEFAULT)
    }

    /// Creates a mapper with an explicit actuator map.
    pub fn with_actuators(
        elements: ElementMap,
        actuators: ActuatorMap,
    ) -> Result<Mapper, ValidationError> {
        for (_, mapper) in elements.slots() {
            if let Some(mapper) = mapper {
                mapper.validate()?;
            }
        }
        actuators.validate()?;

        let capabilities = derive_capabilities(&elements, &actuators);
        Ok(Mapper {
            elements,
            actuators,
            capabilities,
            name: None,
        })
    }

    /// Assigns a human-readable name, used for registry lookup.
    pub fn named(mut self, name: impl Into<String>) -> Mapper {
        self.name = Some(name.into());
        self
    }

    /// This mapper's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Read-only view of the element map.
    pub fn elements(&self) -> &ElementMap {
        &self.elements
    }

    /// This mapper's actuator map.
    pub fn actuators(&self) -> &ActuatorMap {
        &self.actuators
    }

    /// Capabilities of the virtual controller layout this mapper implements.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Maps physical controller state to pre-property virtual controller
    /// state. A physical state whose status is not `Ok` maps to the neutral
    /// state. Cannot fail; every virtual element is fully populated.
    pub fn map_state(&self, physical: &PhysicalState, source_controller: ControllerId) -> VirtualState {
        self.map_state_with_host(physical, source_controller, None, None)
    }

    /// Like [`Mapper::map_state`], with host keyboard/mouse sinks attached so
    /// host-output element mappers take effect.
    pub fn map_state_with_host(
        &self,
        physical: &PhysicalState,
        source_controller: ControllerId,
        keyboard: Option<&dyn HostKeyboard>,
        mouse: Option<&dyn HostMouse>,
    ) -> VirtualState {
        let neutral_substitute;
        let physical = if physical.status == PhysicalDeviceStatus::Ok {
            physical
        } else {
            neutral_substitute = PhysicalState::NEUTRAL;
            &neutral_substitute
        };

        let mut state = VirtualState::NEUTRAL;
        let mut ctx = MapContext {
            state: &mut state,
            source_controller,
            keyboard,
            mouse,
        };

        for (element, mapper) in self.elements.slots() {
            let Some(mapper) = mapper else { continue };
            match element.kind() {
                PhysicalElementKind::Analog => {
                    mapper.contribute_from_analog(&mut ctx, stick_value(physical, element));
                }
                PhysicalElementKind::Trigger => {
                    mapper.contribute_from_trigger(&mut ctx, trigger_value(physical, element));
                }
                PhysicalElementKind::Digital => {
                    mapper.contribute_from_button(&mut ctx, button_value(physical, element));
                }
            }
        }

        state.pov = state.pov.canonical();
        state
    }

    /// Virtual state produced by a completely neutral (or disconnected)
    /// physical controller.
    pub fn map_neutral(&self, source_controller: ControllerId) -> VirtualState {
        self.map_state(&PhysicalState::NEUTRAL, source_controller)
    }

    /// Maps virtual per-axis force-feedback magnitudes to physical actuator
    /// values, applying the given gain fraction. Saturates silently; never
    /// fails.
    pub fn map_force_feedback(
        &self,
        components: OrderedMagnitudeComponents,
        gain: EffectValue,
    ) -> ActuatorOutputs {
        self.actuators.project(&components, gain)
    }
}

fn stick_value(physical: &PhysicalState, element: PhysicalElement) -> i16 {
    match element {
        PhysicalElement::StickLeftX => physical.sticks[0],
        PhysicalElement::StickLeftY => physical.sticks[1],
        PhysicalElement::StickRightX => physical.sticks[2],
        PhysicalElement::StickRightY => physical.sticks[3],
        _ => 0,
    }
}

fn trigger_value(physical: &PhysicalState, element: PhysicalElement) -> u8 {
    match element {
        PhysicalElement::TriggerLT => physical.triggers[0],
        PhysicalElement::TriggerRT => physical.triggers[1],
        _ => 0,
    }
}

fn button_value(physical: &PhysicalState, element: PhysicalElement) -> bool {
    use openpad_types::state::PhysicalButton;

    let button = match element {
        PhysicalElement::DpadUp => PhysicalButton::DpadUp,
        PhysicalElement::DpadDown => PhysicalButton::DpadDown,
        PhysicalElement::DpadLeft => PhysicalButton::DpadLeft,
        PhysicalElement::DpadRight => PhysicalButton::DpadRight,
        PhysicalElement::ButtonA => PhysicalButton::A,
        PhysicalElement::ButtonB => PhysicalButton::B,
        PhysicalElement::ButtonX => PhysicalButton::X,
        PhysicalElement::ButtonY => PhysicalButton::Y,
        PhysicalElement::ButtonLB => PhysicalButton::LB,
        PhysicalElement::ButtonRB => PhysicalButton::RB,
        PhysicalElement::ButtonBack => PhysicalButton::Back,
        PhysicalElement::ButtonStart => PhysicalButton::Start,
        PhysicalElement::ButtonLS => PhysicalButton::LS,
        PhysicalElement::ButtonRS => PhysicalButton::RS,
        _ => return false,
    };
    physical.button(button)
}

/// Derives aggregate capabilities from an element map and actuator map.
fn derive_capabilities(elements: &ElementMap, actuators: &ActuatorMap) -> Capabilities {
    let mut axis_present = [false; openpad_types::AXIS_COUNT];
    let mut highest_button: Option<Button> = None;
    let mut has_pov = false;

    for axis in REQUIRED_AXES {
        axis_present[axis.index()] = true;
    }

    for (_, mapper) in elements.slots() {
        let Some(mapper) = mapper else { continue };
        for target in mapper.target_elements() {
            match target {
                ElementIdentifier::Axis(axis) => axis_present[axis.index()] = true,
                ElementIdentifier::Button(button) => {
                    if highest_button.map_or(true, |highest| button > highest) {
                        highest_button = Some(button);
                    }
                }
                ElementIdentifier::Pov => has_pov = true,
            }
        }
    }

    let ff_axes = actuators.mapped_axes();
    let axes = Axis::ALL
        .into_iter()
        .filter(|axis| axis_present[axis.index()])
        .map(|axis| AxisCapability {
            axis,
            force_feedback: ff_axes.contains(&axis),
        })
        .collect();

    let button_count = highest_button
        .map(|button| button.index() + 1)
        .unwrap_or(0)
        .max(MIN_BUTTON_COUNT);

    Capabilities {
        axes,
        button_count,
        has_pov,
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::element_mapper::AxisDirection;
    use proptest::prelude::*;

    fn axis_mapper() -> Mapper {
        Mapper::new(ElementMap {
            stick_left_x: Some(ElementMapper::Axis {
                axis: Axis::X,
                direction: AxisDirection::Both,
            }),
            stick_left_y: Some(ElementMapper::Axis {
                axis: Axis::Y,
                direction: AxisDirection::Both,
            }),
            trigger_lt: Some(ElementMapper::Axis {
                axis: Axis::Z,
                direction: AxisDirection::Both,
            }),
            ..Default::default()
        })
        .expect("valid mapper")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn map_state_total_and_in_range(
            lx in i16::MIN..=i16::MAX,
            ly in i16::MIN..=i16::MAX,
            lt in 0u8..=255,
        ) {
            let mapper = axis_mapper();
            let physical = PhysicalState {
                sticks: [lx, ly, 0, 0],
                triggers: [lt, 0],
                ..PhysicalState::NEUTRAL
            };

            let state = mapper.map_state(&physical, 0);
            for axis in Axis::ALL {
                let value = state.axis(axis);
                prop_assert!(
                    (openpad_types::constants::ANALOG_MIN
                        ..=openpad_types::constants::ANALOG_MAX)
                        .contains(&value)
                );
            }
        }

        #[test]
        fn map_state_is_monotonic_per_axis(a in i16::MIN..=i16::MAX, b in i16::MIN..=i16::MAX) {
            let (low, high) = (a.min(b), a.max(b));
            let mapper = axis_mapper();

            let low_state = mapper.map_state(
                &PhysicalState { sticks: [low, 0, 0, 0], ..PhysicalState::NEUTRAL },
                0,
            );
            let high_state = mapper.map_state(
                &PhysicalState { sticks: [high, 0, 0, 0], ..PhysicalState::NEUTRAL },
                0,
            );
            prop_assert!(low_state.axis(Axis::X) <= high_state.axis(Axis::X));
        }
    }
}
