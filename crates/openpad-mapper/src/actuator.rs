//! Force-feedback actuator mapping.
//!
//! A virtual force-feedback effect produces per-axis magnitude components.
//! Each physical actuator (two rumble motors, two impulse triggers) is driven
//! from those components according to its configured mode: disabled,
//! single-axis pass-through, or magnitude projection onto two axes.

use openpad_types::constants::{ACTUATOR_OUTPUT_MAX, FORCE_MAGNITUDE_MAX};
use openpad_types::element::Axis;
use openpad_types::force::{EffectValue, OrderedMagnitudeComponents};
use openpad_types::state::ActuatorOutputs;
use openpad_errors::ValidationError;
use serde::{Deserialize, Serialize};

use crate::element_mapper::AxisDirection;

/// How one physical actuator derives its output from per-axis magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActuatorElement {
    /// Actuator never produces output.
    #[default]
    Disabled,
    /// Output follows a single axis component, optionally restricted to one
    /// direction of that axis.
    SingleAxis {
        axis: Axis,
        direction: AxisDirection,
    },
    /// Output is the Euclidean magnitude of two axis components.
    MagnitudeProjection { first: Axis, second: Axis },
}

impl ActuatorElement {
    /// Whether this actuator produces output at all.
    pub const fn is_present(self) -> bool {
        !matches!(self, ActuatorElement::Disabled)
    }

    /// Axes whose magnitude components this actuator consumes.
    pub fn contributing_axes(self) -> Vec<Axis> {
        match self {
            ActuatorElement::Disabled => Vec::new(),
            ActuatorElement::SingleAxis { axis, .. } => vec![axis],
            ActuatorElement::MagnitudeProjection { first, second } => vec![first, second],
        }
    }

    /// Checks configuration invariants.
    pub fn validate(self) -> Result<(), ValidationError> {
        match self {
            ActuatorElement::MagnitudeProjection { first, second } if first == second => {
                Err(ValidationError::DuplicateProjectionAxes)
            }
            _ => Ok(()),
        }
    }

    /// Computes this actuator's output for the given magnitude components
    /// and gain fraction. Intermediate math is double precision; the result
    /// saturates into the physical actuator range.
    pub fn compute(self, components: &OrderedMagnitudeComponents, gain: EffectValue) -> u16 {
        let magnitude = match self {
            ActuatorElement::Disabled => return 0,
            ActuatorElement::SingleAxis { axis, direction } => {
                let component = components[axis.index()];
                let filtered = match direction {
                    AxisDirection::Both => component,
                    AxisDirection::Positive => component.max(0.0),
                    AxisDirection::Negative => component.min(0.0),
                };
                filtered.abs()
            }
            ActuatorElement::MagnitudeProjection { first, second } => {
                let a = components[first.index()];
                let b = components[second.index()];
                a.hypot(b)
            }
        };

        let scaled = (magnitude * gain / FORCE_MAGNITUDE_MAX) * ACTUATOR_OUTPUT_MAX as EffectValue;
        scaled.round().clamp(0.0, ACTUATOR_OUTPUT_MAX as EffectValue) as u16
    }
}

/// Per-actuator configuration for one controller layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorMap {
    pub left_motor: ActuatorElement,
    pub right_motor: ActuatorElement,
    pub left_impulse_trigger: ActuatorElement,
    pub right_impulse_trigger: ActuatorElement,
}

/// Default per-motor actuator configuration: magnitude projection onto the
/// X and Y axes.
pub const DEFAULT_MOTOR_ACTUATOR: ActuatorElement = ActuatorElement::MagnitudeProjection {
    first: Axis::X,
    second: Axis::Y,
};

impl ActuatorMap {
    /// Default actuator map: both rumble motors project X/Y magnitude,
    /// impulse triggers disabled.
    pub const DEFAULT: ActuatorMap = ActuatorMap {
        left_motor: DEFAULT_MOTOR_ACTUATOR,
        right_motor: DEFAULT_MOTOR_ACTUATOR,
        left_impulse_trigger: ActuatorElement::Disabled,
        right_impulse_trigger: ActuatorElement::Disabled,
    };

    /// Map with every actuator disabled.
    pub const DISABLED: ActuatorMap = ActuatorMap {
        left_motor: ActuatorElement::Disabled,
        right_motor: ActuatorElement::Disabled,
        left_impulse_trigger: ActuatorElement::Disabled,
        right_impulse_trigger: ActuatorElement::Disabled,
    };

    /// All actuator slots in fixed order.
    pub fn slots(&self) -> [ActuatorElement; 4] {
        [
            self.left_motor,
            self.right_motor,
            self.left_impulse_trigger,
            self.right_impulse_trigger,
        ]
    }

    /// Checks configuration invariants across all slots.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for slot in self.slots() {
            slot.validate()?;
        }
        Ok(())
    }

    /// Axes referenced by any present actuator, deduplicated and in
    /// ordered-axis layout.
    pub fn mapped_axes(&self) -> Vec<Axis> {
        let mut axes: Vec<Axis> = self
            .slots()
            .iter()
            .flat_map(|slot| slot.contributing_axes())
            .collect();
        axes.sort();
        axes.dedup();
        axes
    }

    /// Projects per-axis virtual magnitudes onto all four actuators.
    pub fn project(
        &self,
        components: &OrderedMagnitudeComponents,
        gain: EffectValue,
    ) -> ActuatorOutputs {
        ActuatorOutputs {
            left_motor: self.left_motor.compute(components, gain),
            right_motor: self.right_motor.compute(components, gain),
            left_impulse_trigger: self.left_impulse_trigger.compute(components, gain),
            right_impulse_trigger: self.right_impulse_trigger.compute(components, gain),
        }
    }
}

impl Default for ActuatorMap {
    fn default() -> Self {
        ActuatorMap::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpad_types::force::ZERO_MAGNITUDE_COMPONENTS;

    const FULL_GAIN: EffectValue = 1.0;

    fn components(x: EffectValue, y: EffectValue) -> OrderedMagnitudeComponents {
        let mut c = ZERO_MAGNITUDE_COMPONENTS;
        c[Axis::X.index()] = x;
        c[Axis::Y.index()] = y;
        c
    }

    #[test]
    fn disabled_actuator_is_silent() {
        let c = components(10_000.0, 10_000.0);
        assert_eq!(ActuatorElement::Disabled.compute(&c, FULL_GAIN), 0);
    }

    #[test]
    fn single_axis_takes_absolute_value() {
        let actuator = ActuatorElement::SingleAxis {
            axis: Axis::X,
            direction: AxisDirection::Both,
        };
        assert_eq!(
            actuator.compute(&components(10_000.0, 0.0), FULL_GAIN),
            ACTUATOR_OUTPUT_MAX
        );
        assert_eq!(
            actuator.compute(&components(-10_000.0, 0.0), FULL_GAIN),
            ACTUATOR_OUTPUT_MAX
        );
        assert_eq!(actuator.compute(&components(0.0, 10_000.0), FULL_GAIN), 0);
    }

    #[test]
    fn single_axis_direction_filter() {
        let positive = ActuatorElement::SingleAxis {
            axis: Axis::X,
            direction: AxisDirection::Positive,
        };
        let negative = ActuatorElement::SingleAxis {
            axis: Axis::X,
            direction: AxisDirection::Negative,
        };

        assert_eq!(
            positive.compute(&components(5_000.0, 0.0), FULL_GAIN),
            ACTUATOR_OUTPUT_MAX / 2
        );
        assert_eq!(positive.compute(&components(-5_000.0, 0.0), FULL_GAIN), 0);
        assert_eq!(negative.compute(&components(5_000.0, 0.0), FULL_GAIN), 0);
        assert_eq!(
            negative.compute(&components(-5_000.0, 0.0), FULL_GAIN),
            ACTUATOR_OUTPUT_MAX / 2
        );
    }

    #[test]
    fn magnitude_projection_is_euclidean() {
        let actuator = ActuatorElement::MagnitudeProjection {
            first: Axis::X,
            second: Axis::Y,
        };
        let c = components(3_000.0, 4_000.0);
        let expected = (5_000.0 / FORCE_MAGNITUDE_MAX * ACTUATOR_OUTPUT_MAX as f64).round() as u16;
        assert_eq!(actuator.compute(&c, FULL_GAIN), expected);
    }

    #[test]
    fn projection_saturates_rather_than_overflowing() {
        let actuator = ActuatorElement::MagnitudeProjection {
            first: Axis::X,
            second: Axis::Y,
        };
        let c = components(10_000.0, 10_000.0);
        assert_eq!(actuator.compute(&c, FULL_GAIN), ACTUATOR_OUTPUT_MAX);
    }

    #[test]
    fn gain_scales_output() {
        let actuator = ActuatorElement::SingleAxis {
            axis: Axis::X,
            direction: AxisDirection::Both,
        };
        let c = components(10_000.0, 0.0);
        let half = actuator.compute(&c, 0.5);
        assert_eq!(half, (ACTUATOR_OUTPUT_MAX as f64 * 0.5).round() as u16);
        assert_eq!(actuator.compute(&c, 0.0), 0);
    }

    #[test]
    fn duplicate_projection_axes_rejected() {
        let actuator = ActuatorElement::MagnitudeProjection {
            first: Axis::Y,
            second: Axis::Y,
        };
        assert_eq!(
            actuator.validate(),
            Err(ValidationError::DuplicateProjectionAxes)
        );
    }

    #[test]
    fn default_map_drives_motors_only() {
        let map = ActuatorMap::DEFAULT;
        assert!(map.left_motor.is_present());
        assert!(map.right_motor.is_present());
        assert!(!map.left_impulse_trigger.is_present());
        assert!(!map.right_impulse_trigger.is_present());
        assert_eq!(map.mapped_axes(), vec![Axis::X, Axis::Y]);

        let outputs = map.project(&components(10_000.0, 0.0), FULL_GAIN);
        assert_eq!(outputs.left_motor, ACTUATOR_OUTPUT_MAX);
        assert_eq!(outputs.right_motor, ACTUATOR_OUTPUT_MAX);
        assert_eq!(outputs.left_impulse_trigger, 0);
        assert_eq!(outputs.right_impulse_trigger, 0);
    }
}
