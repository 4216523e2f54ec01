//! Aggregate virtual controller capability descriptors.

use serde::{Deserialize, Serialize};

use crate::element::Axis;

/// Capability record for a single virtual axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCapability {
    pub axis: Axis,
    /// Whether force-feedback output on this axis reaches a physical
    /// actuator.
    pub force_feedback: bool,
}

/// Capabilities of a virtual controller layout, derived from its mapper.
///
/// Axis entries are sorted by ordered-axis position and unique. These act as
/// metadata: they are consulted internally (property transforms only touch
/// axes that exist) and can be reported to applications.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub axes: Vec<AxisCapability>,
    pub button_count: u8,
    pub has_pov: bool,
}

impl Capabilities {
    /// Whether the layout exposes the given axis.
    pub fn has_axis(&self, axis: Axis) -> bool {
        self.axes.iter().any(|entry| entry.axis == axis)
    }

    /// Position of the given axis among the present axes, if present.
    pub fn axis_index(&self, axis: Axis) -> Option<usize> {
        self.axes.iter().position(|entry| entry.axis == axis)
    }

    /// Number of axes in the layout.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Whether the given axis both exists and supports force feedback.
    pub fn has_force_feedback_axis(&self, axis: Axis) -> bool {
        self.axes
            .iter()
            .any(|entry| entry.axis == axis && entry.force_feedback)
    }

    /// Whether any axis supports force feedback.
    pub fn supports_force_feedback(&self) -> bool {
        self.axes.iter().any(|entry| entry.force_feedback)
    }

    /// Axes that support force feedback, in ordered-axis layout.
    pub fn force_feedback_axes(&self) -> Vec<Axis> {
        self.axes
            .iter()
            .filter(|entry| entry.force_feedback)
            .map(|entry| entry.axis)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Capabilities {
        Capabilities {
            axes: vec![
                AxisCapability {
                    axis: Axis::X,
                    force_feedback: true,
                },
                AxisCapability {
                    axis: Axis::Y,
                    force_feedback: true,
                },
                AxisCapability {
                    axis: Axis::RotX,
                    force_feedback: false,
                },
            ],
            button_count: 4,
            has_pov: true,
        }
    }

    #[test]
    fn axis_queries() {
        let caps = sample();
        assert!(caps.has_axis(Axis::X));
        assert!(caps.has_axis(Axis::RotX));
        assert!(!caps.has_axis(Axis::Z));
        assert_eq!(caps.axis_index(Axis::RotX), Some(2));
        assert_eq!(caps.axis_index(Axis::RotZ), None);
    }

    #[test]
    fn force_feedback_queries() {
        let caps = sample();
        assert!(caps.supports_force_feedback());
        assert!(caps.has_force_feedback_axis(Axis::X));
        assert!(!caps.has_force_feedback_axis(Axis::RotX));
        assert_eq!(caps.force_feedback_axes(), vec![Axis::X, Axis::Y]);
    }

    #[test]
    fn serialization_round_trip() {
        let caps = sample();
        let json = serde_json::to_string(&caps).expect("serializes");
        let back: Capabilities = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(caps, back);
    }
}
