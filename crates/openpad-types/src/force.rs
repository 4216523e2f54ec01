//! Shared force-feedback value primitives.
//!
//! These live here rather than in the force-feedback crate because the
//! mapper consumes magnitude component vectors when projecting virtual
//! force-feedback output onto physical actuators.

use crate::element::AXIS_COUNT;

/// A force-feedback effect value. Computation is carried out in double
/// precision; the fixed-point ±10,000 magnitude bounds are enforced on
/// ingress and outputs are quantized on actuator egress.
pub type EffectValue = f64;

/// Time in milliseconds on a force-feedback effect's playback timeline.
pub type EffectTimeMs = u32;

/// Per-axis force magnitudes in ordered-axis layout (X, Y, Z, RotX, RotY,
/// RotZ), zero where no effect contributes.
pub type OrderedMagnitudeComponents = [EffectValue; AXIS_COUNT];

/// Magnitude components with every axis at zero.
pub const ZERO_MAGNITUDE_COMPONENTS: OrderedMagnitudeComponents = [0.0; AXIS_COUNT];
