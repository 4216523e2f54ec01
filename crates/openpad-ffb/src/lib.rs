//! Force-feedback engine for OpenPad.
//!
//! This crate converts application-authored effect descriptions into
//! per-axis magnitude outputs:
//!
//! - [`direction`]: pure-direction vectors with Cartesian, polar, and
//!   spherical ingress and canonical spherical internal form
//! - [`effect`]: immutable effect descriptors (constant force, ramp,
//!   periodic waveforms) with attack/sustain/fade envelopes
//! - [`device`]: the per-controller effect collection with playback state,
//!   global gain, and pause semantics
//!
//! The mapper layer projects the per-axis magnitudes computed here onto
//! physical actuators.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod device;
pub mod direction;
pub mod effect;

pub use device::{Device, PlayState};
pub use direction::{CoordinateSystem, DirectionVector, EFFECT_AXES_MAX};
pub use effect::{CommonParameters, Effect, EffectId, EffectKind, Envelope, Waveform};
