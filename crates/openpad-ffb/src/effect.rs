//! Force-feedback effect descriptors and magnitude computation.
//!
//! An [`Effect`] is immutable once constructed: parameters are validated at
//! construction and the effect receives a globally unique identifier from an
//! injected monotonic counter. Magnitude computation is pure; playback
//! bookkeeping (start time, delay, iterations) lives in the
//! [`Device`](crate::device::Device).

use openpad_errors::ValidationError;
use openpad_types::constants::{
    ANGLE_FULL_CIRCLE, ANGLE_MAX, ANGLE_MIN, FORCE_MAGNITUDE_MAX, FORCE_MAGNITUDE_MIN,
    FORCE_MAGNITUDE_ZERO,
};
use openpad_types::element::Axis;
use openpad_types::force::{EffectTimeMs, EffectValue, OrderedMagnitudeComponents};
use openpad_types::sequence::SequenceSource;
use serde::{Deserialize, Serialize};

use crate::direction::DirectionVector;

/// Globally unique force-feedback effect identifier.
pub type EffectId = u64;

/// Attack/sustain/fade envelope applied to an effect's magnitude.
///
/// Levels are non-negative magnitudes on the ±10,000 force scale. The fade
/// segment is anchored to the end of the effect's duration, so a nonzero
/// fade time requires a finite duration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub attack_time_ms: EffectTimeMs,
    pub attack_level: EffectValue,
    pub fade_time_ms: EffectTimeMs,
    pub fade_level: EffectValue,
}

impl Envelope {
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, level) in [
            ("envelope attack level", self.attack_level),
            ("envelope fade level", self.fade_level),
        ] {
            if !level.is_finite() || !(FORCE_MAGNITUDE_ZERO..=FORCE_MAGNITUDE_MAX).contains(&level)
            {
                return Err(ValidationError::out_of_range(
                    name,
                    level as i64,
                    FORCE_MAGNITUDE_ZERO as i64,
                    FORCE_MAGNITUDE_MAX as i64,
                ));
            }
        }
        Ok(())
    }

    /// Applies the envelope to a non-negative sustain level at local effect
    /// time `t`.
    fn apply(
        &self,
        t: EffectTimeMs,
        sustain: EffectValue,
        duration: Option<EffectTimeMs>,
    ) -> EffectValue {
        if self.attack_time_ms > 0 && t < self.attack_time_ms {
            let slope = (sustain - self.attack_level) / self.attack_time_ms as EffectValue;
            return self.attack_level + slope * t as EffectValue;
        }

        if let Some(duration) = duration {
            if self.fade_time_ms > 0 && t > duration.saturating_sub(self.fade_time_ms) {
                let fade_start = duration.saturating_sub(self.fade_time_ms);
                let slope = (self.fade_level - sustain) / self.fade_time_ms as EffectValue;
                return sustain + slope * (t - fade_start) as EffectValue;
            }
        }

        sustain
    }
}

/// Periodic waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    SawtoothUp,
    SawtoothDown,
}

impl Waveform {
    /// Waveform amplitude in `[-1, 1]` at the given phase in centidegrees
    /// `[0, 36000)`.
    pub fn amplitude(self, phase: EffectValue) -> EffectValue {
        match self {
            Waveform::Sine => (phase / ANGLE_FULL_CIRCLE * std::f64::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 18_000.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                // Rises from 0 at phase 0 to +1 at 9000, falls to -1 at
                // 27000, returns to 0 at 36000.
                if phase < 9_000.0 {
                    phase / 9_000.0
                } else if phase < 27_000.0 {
                    1.0 - (phase - 9_000.0) / 9_000.0
                } else {
                    -1.0 + (phase - 27_000.0) / 9_000.0
                }
            }
            Waveform::SawtoothUp => -1.0 + 2.0 * phase / ANGLE_FULL_CIRCLE,
            Waveform::SawtoothDown => 1.0 - 2.0 * phase / ANGLE_FULL_CIRCLE,
        }
    }
}

/// Type-specific effect parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Constant force of fixed signed magnitude.
    ConstantForce { magnitude: EffectValue },
    /// Force interpolating linearly from `start` to `end` over the effect's
    /// (necessarily finite) duration.
    Ramp {
        start: EffectValue,
        end: EffectValue,
    },
    /// Periodic waveform with amplitude, DC offset, initial phase in
    /// centidegrees, and period in milliseconds.
    Periodic {
        waveform: Waveform,
        amplitude: EffectValue,
        offset: EffectValue,
        phase: EffectValue,
        period_ms: EffectTimeMs,
    },
}

/// Parameters common to every effect type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonParameters {
    /// Total playback duration of one iteration; `None` plays until stopped.
    pub duration_ms: Option<EffectTimeMs>,
    /// Delay between starting the effect and the first nonzero output.
    pub start_delay_ms: EffectTimeMs,
    /// Quantization step for magnitude computations; 0 computes continuously.
    pub sample_period_ms: EffectTimeMs,
    /// Scalar gain in `[0, 1]` applied to every computed magnitude.
    pub gain_fraction: EffectValue,
    /// Direction onto which scalar magnitudes are projected.
    pub direction: DirectionVector,
    /// Optional attack/fade envelope.
    pub envelope: Option<Envelope>,
    /// Virtual axes receiving the direction's components, one per component.
    pub axes: Vec<Axis>,
}

impl CommonParameters {
    /// Creates parameters with library defaults: infinite duration, no
    /// delay, continuous sampling, unit gain, no envelope, and the direction
    /// components assigned to the first axes in ordered-axis layout.
    pub fn new(direction: DirectionVector) -> CommonParameters {
        let axes = Axis::ALL[..direction.num_axes()].to_vec();
        CommonParameters {
            duration_ms: None,
            start_delay_ms: 0,
            sample_period_ms: 0,
            gain_fraction: 1.0,
            direction,
            envelope: None,
            axes,
        }
    }

    pub fn with_duration(mut self, duration_ms: EffectTimeMs) -> CommonParameters {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_start_delay(mut self, start_delay_ms: EffectTimeMs) -> CommonParameters {
        self.start_delay_ms = start_delay_ms;
        self
    }

    pub fn with_sample_period(mut self, sample_period_ms: EffectTimeMs) -> CommonParameters {
        self.sample_period_ms = sample_period_ms;
        self
    }

    pub fn with_gain(mut self, gain_fraction: EffectValue) -> CommonParameters {
        self.gain_fraction = gain_fraction;
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> CommonParameters {
        self.envelope = Some(envelope);
        self
    }

    pub fn with_axes(mut self, axes: Vec<Axis>) -> CommonParameters {
        self.axes = axes;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.gain_fraction.is_finite() || !(0.0..=1.0).contains(&self.gain_fraction) {
            return Err(ValidationError::out_of_range(
                "effect gain fraction",
                (self.gain_fraction * 100.0) as i64,
                0,
                100,
            ));
        }

        if self.axes.len() != self.direction.num_axes() {
            return Err(ValidationError::InvalidEffectParameters {
                reason: "associated axis count must match direction axis count",
            });
        }
        for (position, axis) in self.axes.iter().enumerate() {
            if self.axes[..position].contains(axis) {
                return Err(ValidationError::InvalidEffectParameters {
                    reason: "associated axes must be distinct",
                });
            }
        }

        if let Some(envelope) = &self.envelope {
            envelope.validate()?;
            if envelope.fade_time_ms > 0 && self.duration_ms.is_none() {
                return Err(ValidationError::InvalidEffectParameters {
                    reason: "envelope fade requires a finite duration",
                });
            }
        }

        Ok(())
    }
}

/// An immutable force-feedback effect descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    id: EffectId,
    common: CommonParameters,
    kind: EffectKind,
}

impl Effect {
    /// Validates the supplied parameters and, on success, mints a fresh
    /// identifier from the given counter.
    pub fn new(
        identifiers: &SequenceSource,
        common: CommonParameters,
        kind: EffectKind,
    ) -> Result<Effect, ValidationError> {
        common.validate()?;
        validate_kind(&kind, &common)?;
        Ok(Effect {
            id: identifiers.next(),
            common,
            kind,
        })
    }

    /// This effect's globally unique identifier.
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Common parameters.
    pub fn common(&self) -> &CommonParameters {
        &self.common
    }

    /// Type-specific parameters.
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Computes the scalar magnitude at local effect time `t` (milliseconds
    /// since the start delay elapsed, already folded into one iteration).
    /// Returns zero at or beyond the duration endpoint.
    pub fn compute_magnitude(&self, t: EffectTimeMs) -> EffectValue {
        if let Some(duration) = self.common.duration_ms {
            if t >= duration {
                return FORCE_MAGNITUDE_ZERO;
            }
        }

        let t = if self.common.sample_period_ms > 0 {
            t - (t % self.common.sample_period_ms)
        } else {
            t
        };

        let raw = self.raw_magnitude(t);
        (raw * self.common.gain_fraction).clamp(FORCE_MAGNITUDE_MIN, FORCE_MAGNITUDE_MAX)
    }

    /// Projects a scalar magnitude through this effect's direction onto its
    /// associated axes, in ordered-axis layout.
    pub fn ordered_components(&self, magnitude: EffectValue) -> OrderedMagnitudeComponents {
        let mut ordered = openpad_types::force::ZERO_MAGNITUDE_COMPONENTS;
        let components = self.common.direction.magnitude_components(magnitude);
        for (component, axis) in components.into_iter().zip(&self.common.axes) {
            ordered[axis.index()] += component;
        }
        ordered
    }

    fn apply_envelope(&self, t: EffectTimeMs, sustain: EffectValue) -> EffectValue {
        match &self.common.envelope {
            Some(envelope) => envelope.apply(t, sustain, self.common.duration_ms),
            None => sustain,
        }
    }

    fn raw_magnitude(&self, t: EffectTimeMs) -> EffectValue {
        match &self.kind {
            EffectKind::ConstantForce { magnitude } => {
                if *magnitude >= 0.0 {
                    self.apply_envelope(t, *magnitude)
                } else {
                    -self.apply_envelope(t, -magnitude)
                }
            }
            EffectKind::Ramp { start, end } => {
                // Validation guarantees a finite nonzero duration.
                let duration = self.common.duration_ms.unwrap_or(1).max(1);
                let value =
                    start + (end - start) * t as EffectValue / duration as EffectValue;
                if value >= 0.0 {
                    self.apply_envelope(t, value)
                } else {
                    -self.apply_envelope(t, -value)
                }
            }
            EffectKind::Periodic {
                waveform,
                amplitude,
                offset,
                phase,
                period_ms,
            } => {
                let periods = t as EffectValue / *period_ms as EffectValue;
                let mut current_phase =
                    ((periods - periods.floor()) * ANGLE_FULL_CIRCLE + phase).round();
                if current_phase >= ANGLE_FULL_CIRCLE {
                    current_phase -= ANGLE_FULL_CIRCLE;
                }

                let modulated = self.apply_envelope(t, *amplitude);
                let raw = modulated * waveform.amplitude(current_phase) + offset;
                raw.clamp(FORCE_MAGNITUDE_MIN, FORCE_MAGNITUDE_MAX)
            }
        }
    }
}

fn validate_kind(kind: &EffectKind, common: &CommonParameters) -> Result<(), ValidationError> {
    let magnitude_in_range = |value: EffectValue| {
        value.is_finite() && (FORCE_MAGNITUDE_MIN..=FORCE_MAGNITUDE_MAX).contains(&value)
    };

    match kind {
        EffectKind::ConstantForce { magnitude } => {
            if !magnitude_in_range(*magnitude) {
                return Err(ValidationError::out_of_range(
                    "constant force magnitude",
                    *magnitude as i64,
                    FORCE_MAGNITUDE_MIN as i64,
                    FORCE_MAGNITUDE_MAX as i64,
                ));
            }
        }
        EffectKind::Ramp { start, end } => {
            if !magnitude_in_range(*start) || !magnitude_in_range(*end) {
                return Err(ValidationError::out_of_range(
                    "ramp force magnitude",
                    *start as i64,
                    FORCE_MAGNITUDE_MIN as i64,
                    FORCE_MAGNITUDE_MAX as i64,
                ));
            }
            match common.duration_ms {
                Some(duration) if duration > 0 => {}
                _ => {
                    return Err(ValidationError::InvalidEffectParameters {
                        reason: "ramp force requires a finite nonzero duration",
                    });
                }
            }
        }
        EffectKind::Periodic {
            amplitude,
            offset,
            phase,
            period_ms,
            ..
        } => {
            if !amplitude.is_finite() || !(0.0..=FORCE_MAGNITUDE_MAX).contains(amplitude) {
                return Err(ValidationError::out_of_range(
                    "periodic amplitude",
                    *amplitude as i64,
                    0,
                    FORCE_MAGNITUDE_MAX as i64,
                ));
            }
            if !magnitude_in_range(*offset) {
                return Err(ValidationError::out_of_range(
                    "periodic offset",
                    *offset as i64,
                    FORCE_MAGNITUDE_MIN as i64,
                    FORCE_MAGNITUDE_MAX as i64,
                ));
            }
            if !phase.is_finite() || !(ANGLE_MIN..=ANGLE_MAX).contains(phase) {
                return Err(ValidationError::out_of_range(
                    "periodic phase",
                    *phase as i64,
                    ANGLE_MIN as i64,
                    ANGLE_MAX as i64,
                ));
            }
            if *period_ms < 1 {
                return Err(ValidationError::out_of_range(
                    "periodic period",
                    *period_ms as i64,
                    1,
                    EffectTimeMs::MAX as i64,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> SequenceSource {
        SequenceSource::new()
    }

    fn x_direction() -> DirectionVector {
        DirectionVector::from_cartesian(&[1.0]).expect("valid direction")
    }

    fn constant(magnitude: EffectValue) -> Effect {
        Effect::new(
            &ids(),
            CommonParameters::new(x_direction()),
            EffectKind::ConstantForce { magnitude },
        )
        .expect("valid effect")
    }

    #[test]
    fn identifiers_are_unique_and_increasing() {
        let ids = ids();
        let common = CommonParameters::new(x_direction());
        let first = Effect::new(&ids, common.clone(), EffectKind::ConstantForce { magnitude: 1.0 })
            .expect("valid effect");
        let second = Effect::new(&ids, common, EffectKind::ConstantForce { magnitude: 1.0 })
            .expect("valid effect");
        assert!(second.id() > first.id());
    }

    #[test]
    fn constant_force_without_envelope_is_flat() {
        let effect = constant(5_000.0);
        for t in [0, 1, 100, 10_000, 1_000_000] {
            assert_eq!(effect.compute_magnitude(t), 5_000.0);
        }

        let negative = constant(-5_000.0);
        assert_eq!(negative.compute_magnitude(0), -5_000.0);
    }

    #[test]
    fn magnitude_is_zero_at_and_beyond_duration() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()).with_duration(100),
            EffectKind::ConstantForce { magnitude: 5_000.0 },
        )
        .expect("valid effect");

        assert_eq!(effect.compute_magnitude(99), 5_000.0);
        assert_eq!(effect.compute_magnitude(100), 0.0);
        assert_eq!(effect.compute_magnitude(101), 0.0);
    }

    #[test]
    fn gain_scales_magnitude() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()).with_gain(0.25),
            EffectKind::ConstantForce { magnitude: 8_000.0 },
        )
        .expect("valid effect");
        assert_eq!(effect.compute_magnitude(0), 2_000.0);
    }

    #[test]
    fn envelope_attack_interpolates_toward_sustain() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction())
                .with_duration(1_000)
                .with_envelope(Envelope {
                    attack_time_ms: 100,
                    attack_level: 0.0,
                    fade_time_ms: 0,
                    fade_level: 0.0,
                }),
            EffectKind::ConstantForce { magnitude: 10_000.0 },
        )
        .expect("valid effect");

        assert_eq!(effect.compute_magnitude(0), 0.0);
        assert_eq!(effect.compute_magnitude(50), 5_000.0);
        assert_eq!(effect.compute_magnitude(100), 10_000.0);
        assert_eq!(effect.compute_magnitude(500), 10_000.0);
    }

    #[test]
    fn envelope_fade_interpolates_toward_fade_level() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction())
                .with_duration(1_000)
                .with_envelope(Envelope {
                    attack_time_ms: 0,
                    attack_level: 0.0,
                    fade_time_ms: 200,
                    fade_level: 0.0,
                }),
            EffectKind::ConstantForce { magnitude: 10_000.0 },
        )
        .expect("valid effect");

        assert_eq!(effect.compute_magnitude(800), 10_000.0);
        assert_eq!(effect.compute_magnitude(900), 5_000.0);
        assert_eq!(effect.compute_magnitude(999), 50.0);
    }

    #[test]
    fn envelope_with_zero_attack_and_no_fade_returns_sustain_everywhere() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()).with_envelope(Envelope {
                attack_time_ms: 0,
                attack_level: 2_500.0,
                fade_time_ms: 0,
                fade_level: 0.0,
            }),
            EffectKind::ConstantForce { magnitude: 7_500.0 },
        )
        .expect("valid effect");

        for t in [0, 1, 1_000, 100_000] {
            assert_eq!(effect.compute_magnitude(t), 7_500.0);
        }
    }

    #[test]
    fn envelope_applies_to_magnitude_not_sign() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction())
                .with_duration(1_000)
                .with_envelope(Envelope {
                    attack_time_ms: 100,
                    attack_level: 0.0,
                    fade_time_ms: 0,
                    fade_level: 0.0,
                }),
            EffectKind::ConstantForce { magnitude: -10_000.0 },
        )
        .expect("valid effect");

        assert_eq!(effect.compute_magnitude(50), -5_000.0);
    }

    #[test]
    fn sample_period_quantizes_time() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction())
                .with_duration(1_000)
                .with_sample_period(100)
                .with_envelope(Envelope {
                    attack_time_ms: 1_000,
                    attack_level: 0.0,
                    fade_time_ms: 0,
                    fade_level: 0.0,
                }),
            EffectKind::ConstantForce { magnitude: 10_000.0 },
        )
        .expect("valid effect");

        // All times within one sample period compute at the period start.
        assert_eq!(effect.compute_magnitude(0), effect.compute_magnitude(99));
        assert_ne!(effect.compute_magnitude(99), effect.compute_magnitude(100));
    }

    #[test]
    fn ramp_interpolates_linearly() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()).with_duration(1_000),
            EffectKind::Ramp {
                start: -10_000.0,
                end: 10_000.0,
            },
        )
        .expect("valid effect");

        assert_eq!(effect.compute_magnitude(0), -10_000.0);
        assert_eq!(effect.compute_magnitude(500), 0.0);
        assert_eq!(effect.compute_magnitude(750), 5_000.0);
    }

    #[test]
    fn ramp_requires_finite_duration() {
        let result = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()),
            EffectKind::Ramp {
                start: 0.0,
                end: 10_000.0,
            },
        );
        assert!(result.is_err());
    }

    fn periodic(waveform: Waveform, period_ms: EffectTimeMs) -> Effect {
        Effect::new(
            &ids(),
            CommonParameters::new(x_direction()),
            EffectKind::Periodic {
                waveform,
                amplitude: 10_000.0,
                offset: 0.0,
                phase: 0.0,
                period_ms,
            },
        )
        .expect("valid effect")
    }

    #[test]
    fn sine_waveform_at_quarter_points() {
        let effect = periodic(Waveform::Sine, 1_000);
        assert!(effect.compute_magnitude(0).abs() < 1.0);
        assert!((effect.compute_magnitude(250) - 10_000.0).abs() < 1.0);
        assert!(effect.compute_magnitude(500).abs() < 2.0);
        assert!((effect.compute_magnitude(750) + 10_000.0).abs() < 1.0);
    }

    #[test]
    fn square_waveform_alternates() {
        let effect = periodic(Waveform::Square, 1_000);
        assert_eq!(effect.compute_magnitude(0), 10_000.0);
        assert_eq!(effect.compute_magnitude(499), 10_000.0);
        assert_eq!(effect.compute_magnitude(500), -10_000.0);
        assert_eq!(effect.compute_magnitude(999), -10_000.0);
    }

    #[test]
    fn triangle_waveform_peaks_and_troughs() {
        let effect = periodic(Waveform::Triangle, 1_000);
        assert_eq!(effect.compute_magnitude(0), 0.0);
        assert_eq!(effect.compute_magnitude(250), 10_000.0);
        assert_eq!(effect.compute_magnitude(750), -10_000.0);
    }

    #[test]
    fn sawtooth_waveforms_ramp() {
        let up = periodic(Waveform::SawtoothUp, 1_000);
        assert_eq!(up.compute_magnitude(0), -10_000.0);
        assert_eq!(up.compute_magnitude(500), 0.0);

        let down = periodic(Waveform::SawtoothDown, 1_000);
        assert_eq!(down.compute_magnitude(0), 10_000.0);
        assert_eq!(down.compute_magnitude(500), 0.0);
    }

    #[test]
    fn periodic_initial_phase_offsets_waveform() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()),
            EffectKind::Periodic {
                waveform: Waveform::Square,
                amplitude: 10_000.0,
                offset: 0.0,
                phase: 18_000.0,
                period_ms: 1_000,
            },
        )
        .expect("valid effect");
        // Half-period initial phase inverts the square wave at t = 0.
        assert_eq!(effect.compute_magnitude(0), -10_000.0);
    }

    #[test]
    fn periodic_offset_shifts_and_clamps() {
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()),
            EffectKind::Periodic {
                waveform: Waveform::Square,
                amplitude: 10_000.0,
                offset: 5_000.0,
                phase: 0.0,
                period_ms: 1_000,
            },
        )
        .expect("valid effect");
        // +10000 + 5000 clamps to the force maximum.
        assert_eq!(effect.compute_magnitude(0), 10_000.0);
        // -10000 + 5000 passes through.
        assert_eq!(effect.compute_magnitude(500), -5_000.0);
    }

    #[test]
    fn one_millisecond_period_is_well_defined() {
        let effect = periodic(Waveform::Sine, 1);
        for t in [0, 1, 2, 1_000, u32::MAX / 2] {
            let magnitude = effect.compute_magnitude(t);
            assert!(magnitude.is_finite());
            assert!((FORCE_MAGNITUDE_MIN..=FORCE_MAGNITUDE_MAX).contains(&magnitude));
        }
    }

    #[test]
    fn parameter_validation_rejects_out_of_range_values() {
        let direction = x_direction;

        assert!(Effect::new(
            &ids(),
            CommonParameters::new(direction()),
            EffectKind::ConstantForce { magnitude: 10_001.0 },
        )
        .is_err());

        assert!(Effect::new(
            &ids(),
            CommonParameters::new(direction()),
            EffectKind::Periodic {
                waveform: Waveform::Sine,
                amplitude: -1.0,
                offset: 0.0,
                phase: 0.0,
                period_ms: 1,
            },
        )
        .is_err());

        assert!(Effect::new(
            &ids(),
            CommonParameters::new(direction()),
            EffectKind::Periodic {
                waveform: Waveform::Sine,
                amplitude: 10_000.0,
                offset: 0.0,
                phase: 36_000.0,
                period_ms: 1,
            },
        )
        .is_err());

        assert!(Effect::new(
            &ids(),
            CommonParameters::new(direction()),
            EffectKind::Periodic {
                waveform: Waveform::Sine,
                amplitude: 10_000.0,
                offset: 0.0,
                phase: 0.0,
                period_ms: 0,
            },
        )
        .is_err());

        assert!(Effect::new(
            &ids(),
            CommonParameters::new(direction()).with_gain(1.5),
            EffectKind::ConstantForce { magnitude: 0.0 },
        )
        .is_err());
    }

    #[test]
    fn fade_with_infinite_duration_is_rejected() {
        let result = Effect::new(
            &ids(),
            CommonParameters::new(x_direction()).with_envelope(Envelope {
                attack_time_ms: 0,
                attack_level: 0.0,
                fade_time_ms: 100,
                fade_level: 0.0,
            }),
            EffectKind::ConstantForce { magnitude: 1_000.0 },
        );
        assert!(result.is_err());
    }

    #[test]
    fn associated_axes_must_match_direction_and_be_distinct() {
        let direction_2d = DirectionVector::from_cartesian(&[1.0, 1.0]).expect("valid direction");

        let wrong_count = Effect::new(
            &ids(),
            CommonParameters::new(direction_2d.clone()).with_axes(vec![Axis::X]),
            EffectKind::ConstantForce { magnitude: 1_000.0 },
        );
        assert!(wrong_count.is_err());

        let duplicated = Effect::new(
            &ids(),
            CommonParameters::new(direction_2d.clone()).with_axes(vec![Axis::X, Axis::X]),
            EffectKind::ConstantForce { magnitude: 1_000.0 },
        );
        assert!(duplicated.is_err());

        let remapped = Effect::new(
            &ids(),
            CommonParameters::new(direction_2d).with_axes(vec![Axis::RotX, Axis::RotY]),
            EffectKind::ConstantForce { magnitude: 1_000.0 },
        )
        .expect("valid effect");
        let components = remapped.ordered_components(1_000.0);
        assert_eq!(components[Axis::X.index()], 0.0);
        assert!(components[Axis::RotX.index()] > 0.0);
        assert!(components[Axis::RotY.index()] > 0.0);
    }

    #[test]
    fn ordered_components_project_direction() {
        let direction = DirectionVector::from_cartesian(&[1.0, 3.0f64.sqrt(), 2.0 * 3.0f64.sqrt()])
            .expect("valid direction");
        let effect = Effect::new(
            &ids(),
            CommonParameters::new(direction),
            EffectKind::ConstantForce { magnitude: 1_000.0 },
        )
        .expect("valid effect");

        let components = effect.ordered_components(1_000.0);
        // cos60*cos60, cos60*sin60, sin60 against magnitude 1000, within 3%.
        assert!((components[0] - 250.0).abs() <= 250.0 * 0.03);
        assert!((components[1] - 433.0).abs() <= 433.0 * 0.03);
        assert!((components[2] - 866.0).abs() <= 866.0 * 0.03);
        assert_eq!(components[3], 0.0);
    }
}
