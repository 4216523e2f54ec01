//! Raw analog and trigger transforms.
//!
//! These helpers apply percentage-based deadzone and saturation directly to
//! raw physical readings, ahead of any mapping. Analog sticks use the full
//! signed range with symmetric cutoffs; triggers use the flattened
//! single-ended variant where everything below the deadzone reads zero and
//! everything above the saturation point reads full scale. All intermediate
//! math is double precision.

use openpad_types::constants::{ANALOG_MAX, TRIGGER_MAX};

/// Applies deadzone and saturation percentages to a raw analog stick
/// reading. A deadzone of 0 and saturation of 100 leave the reading
/// unchanged.
pub fn apply_raw_analog_transform(
    value: i16,
    deadzone_percent: u32,
    saturation_percent: u32,
) -> i16 {
    let deadzone_cutoff = ANALOG_MAX as f64 * deadzone_percent as f64 / 100.0;
    let saturation_cutoff = ANALOG_MAX as f64 * saturation_percent as f64 / 100.0;

    let magnitude = (value as i32).unsigned_abs() as f64;
    let negative = value < 0;

    if magnitude <= deadzone_cutoff {
        return 0;
    }
    if magnitude >= saturation_cutoff {
        return if negative { i16::MIN } else { i16::MAX };
    }

    let scaled = (magnitude - deadzone_cutoff) / (saturation_cutoff - deadzone_cutoff)
        * (ANALOG_MAX as f64 + 1.0);
    let signed = if negative { -scaled } else { scaled };
    signed.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Applies deadzone and saturation percentages to a raw trigger reading.
/// Values at or below the deadzone cutoff read zero; values at or above the
/// saturation cutoff read full scale.
pub fn apply_raw_trigger_transform(
    value: u8,
    deadzone_percent: u32,
    saturation_percent: u32,
) -> u8 {
    let deadzone_cutoff = TRIGGER_MAX as f64 * deadzone_percent as f64 / 100.0;
    let saturation_cutoff = TRIGGER_MAX as f64 * saturation_percent as f64 / 100.0;

    let magnitude = value as f64;
    if magnitude <= deadzone_cutoff {
        return 0;
    }
    if magnitude >= saturation_cutoff {
        return TRIGGER_MAX;
    }

    let scaled =
        (magnitude - deadzone_cutoff) / (saturation_cutoff - deadzone_cutoff) * TRIGGER_MAX as f64;
    scaled.round().clamp(0.0, TRIGGER_MAX as f64) as u8
}
