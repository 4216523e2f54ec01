//! Per-axis property transforms: deadzone, saturation, and range.
//!
//! Raw axis values map to the configured output range through five regions:
//! negative saturation (pinned at range minimum), negative linear, deadzone
//! (pinned at range neutral), positive linear, and positive saturation
//! (pinned at range maximum). The transform is monotonically non-decreasing
//! and clamps its output into the configured range even under rounding.

use openpad_errors::ValidationError;
use openpad_types::constants::{
    ANALOG_MAX, ANALOG_MIN, ANALOG_NEUTRAL, AXIS_DEADZONE_MAX, AXIS_DEADZONE_MIN,
    AXIS_SATURATION_MAX, AXIS_SATURATION_MIN,
};

/// Default per-axis deadzone property value.
pub const AXIS_DEADZONE_DEFAULT: u32 = AXIS_DEADZONE_MIN;

/// Default per-axis saturation property value.
pub const AXIS_SATURATION_DEFAULT: u32 = AXIS_SATURATION_MAX;

/// Default axis range minimum.
pub const RANGE_MIN_DEFAULT: i32 = 0;

/// Default axis range maximum.
pub const RANGE_MAX_DEFAULT: i32 = 65_535;

/// Configurable properties of one virtual axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisProperties {
    pub deadzone: u32,
    pub saturation: u32,
    pub range_min: i32,
    pub range_max: i32,
    pub transformations_enabled: bool,
}

impl Default for AxisProperties {
    fn default() -> Self {
        AxisProperties {
            deadzone: AXIS_DEADZONE_DEFAULT,
            saturation: AXIS_SATURATION_DEFAULT,
            range_min: RANGE_MIN_DEFAULT,
            range_max: RANGE_MAX_DEFAULT,
            transformations_enabled: true,
        }
    }
}

impl AxisProperties {
    /// Neutral output value: the midpoint of the configured range.
    pub fn range_neutral(&self) -> i32 {
        ((self.range_min as i64 + self.range_max as i64) / 2) as i32
    }

    /// Validates a deadzone property value.
    pub fn validate_deadzone(deadzone: u32) -> Result<(), ValidationError> {
        if deadzone > AXIS_DEADZONE_MAX {
            return Err(ValidationError::out_of_range(
                "deadzone",
                deadzone,
                AXIS_DEADZONE_MIN,
                AXIS_DEADZONE_MAX,
            ));
        }
        Ok(())
    }

    /// Validates a saturation property value.
    pub fn validate_saturation(saturation: u32) -> Result<(), ValidationError> {
        if saturation > AXIS_SATURATION_MAX {
            return Err(ValidationError::out_of_range(
                "saturation",
                saturation,
                AXIS_SATURATION_MIN,
                AXIS_SATURATION_MAX,
            ));
        }
        Ok(())
    }

    /// Validates a range property pair.
    pub fn validate_range(min: i32, max: i32) -> Result<(), ValidationError> {
        if min >= max {
            return Err(ValidationError::EmptyRange { min, max });
        }
        Ok(())
    }

    /// Cutoff points between the five regions, in raw analog units.
    /// Truncation toward zero matches the property math of the emulated
    /// input API.
    fn region_cutoffs(&self) -> RegionCutoffs {
        let deadzone_fraction = self.deadzone as f64 / AXIS_DEADZONE_MAX as f64;
        let saturation_fraction = self.saturation as f64 / AXIS_SATURATION_MAX as f64;

        RegionCutoffs {
            saturation_negative: (ANALOG_MIN - ANALOG_NEUTRAL) as f64 * saturation_fraction,
            deadzone_negative: (ANALOG_MIN - ANALOG_NEUTRAL) as f64 * deadzone_fraction,
            deadzone_positive: (ANALOG_MAX - ANALOG_NEUTRAL) as f64 * deadzone_fraction,
            saturation_positive: (ANALOG_MAX - ANALOG_NEUTRAL) as f64 * saturation_fraction,
        }
        .truncated()
    }

    /// Transforms a raw axis value in the analog range into the configured
    /// output range. Identity when transformations are disabled.
    pub fn transform(&self, raw: i32) -> i32 {
        if !self.transformations_enabled {
            return raw;
        }

        let cutoffs = self.region_cutoffs();
        let range_min = self.range_min as f64;
        let range_max = self.range_max as f64;
        let range_neutral = self.range_neutral() as f64;

        // The deadzone region is inclusive of both cutoffs and takes
        // precedence, so a maximum deadzone pins the whole axis to neutral
        // regardless of saturation.
        let output = if (cutoffs.deadzone_negative..=cutoffs.deadzone_positive)
            .contains(&(raw as f64))
        {
            range_neutral
        } else if (raw as f64) < cutoffs.saturation_negative {
            range_min
        } else if (raw as f64) < cutoffs.deadzone_negative {
            let span = cutoffs.deadzone_negative - cutoffs.saturation_negative;
            range_min
                + (raw as f64 - cutoffs.saturation_negative) / span * (range_neutral - range_min)
        } else if (raw as f64) <= cutoffs.saturation_positive {
            let span = cutoffs.saturation_positive - cutoffs.deadzone_positive;
            range_neutral
                + (raw as f64 - cutoffs.deadzone_positive) / span * (range_max - range_neutral)
        } else {
            range_max
        };

        (output.round() as i64).clamp(self.range_min as i64, self.range_max as i64) as i32
    }
}

/// Raw-unit cutoff points separating the five transform regions.
struct RegionCutoffs {
    saturation_negative: f64,
    deadzone_negative: f64,
    deadzone_positive: f64,
    saturation_positive: f64,
}

impl RegionCutoffs {
    fn truncated(self) -> RegionCutoffs {
        RegionCutoffs {
            saturation_negative: self.saturation_negative.trunc(),
            deadzone_negative: self.deadzone_negative.trunc(),
            deadzone_positive: self.deadzone_positive.trunc(),
            saturation_positive: self.saturation_positive.trunc(),
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn transform_is_monotonic_and_in_range(
            a in ANALOG_MIN..=ANALOG_MAX,
            b in ANALOG_MIN..=ANALOG_MAX,
            deadzone in 0u32..=10_000,
            saturation in 0u32..=10_000,
            range_min in -100_000i32..=99_999,
            range_span in 1i32..=200_000,
        ) {
            let range_max = range_min.saturating_add(range_span);
            prop_assume!(range_min < range_max);

            let props = AxisProperties {
                deadzone,
                saturation,
                range_min,
                range_max,
                transformations_enabled: true,
            };

            let (low, high) = (a.min(b), a.max(b));
            let low_out = props.transform(low);
            let high_out = props.transform(high);

            prop_assert!(low_out <= high_out);
            prop_assert!((range_min..=range_max).contains(&low_out));
            prop_assert!((range_min..=range_max).contains(&high_out));
        }
    }
}
