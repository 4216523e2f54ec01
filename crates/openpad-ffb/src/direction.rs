//! Force-feedback direction vectors.
//!
//! A direction vector is pure direction: magnitude information supplied at
//! construction is discarded. Three ingress coordinate systems are accepted
//! (Cartesian, polar, spherical); the canonical internal representation is
//! spherical, computed once at ingress and never re-normalized. The
//! originally supplied coordinates are retained so egress in the original
//! system is lossless.
//!
//! Angles are in hundredths of degrees in `[0, 36000)`, rounded to whole
//! centidegrees at ingress. The first spherical angle is the azimuth in the
//! plane of the first two axes; each subsequent angle elevates toward the
//! next axis. Polar coordinates (two-axis vectors only) measure from the
//! negative second axis, offset 9000 centidegrees from the spherical azimuth.

use openpad_errors::ValidationError;
use openpad_types::constants::{ANGLE_FULL_CIRCLE, ANGLE_MAX, ANGLE_MIN};
use openpad_types::force::EffectValue;
use serde::{Deserialize, Serialize};

/// Maximum number of axes a direction vector can span.
pub const EFFECT_AXES_MAX: usize = 6;

/// Coordinate system in which a direction vector was originally specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    Cartesian,
    Polar,
    Spherical,
}

/// A pure-direction vector spanning 1 to [`EFFECT_AXES_MAX`] axes.
///
/// # Examples
///
/// ```
/// use openpad_ffb::direction::DirectionVector;
///
/// // Due east in a two-axis plane.
/// let vector = DirectionVector::from_cartesian(&[1.0, 0.0])?;
/// assert_eq!(vector.spherical(), Some(&[0.0][..]));
/// assert_eq!(vector.polar(), Some(9000.0));
///
/// let components = vector.magnitude_components(1000.0);
/// assert!((components[0] - 1000.0).abs() < 1e-6);
/// assert!(components[1].abs() < 1e-6);
/// # Ok::<(), openpad_errors::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionVector {
    original_system: CoordinateSystem,
    original: Vec<EffectValue>,
    num_axes: usize,
    /// Canonical spherical angles; empty for single-axis vectors.
    spherical: Vec<EffectValue>,
    /// Sign of the single component for single-axis vectors, +1.0 otherwise.
    single_axis_sign: EffectValue,
}

fn angle_in_range(angle: EffectValue) -> bool {
    angle.is_finite() && (ANGLE_MIN..=ANGLE_MAX).contains(&angle)
}

/// Converts radians to whole centidegrees normalized into `[0, 36000)`.
fn radians_to_centidegrees(radians: EffectValue) -> EffectValue {
    let centidegrees = radians.to_degrees() * 100.0;
    let normalized = centidegrees.rem_euclid(ANGLE_FULL_CIRCLE);
    let rounded = normalized.round();
    if rounded >= ANGLE_FULL_CIRCLE {
        rounded - ANGLE_FULL_CIRCLE
    } else {
        rounded
    }
}

fn centidegrees_to_radians(centidegrees: EffectValue) -> EffectValue {
    (centidegrees / 100.0).to_radians()
}

impl DirectionVector {
    /// Builds a direction from Cartesian coordinates, one per axis.
    ///
    /// Fails on an empty or oversized coordinate list, a zero vector, or
    /// non-finite components.
    pub fn from_cartesian(coordinates: &[EffectValue]) -> Result<DirectionVector, ValidationError> {
        if coordinates.is_empty() || coordinates.len() > EFFECT_AXES_MAX {
            return Err(ValidationError::InvalidCoordinates);
        }
        if coordinates.iter().any(|c| !c.is_finite()) {
            return Err(ValidationError::InvalidCoordinates);
        }
        if coordinates.iter().all(|c| *c == 0.0) {
            return Err(ValidationError::InvalidCoordinates);
        }

        let num_axes = coordinates.len();
        let spherical = spherical_from_cartesian(coordinates);
        let single_axis_sign = if num_axes == 1 {
            coordinates[0].signum()
        } else {
            1.0
        };

        Ok(DirectionVector {
            original_system: CoordinateSystem::Cartesian,
            original: coordinates.to_vec(),
            num_axes,
            spherical,
            single_axis_sign,
        })
    }

    /// Builds a two-axis direction from a single polar angle measured from
    /// the negative second axis.
    pub fn from_polar(coordinates: &[EffectValue]) -> Result<DirectionVector, ValidationError> {
        let [angle] = coordinates else {
            return Err(ValidationError::InvalidCoordinates);
        };
        if !angle_in_range(*angle) {
            return Err(ValidationError::InvalidCoordinates);
        }

        let azimuth = (angle + 27_000.0).rem_euclid(ANGLE_FULL_CIRCLE);
        Ok(DirectionVector {
            original_system: CoordinateSystem::Polar,
            original: coordinates.to_vec(),
            num_axes: 2,
            spherical: vec![azimuth],
            single_axis_sign: 1.0,
        })
    }

    /// Builds a direction from spherical angles; a vector spanning `n` axes
    /// takes `n − 1` angles. An empty angle list denotes a single-axis
    /// direction along the positive first axis.
    pub fn from_spherical(coordinates: &[EffectValue]) -> Result<DirectionVector, ValidationError> {
        if coordinates.len() >= EFFECT_AXES_MAX {
            return Err(ValidationError::InvalidCoordinates);
        }
        if coordinates.iter().any(|angle| !angle_in_range(*angle)) {
            return Err(ValidationError::InvalidCoordinates);
        }

        Ok(DirectionVector {
            original_system: CoordinateSystem::Spherical,
            original: coordinates.to_vec(),
            num_axes: coordinates.len() + 1,
            spherical: coordinates.to_vec(),
            single_axis_sign: 1.0,
        })
    }

    /// Coordinate system supplied at construction.
    pub fn original_system(&self) -> CoordinateSystem {
        self.original_system
    }

    /// Number of axes this direction spans.
    pub fn num_axes(&self) -> usize {
        self.num_axes
    }

    /// Cartesian coordinates, one per axis. Returns the original values when
    /// the vector was specified in Cartesian form, otherwise the unit vector
    /// derived from the canonical spherical angles.
    pub fn cartesian(&self) -> Vec<EffectValue> {
        match self.original_system {
            CoordinateSystem::Cartesian => self.original.clone(),
            _ => self.unit_vector(),
        }
    }

    /// Polar angle, available only for two-axis vectors.
    pub fn polar(&self) -> Option<EffectValue> {
        if self.num_axes != 2 {
            return None;
        }
        if self.original_system == CoordinateSystem::Polar {
            return Some(self.original[0]);
        }
        Some((self.spherical[0] + 9_000.0).rem_euclid(ANGLE_FULL_CIRCLE))
    }

    /// Canonical spherical angles; unavailable for single-axis vectors.
    pub fn spherical(&self) -> Option<&[EffectValue]> {
        if self.num_axes < 2 {
            None
        } else {
            Some(&self.spherical)
        }
    }

    /// Unit vector in Cartesian coordinates.
    fn unit_vector(&self) -> Vec<EffectValue> {
        if self.num_axes == 1 {
            return vec![self.single_axis_sign];
        }

        let mut unit = vec![0.0; self.num_axes];
        unit[0] = centidegrees_to_radians(self.spherical[0]).cos();
        unit[1] = centidegrees_to_radians(self.spherical[0]).sin();
        for (k, angle) in self.spherical.iter().enumerate().skip(1) {
            let radians = centidegrees_to_radians(*angle);
            let (sin, cos) = radians.sin_cos();
            for component in unit.iter_mut().take(k + 1) {
                *component *= cos;
            }
            unit[k + 1] = sin;
        }
        unit
    }

    /// Projects a scalar magnitude onto this direction, producing one
    /// component per axis.
    pub fn magnitude_components(&self, magnitude: EffectValue) -> Vec<EffectValue> {
        self.unit_vector()
            .into_iter()
            .map(|component| component * magnitude)
            .collect()
    }
}

/// Canonical spherical angles for a Cartesian direction. Empty for
/// single-axis input.
fn spherical_from_cartesian(coordinates: &[EffectValue]) -> Vec<EffectValue> {
    let n = coordinates.len();
    if n < 2 {
        return Vec::new();
    }

    let mut angles = Vec::with_capacity(n - 1);
    angles.push(radians_to_centidegrees(coordinates[1].atan2(coordinates[0])));

    let mut plane_norm = coordinates[0].hypot(coordinates[1]);
    for coordinate in &coordinates[2..] {
        angles.push(radians_to_centidegrees(coordinate.atan2(plane_norm)));
        plane_norm = plane_norm.hypot(*coordinate);
    }
    angles
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Round-trip through Cartesian form recovers spherical angles to
        /// within one centidegree. Elevation angles are drawn from the
        /// canonical range (strictly between -89 and +89 degrees) because a
        /// direction's canonical spherical form is unique only there.
        #[test]
        fn spherical_round_trip(
            azimuth in 0.0f64..36_000.0,
            elevations in proptest::collection::vec(-8_900.0f64..8_900.0, 0..EFFECT_AXES_MAX - 2),
        ) {
            let mut angles = vec![azimuth.round()];
            angles.extend(
                elevations
                    .iter()
                    .map(|e| e.round().rem_euclid(ANGLE_FULL_CIRCLE)),
            );
            prop_assume!(angles.iter().all(|a| *a < 36_000.0));

            let vector = DirectionVector::from_spherical(&angles).expect("valid spherical");
            let cartesian = vector.cartesian();

            let round_tripped =
                DirectionVector::from_cartesian(&cartesian).expect("valid cartesian");
            let recovered = round_tripped.spherical().expect("multi-axis");

            for (original, recovered) in angles.iter().zip(recovered) {
                let diff = (original - recovered).abs();
                let wrapped = diff.min(ANGLE_FULL_CIRCLE - diff);
                prop_assert!(
                    wrapped <= 1.0,
                    "angle {original} round-tripped to {recovered}"
                );
            }
        }

        /// Projection preserves the scalar magnitude as the Euclidean norm of
        /// the per-axis components.
        #[test]
        fn projection_preserves_norm(
            coordinates in proptest::collection::vec(-1000.0f64..1000.0, 1..=EFFECT_AXES_MAX),
            magnitude in -10_000.0f64..10_000.0,
        ) {
            prop_assume!(coordinates.iter().any(|c| c.abs() > 1e-3));

            let vector = DirectionVector::from_cartesian(&coordinates).expect("valid cartesian");
            let components = vector.magnitude_components(magnitude);
            let norm: EffectValue = components.iter().map(|c| c * c).sum::<f64>().sqrt();
            prop_assert!(
                (norm - magnitude.abs()).abs() <= magnitude.abs() * 0.03 + 1.0,
                "norm {norm} vs magnitude {magnitude}"
            );
        }
    }
}
