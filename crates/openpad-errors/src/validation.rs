//! Parameter validation errors.

/// A rejected parameter value.
///
/// Setters validate before mutating, so a validation error guarantees the
/// target object is unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A numeric parameter fell outside its allowed range.
    #[error("{name} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A range property was specified with minimum not below maximum.
    #[error("range minimum {min} must be less than maximum {max}")]
    EmptyRange { min: i32, max: i32 },

    /// An element mapper targets a virtual element that does not exist.
    #[error("element mapper targets nonexistent {element}")]
    InvalidMapperTarget { element: &'static str },

    /// A magnitude projection names the same axis twice.
    #[error("magnitude projection axes must be distinct")]
    DuplicateProjectionAxes,

    /// Direction coordinates were inconsistent, out of range, or all zero.
    #[error("invalid direction coordinates")]
    InvalidCoordinates,

    /// An effect parameter combination is unsatisfiable.
    #[error("invalid effect parameters: {reason}")]
    InvalidEffectParameters { reason: &'static str },
}

impl ValidationError {
    /// Creates an out-of-range error for a named parameter.
    pub fn out_of_range(
        name: &'static str,
        value: impl Into<i64>,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> ValidationError {
        ValidationError::OutOfRange {
            name,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}
