//! Mapper definition string parse errors.

/// Failures parsing a mapper definition string.
///
/// The `detail` payloads carry the offending fragment so configuration
/// mistakes can be reported back to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string violates the mapper definition grammar.
    #[error("syntax error: {detail}")]
    Syntax { detail: String },

    /// The element mapper type name is not recognized.
    #[error("unrecognized element mapper type \"{name}\"")]
    UnknownType { name: String },

    /// A lookup by mapper name found no registered mapper.
    #[error("unknown mapper \"{name}\"")]
    UnknownMapper { name: String },

    /// Element mapper expressions nest deeper than the supported limit.
    #[error("nesting depth {depth} exceeds the maximum of {max}")]
    NestingTooDeep { depth: u32, max: u32 },

    /// A parameter could not be interpreted.
    #[error("{detail}")]
    InvalidParameter { detail: String },
}

impl ParseError {
    /// Creates a syntax error with the given detail text.
    pub fn syntax(detail: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            detail: detail.into(),
        }
    }

    /// Creates an invalid-parameter error with the given detail text.
    pub fn invalid_parameter(detail: impl Into<String>) -> ParseError {
        ParseError::InvalidParameter {
            detail: detail.into(),
        }
    }
}
