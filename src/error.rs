//! Error types for transform calls. Configuration errors are raised before
//! any numeric work begins; a failed call never returns a partial result.

/// Errors surfaced by transform calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Two buffers that must have matching shapes did not.
    ShapeMismatch { expected: usize, found: usize },

    /// An option key outside a function's closed option set.
    UnknownOption(String),

    /// An option value outside its documented range, e.g. a decay of 1.5.
    InvalidOption { name: &'static str, value: f64 },
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {expected} elements, found {found}")
            }
            Self::UnknownOption(key) => write!(f, "unknown option {key:?}"),
            Self::InvalidOption { name, value } => {
                write!(f, "invalid value {value} for option {name:?}")
            }
        }
    }
}

impl std::error::Error for TransformError {}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Symmetric shape check for positional buffer arguments. There is no
/// implicit broadcasting contract, so lengths must match exactly.
pub(crate) fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(TransformError::ShapeMismatch { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(check_len(3, 3).is_ok());
        assert_eq!(
            check_len(3, 4),
            Err(TransformError::ShapeMismatch {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_display() {
        let err = TransformError::UnknownOption("b3".into());
        assert_eq!(err.to_string(), "unknown option \"b3\"");
        let err = TransformError::InvalidOption {
            name: "b1",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "invalid value 1.5 for option \"b1\"");
    }
}
