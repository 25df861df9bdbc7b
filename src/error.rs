//! Crate-level error types.

use std::fmt;

/// Errors produced by the trajview crate.
#[derive(Debug)]
pub enum TrajviewError {
    /// Requested frame index is past the end of the trajectory.
    FrameOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of frames the trajectory holds.
        n_frames: usize,
    },
    /// A trajectory with no frames was handed to the viewer.
    EmptyTrajectory,
    /// Element symbol missing from the color table.
    UnknownElement(String),
    /// Element count disagrees with the declared shape.
    ShapeMismatch {
        /// Element count implied by the shape.
        expected: usize,
        /// Element count actually present.
        actual: usize,
    },
    /// Product of the shape's dimensions does not fit in `usize`.
    ShapeOverflow(Vec<usize>),
    /// Encoded array declares a different element type than requested.
    DtypeMismatch {
        /// Type name the caller asked for.
        expected: &'static str,
        /// Type name carried by the encoded array.
        found: String,
    },
    /// Base64 payload could not be decoded.
    Decode(String),
    /// Topology references an atom that does not exist, or frames disagree
    /// with the topology's atom count.
    InvalidTopology(String),
    /// JSON serialization of a wire update failed.
    Serialize(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for TrajviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameOutOfRange { index, n_frames } => write!(
                f,
                "frame index {index} out of range for trajectory with \
                 {n_frames} frames"
            ),
            Self::EmptyTrajectory => write!(f, "trajectory has no frames"),
            Self::UnknownElement(symbol) => {
                write!(f, "no display color for element {symbol:?}")
            }
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "shape implies {expected} elements but array holds {actual}"
            ),
            Self::ShapeOverflow(shape) => {
                write!(f, "shape {shape:?} has too many elements to address")
            }
            Self::DtypeMismatch { expected, found } => {
                write!(f, "expected dtype {expected}, found {found}")
            }
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::InvalidTopology(msg) => {
                write!(f, "invalid topology: {msg}")
            }
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TrajviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrajviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<base64::DecodeError> for TrajviewError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for TrajviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}
