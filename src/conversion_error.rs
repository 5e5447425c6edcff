//! Error handling for conversions and model loaders

use std::io;

/// Unified error to report failures of joint lookups, trajectory construction
/// and the parsing of URDF/SRDF/YAML inputs.
#[derive(Debug)]
pub enum ConversionError {
    /// The named joint exists on one side of the conversion but not on the other.
    UnknownJoint(String),
    UnknownGroup(String),
    InvalidTimeStep(f64),
    InvalidTrajectory(String),
    InvalidLength { expected: usize, found: usize },
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    XmlProcessingError(String),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ConversionError::UnknownJoint(ref name) =>
                write!(f, "Unknown joint: {}", name),
            ConversionError::UnknownGroup(ref name) =>
                write!(f, "Unknown joint group: {}", name),
            ConversionError::InvalidTimeStep(delta_t) =>
                write!(f, "Invalid time step: {} (must be finite and positive)", delta_t),
            ConversionError::InvalidTrajectory(ref msg) =>
                write!(f, "Invalid trajectory: {}", msg),
            ConversionError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            ConversionError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ConversionError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            ConversionError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
            ConversionError::XmlProcessingError(ref err) =>
                write!(f, "XML Processing Error: {}", err),
        }
    }
}

impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConversionError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConversionError {
    fn from(err: io::Error) -> Self {
        ConversionError::IoError(err)
    }
}
