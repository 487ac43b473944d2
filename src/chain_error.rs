//! Error handling for chain construction and chain description loading

use std::io;

use crate::identity::TagMismatch;

/// Unified error to report failures while building a chain, from code or from a YAML file.
#[derive(Debug)]
pub enum ChainError {
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    InvalidLength { expected: usize, found: usize },
    InvalidAxis(String),
    InvalidPose(String),
    InvalidInertia(String),
    EmptyChain,
    /// The symbolic dry run found quantities that do not compose at the given segment.
    FrameMismatch { segment: usize, mismatch: TagMismatch },
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ChainError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ChainError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            ChainError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
            ChainError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            ChainError::InvalidAxis(ref axis) =>
                write!(f, "Invalid joint axis: {}", axis),
            ChainError::InvalidPose(ref msg) =>
                write!(f, "Invalid Pose: {}", msg),
            ChainError::InvalidInertia(ref msg) =>
                write!(f, "Invalid Inertia: {}", msg),
            ChainError::EmptyChain =>
                write!(f, "Kinematic chain has no segments"),
            ChainError::FrameMismatch { segment, ref mismatch } =>
                write!(f, "Frame mismatch at segment {}: {}", segment, mismatch),
        }
    }
}

impl std::error::Error for ChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChainError::IoError(err) => Some(err),
            ChainError::FrameMismatch { mismatch, .. } => Some(mismatch),
            _ => None,
        }
    }
}

impl From<io::Error> for ChainError {
    fn from(err: io::Error) -> Self {
        ChainError::IoError(err)
    }
}
