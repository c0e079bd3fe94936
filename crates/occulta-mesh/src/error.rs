//! Error types for eclipse detection.

use thiserror::Error;

/// Errors that can occur when running a visibility detector.
///
/// Geometric degeneracy (zero-area triangles, rays parallel to a plane,
/// bodies with nothing visible) is never an error; only broken call
/// contracts are.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EclipseError {
    /// A detector was given no bodies.
    #[error("body list is empty")]
    EmptyBodyList,

    /// Array shapes do not line up (write-back to meshes that changed size).
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// Invalid detector settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for eclipse detection.
pub type Result<T> = std::result::Result<T, EclipseError>;
