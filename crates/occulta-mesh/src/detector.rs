//! The common detector interface.

use crate::body::Body;
use crate::error::Result;

/// A visibility detector.
///
/// Every detector overwrites the visibility of each element of every leaf
/// in `bodies` and returns whether it found any eclipse worth finer time
/// sampling. Detectors hold configuration only; a call is a pure function
/// of the meshes apart from the flags it writes, so repeating it on
/// unchanged geometry gives the same flags.
pub trait EclipseDetector: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Classify all elements of `bodies`.
    fn detect(&self, bodies: &mut [Body]) -> Result<bool>;
}
