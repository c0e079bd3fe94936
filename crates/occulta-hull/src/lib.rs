#![warn(missing_docs)]

//! Convex-hull accelerated eclipse detection.
//!
//! Both detectors here work body against body rather than element against
//! element: the bodies are ordered front to back by a single depth each,
//! and every back body is tested against the projected hull of every body
//! in front of it. That is exact for convex bodies well separated in depth
//! and much cheaper than ray casting.
//!
//! # Features
//!
//! - [`HullEclipseDetector`]: quickhull polygon, inclusive containment of
//!   element centers and vertices
//! - [`GrahamRangeEclipseDetector`]: monotone-chain hull with binary-search
//!   containment, plus a k-d tree query that marks elements near the hull
//!   boundary as partial
//! - [`DepthPolicy`]: how a body's depth is estimated for the ordering
//!
//! # Example
//!
//! ```
//! use occulta_hull::HullEclipseDetector;
//! use occulta_mesh::{Body, Element, Mesh};
//! use occulta_math::Point3;
//!
//! let tri = |x: f64, z: f64| {
//!     Element::from_vertices(
//!         Point3::new(x, 0.0, z),
//!         Point3::new(x, 1.0, z),
//!         Point3::new(x + 1.0, 0.0, z),
//!     )
//! };
//! let mut bodies = vec![
//!     Body::leaf("near", Mesh::new(vec![tri(0.0, 0.0)])),
//!     Body::leaf("far", Mesh::new(vec![tri(0.5, 3.0)])),
//! ];
//! let partial = HullEclipseDetector::default().detect(&mut bodies).unwrap();
//! assert!(partial);
//! ```

mod graham;
mod graham_detector;
mod hull_detector;
mod kdtree;
mod ordering;
mod polygon;

pub use graham::GrahamHull;
pub use graham_detector::GrahamRangeEclipseDetector;
pub use hull_detector::HullEclipseDetector;
pub use kdtree::{KdNode, KdTree};
pub use ordering::{front_to_back, DepthPolicy};
pub use polygon::ConvexPolygon;
