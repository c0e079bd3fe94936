#![warn(missing_docs)]

//! Exact ray-cast eclipse detection for occulta.
//!
//! Rays are cast from surface elements towards the observer and tested
//! against the triangles in front of them, so this crate gives the ground
//! truth the hull-based detectors approximate.
//!
//! # Architecture
//!
//! - [`Ray`] - ray representation with origin and direction
//! - [`intersect_triangle`] - ray/triangle test returning an [`Intersection`]
//! - [`ProjectedGrid`] - sky-plane grid limiting which triangles a ray meets
//! - [`RayEclipseDetector`] - classifies every element of a scene
//! - [`LineOfSightTester`] - segment obstruction queries against a body
//!
//! # Example
//!
//! ```ignore
//! use occulta_raytrace::RayEclipseDetector;
//!
//! let mut bodies = vec![Body::leaf("primary", a), Body::leaf("secondary", b)];
//! let partial = RayEclipseDetector::default().detect(&mut bodies)?;
//! ```

mod detector;
pub mod grid;
pub mod intersect;
mod line_of_sight;
mod ray;

pub use detector::RayEclipseDetector;
pub use grid::ProjectedGrid;
pub use intersect::{intersect_triangle, Intersection};
pub use line_of_sight::LineOfSightTester;
pub use ray::Ray;
