#![warn(missing_docs)]

//! Surface elements, bodies and working sets for occulta.
//!
//! This crate holds the data model every detector shares:
//!
//! - [`Element`] - one triangle with its derived scalars and a [`Visibility`]
//! - [`Mesh`] - the ordered elements of one body
//! - [`Body`] - a leaf with a mesh, or a composite of bodies
//! - [`WorkingSet`] - all elements of a scene in one depth-sorted table
//! - [`HorizonClassifier`] - the `mu > 0` baseline every detector starts from
//!
//! # Example
//!
//! ```ignore
//! use occulta_mesh::{Body, EclipseDetector, HorizonClassifier};
//!
//! let mut bodies = vec![Body::leaf("primary", mesh)];
//! HorizonClassifier::new().detect(&mut bodies)?;
//! println!("{:?}", bodies[0].mesh().unwrap().counts());
//! ```

pub mod body;
mod detector;
pub mod element;
pub mod error;
pub mod horizon;
pub mod mesh;
pub mod working_set;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use body::{flatten, flatten_mut, Body, Leaf, LeafMut};
pub use detector::EclipseDetector;
pub use element::{Element, Visibility};
pub use error::{EclipseError, Result};
pub use horizon::HorizonClassifier;
pub use mesh::{Mesh, VisibilityCounts};
pub use working_set::WorkingSet;
