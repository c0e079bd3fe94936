#![warn(missing_docs)]

//! occulta: visibility of triangulated body surfaces
//!
//! Classifies every surface element of a set of bodies as visible, partially
//! visible or hidden for an observer looking along +Z from infinitely far
//! away. Four detectors trade accuracy for speed:
//!
//! | Algorithm | Detector | Exact for |
//! |---|---|---|
//! | `horizon` | [`HorizonClassifier`] | single convex body |
//! | `ray_trace` | [`RayEclipseDetector`] | any geometry |
//! | `convex_hull` | [`HullEclipseDetector`] | convex bodies separated in depth |
//! | `graham` | [`GrahamRangeEclipseDetector`] | same, approximate near limbs |
//!
//! # Example
//!
//! ```rust,ignore
//! use occulta::{detect_eclipses, Algorithm, Body, EclipseSettings};
//!
//! let mut bodies = vec![Body::leaf("primary", primary), Body::leaf("secondary", secondary)];
//! let settings = EclipseSettings::with_algorithm(Algorithm::RayTrace);
//! let partial = detect_eclipses(&mut bodies, &settings)?;
//! let counts = bodies[1].mesh().unwrap().counts();
//! println!("{partial}: {} of {} hidden", counts.hidden, counts.total());
//! ```

mod settings;

pub use occulta_hull::{DepthPolicy, GrahamRangeEclipseDetector, HullEclipseDetector};
pub use occulta_math::{Point2, Point3, Tolerance, Vec3};
pub use occulta_mesh::{
    Body, EclipseDetector, EclipseError, Element, HorizonClassifier, Mesh, Result, Visibility,
    VisibilityCounts, WorkingSet,
};
pub use occulta_raytrace::{LineOfSightTester, RayEclipseDetector};
pub use settings::{
    Algorithm, EclipseSettings, DEFAULT_BACKFACE_THRESHOLD, DEFAULT_DISTANCE_FACTOR,
    DEFAULT_TOLERANCE,
};

/// Build the detector `settings` select.
pub fn detector(settings: &EclipseSettings) -> Box<dyn EclipseDetector> {
    match settings.algorithm {
        Algorithm::Horizon => Box::new(HorizonClassifier::new()),
        Algorithm::RayTrace => Box::new(RayEclipseDetector::new(
            settings.backface_threshold,
            Tolerance::new(settings.tolerance),
        )),
        Algorithm::ConvexHull => Box::new(HullEclipseDetector::new(settings.depth_policy)),
        Algorithm::Graham => Box::new(GrahamRangeEclipseDetector::new(
            settings.distance_factor,
            settings.depth_policy,
        )),
    }
}

/// Validate `settings`, then classify every element of `bodies` with the
/// selected detector.
///
/// Returns the detector's eclipse flag: whether partially visible elements
/// remain (horizon, ray, convex hull) or any element was eclipsed (Graham).
pub fn detect_eclipses(bodies: &mut [Body], settings: &EclipseSettings) -> Result<bool> {
    settings.validate()?;
    let detector = detector(settings);
    log::debug!(
        "running {} detector on {} bodies",
        detector.name(),
        bodies.len()
    );
    detector.detect(bodies)
}

/// Whether the segments from `origin` to each of `targets` cross `occluder`.
pub fn line_of_sight(
    origin: &Point3,
    targets: &[Point3],
    occluder: &Body,
    settings: &EclipseSettings,
) -> Result<Vec<bool>> {
    settings.validate()?;
    Ok(LineOfSightTester::new(Tolerance::new(settings.tolerance))
        .is_obstructed(origin, targets, occluder))
}
