//! Two-sphere scenes run through every detector.

use approx::assert_relative_eq;
use occulta::{
    detect_eclipses, Algorithm, Body, EclipseSettings, Element, Mesh, Point3, Visibility,
    VisibilityCounts,
};
use occulta_mesh::fixtures::{facing_triangle, uv_sphere};

const ECLIPSE_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::RayTrace, Algorithm::ConvexHull, Algorithm::Graham];

const ALL_ALGORITHMS: [Algorithm; 4] = [
    Algorithm::Horizon,
    Algorithm::RayTrace,
    Algorithm::ConvexHull,
    Algorithm::Graham,
];

fn sphere(x: f64, y: f64, z: f64, radius: f64) -> Mesh {
    uv_sphere(Point3::new(x, y, z), radius, 24, 48)
}

fn run(bodies: &mut [Body], algorithm: Algorithm) -> bool {
    detect_eclipses(bodies, &EclipseSettings::with_algorithm(algorithm)).unwrap()
}

fn flags(body: &Body) -> Vec<Visibility> {
    body.mesh().unwrap().visibilities()
}

/// Unit spheres, the back one offset by one radius across the line of sight.
fn transit() -> Vec<Body> {
    vec![
        Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
        Body::leaf("back", sphere(1.0, 0.0, 5.0, 1.0)),
    ]
}

/// `transit` with `extra` elements appended to the back body.
fn transit_with(extra: Vec<Element>) -> Vec<Body> {
    let back: Mesh = sphere(1.0, 0.0, 5.0, 1.0)
        .iter()
        .cloned()
        .chain(extra)
        .collect();
    vec![
        Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
        Body::leaf("back", back),
    ]
}

/// Overlap area of two unit disks whose centers are `d` apart.
fn lens_area(d: f64) -> f64 {
    2.0 * (d / 2.0).acos() - d / 2.0 * (4.0 - d * d).sqrt()
}

#[test]
fn single_sphere_faces_classified_by_orientation() {
    for algorithm in ALL_ALGORITHMS {
        let mut bodies = vec![Body::leaf("star", sphere(0.0, 0.0, 0.0, 1.0))];
        run(&mut bodies, algorithm);
        for e in bodies[0].mesh().unwrap().iter() {
            if e.mu() > 0.3 {
                assert_eq!(e.visibility(), Visibility::Visible, "{algorithm:?}");
            } else if e.mu() < -0.3 {
                assert_eq!(e.visibility(), Visibility::Hidden, "{algorithm:?}");
            }
        }
    }
}

#[test]
fn far_separated_spheres_match_isolated_runs() {
    for algorithm in ALL_ALGORITHMS {
        let mut alone_a = vec![Body::leaf("a", sphere(0.0, 0.0, 0.0, 1.0))];
        let mut alone_b = vec![Body::leaf("b", sphere(10.0, 0.0, 3.0, 1.0))];
        run(&mut alone_a, algorithm);
        run(&mut alone_b, algorithm);

        let mut pair = vec![
            Body::leaf("a", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("b", sphere(10.0, 0.0, 3.0, 1.0)),
        ];
        run(&mut pair, algorithm);
        assert_eq!(flags(&pair[0]), flags(&alone_a[0]), "{algorithm:?}");
        assert_eq!(flags(&pair[1]), flags(&alone_b[0]), "{algorithm:?}");
    }
}

#[test]
fn separated_spheres_report_no_eclipse() {
    for algorithm in [Algorithm::ConvexHull, Algorithm::Graham] {
        let mut pair = vec![
            Body::leaf("a", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("b", sphere(10.0, 0.0, 3.0, 1.0)),
        ];
        assert!(!run(&mut pair, algorithm), "{algorithm:?}");
    }
}

#[test]
fn concentric_back_sphere_fully_hidden() {
    for algorithm in ECLIPSE_ALGORITHMS {
        let mut alone = vec![Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0))];
        run(&mut alone, algorithm);

        let mut bodies = vec![
            Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("back", sphere(0.0, 0.0, 6.0, 0.9)),
        ];
        run(&mut bodies, algorithm);
        let back = bodies[1].mesh().unwrap().counts();
        assert_eq!(back.hidden, back.total(), "{algorithm:?}");
        assert_eq!(flags(&bodies[0]), flags(&alone[0]), "{algorithm:?}");
    }
}

#[test]
fn equal_radius_concentric_back_sphere() {
    let scene = || {
        vec![
            Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("back", sphere(0.0, 0.0, 6.0, 1.0)),
        ]
    };
    let facing = |body: &Body| {
        VisibilityCounts::tally(body.mesh().unwrap().iter().filter(|e| e.mu() > 0.0))
    };
    for algorithm in [Algorithm::RayTrace, Algorithm::ConvexHull] {
        let mut bodies = scene();
        run(&mut bodies, algorithm);
        let back = facing(&bodies[1]);
        assert!(back.total() > 0);
        assert_eq!(back.hidden, back.total(), "{algorithm:?}");
        assert_eq!(back.partial, 0, "{algorithm:?}");
    }

    // Limb vertices sit on the front hull and test outside, so the limb
    // ring stays partial
    let mut bodies = scene();
    assert!(run(&mut bodies, Algorithm::Graham));
    let back = facing(&bodies[1]);
    assert_eq!(back.visible, 0);
    assert!(back.partial > 0);
    assert!(back.hidden > back.total() / 2);
}

#[test]
fn zero_area_back_element_changes_nothing_else() {
    let line = Element::from_vertices(
        Point3::new(10.0, 10.0, 5.0),
        Point3::new(11.0, 10.0, 5.0),
        Point3::new(12.0, 10.0, 5.0),
    );
    for algorithm in ECLIPSE_ALGORITHMS {
        let mut plain = transit();
        let plain_flag = run(&mut plain, algorithm);

        let mut bodies = transit_with(vec![line.clone()]);
        assert_eq!(run(&mut bodies, algorithm), plain_flag, "{algorithm:?}");
        let mut back = flags(&bodies[1]);
        assert!(back.pop().is_some());
        assert_eq!(back, flags(&plain[1]), "{algorithm:?}");
        assert_eq!(flags(&bodies[0]), flags(&plain[0]), "{algorithm:?}");
    }
}

#[test]
fn sliver_back_element_completes() {
    let sliver = facing_triangle(10.0, 10.0, 5.0, 1e-9);
    for algorithm in ECLIPSE_ALGORITHMS {
        let mut plain = transit();
        run(&mut plain, algorithm);

        let mut bodies = transit_with(vec![sliver.clone()]);
        assert!(run(&mut bodies, algorithm), "{algorithm:?}");
        let mut back = flags(&bodies[1]);
        assert_eq!(back.pop(), Some(Visibility::Visible), "{algorithm:?}");
        // The band narrows to the sliver's scale, so only partials can move
        let hidden = back.iter().filter(|v| v.is_hidden()).count();
        assert_eq!(hidden, plain[1].mesh().unwrap().counts().hidden, "{algorithm:?}");
        if algorithm != Algorithm::Graham {
            assert_eq!(back, flags(&plain[1]), "{algorithm:?}");
        }
    }
}

#[test]
fn transit_hidden_area_brackets_lens() {
    let lens = lens_area(1.0);
    assert_relative_eq!(lens, 2.0 * std::f64::consts::PI / 3.0 - 3.0_f64.sqrt() / 2.0, epsilon = 1e-12);

    for algorithm in ECLIPSE_ALGORITHMS {
        let mut bodies = transit();
        assert!(run(&mut bodies, algorithm), "{algorithm:?}");
        let back = bodies[1].mesh().unwrap();
        let hidden = back.hidden_projected_area();
        let partial = back.partial_projected_area();
        assert!(hidden <= lens + 1e-6, "{algorithm:?}: hidden {hidden} > lens {lens}");
        assert!(
            hidden + partial >= 0.95 * lens,
            "{algorithm:?}: hidden {hidden} + partial {partial} < lens {lens}"
        );
        assert!(back.visible_projected_area() > 0.0);
    }
}

#[test]
fn detectors_agree_on_hidden_faces() {
    let hidden_facing = |algorithm: Algorithm| -> Vec<bool> {
        let mut bodies = transit();
        run(&mut bodies, algorithm);
        bodies[1]
            .mesh()
            .unwrap()
            .iter()
            .filter(|e| e.mu() > 0.0)
            .map(|e| e.is_hidden())
            .collect()
    };
    let ray = hidden_facing(Algorithm::RayTrace);
    let total = ray.len();
    for algorithm in [Algorithm::ConvexHull, Algorithm::Graham] {
        let other = hidden_facing(algorithm);
        let mismatched = ray.iter().zip(&other).filter(|(a, b)| a != b).count();
        assert!(
            mismatched * 20 <= total,
            "{algorithm:?}: {mismatched} of {total} facing elements disagree with ray tracing"
        );
    }
}

#[test]
fn repeated_runs_are_identical() {
    for algorithm in ALL_ALGORITHMS {
        let mut bodies = transit();
        let first_flag = run(&mut bodies, algorithm);
        let first: Vec<_> = bodies.iter().map(flags).collect();
        let second_flag = run(&mut bodies, algorithm);
        let second: Vec<_> = bodies.iter().map(flags).collect();
        assert_eq!(first_flag, second_flag, "{algorithm:?}");
        assert_eq!(first, second, "{algorithm:?}");
    }
}

#[test]
fn composite_matches_flat_list() {
    for algorithm in ALL_ALGORITHMS {
        let mut flat = transit();
        run(&mut flat, algorithm);

        let mut nested = vec![Body::composite("binary", transit())];
        run(&mut nested, algorithm);
        let leaves = nested[0].leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].mesh.visibilities(), flags(&flat[0]), "{algorithm:?}");
        assert_eq!(leaves[1].mesh.visibilities(), flags(&flat[1]), "{algorithm:?}");
    }
}

#[test]
fn front_body_unaffected_by_transit() {
    for algorithm in ECLIPSE_ALGORITHMS {
        let mut alone = vec![Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0))];
        run(&mut alone, algorithm);
        let mut bodies = transit();
        run(&mut bodies, algorithm);
        assert_eq!(flags(&bodies[0]), flags(&alone[0]), "{algorithm:?}");
    }
}

#[test]
fn settings_from_toml_drive_detection() {
    let settings = EclipseSettings::from_toml_str(
        r#"
algorithm = "graham"
distance_factor = 0.0
depth_policy = "visible_centroid"
"#,
    )
    .unwrap();
    let mut bodies = transit();
    assert!(detect_eclipses(&mut bodies, &settings).unwrap());
    let counts = bodies[1].mesh().unwrap().counts();
    assert!(counts.hidden > counts.total() / 2);
    assert!(counts.partial > 0);
}
