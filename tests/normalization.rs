//! Tests that convert between raw and normalized locations on whole splines.

use assert_approx_eq::assert_approx_eq;
use geospline::{
    bulk_denormalize_ordered, bulk_normalize_ordered,
    math::{Point2d, Point3d, Space2d, Space3d, SplineType},
    ImmutableSpline, NormalizedSplineLocation, SplineError, SplineLocation, SplineSettings,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn winding(spline_type: SplineType) -> ImmutableSpline<Space3d> {
    ImmutableSpline::from_handles(
        [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(4.0, 1.5, 1.0),
            Point3d::new(6.0, 1.0, 1.0),
            Point3d::new(7.0, 3.0, 2.0),
        ],
        spline_type,
    )
}

/// Test normalization against lengths integrated independently at high resolution.
#[test]
fn matches_reference_values() {
    // Expected values for `winding`, from 64-subdivision quadrature and bisection in double precision.
    let cases = [
        (
            SplineType::Centripetal,
            9.156795708292712,
            [0.12402706821019478, 0.37317131691722416, 0.5561100453174591, 0.9721926886937232],
            [0.40337754533387554, 2.010335459911898, 3.3193549825984623],
        ),
        (
            SplineType::Uniform,
            9.156806862294793,
            [0.12388025009305544, 0.3734818460863464, 0.556729893846562, 0.9722236933293731],
            [0.4038360343102925, 2.010941895984149, 3.3169613677302463],
        ),
        (
            SplineType::Chordal,
            9.16180510569201,
            [0.12410216619538875, 0.3726046500257888, 0.555285014946727, 0.9721786305490298],
            [0.40315156473087604, 2.010800555313654, 3.3213486642029806],
        ),
    ];

    for (spline_type, length, normalized, raw) in cases {
        let spline = winding(spline_type);
        assert_approx_eq!(spline.length().unwrap(), length, 1e-7);
        for (location, expected) in [0.5, 1.5, 2.25, 3.9].into_iter().zip(normalized) {
            let actual = spline.normalize(SplineLocation(location)).unwrap();
            assert_approx_eq!(actual.0, expected, 1e-7);
        }
        for (location, expected) in [0.1, 0.5, 0.8].into_iter().zip(raw) {
            let actual = spline.denormalize(NormalizedSplineLocation(location)).unwrap();
            assert_approx_eq!(actual.0, expected, 1e-7);
        }
    }
}

/// Test that evenly spaced handles on a line normalize proportionally.
#[test]
fn straight_spline_is_proportional() {
    for spline_type in [SplineType::Uniform, SplineType::Centripetal, SplineType::Chordal] {
        let spline = ImmutableSpline::<Space2d>::from_handles(
            (0..5).map(|i| Point2d::new(i as f64 * 2.0, i as f64)),
            spline_type,
        );
        let count = spline.segment_count() as f64;
        for i in 0..=40 {
            let location = i as f64 / 10.0;
            let normalized = spline.normalize(SplineLocation(location)).unwrap();
            assert_approx_eq!(normalized.0, location / count, 1e-12);
        }
    }
}

/// Test that denormalizing undoes normalizing.
#[test]
fn round_trip() {
    let spline = winding(SplineType::Centripetal);
    for i in 0..=400 {
        let location = SplineLocation(i as f64 / 100.0);
        let normalized = spline.normalize(location).unwrap();
        let back = spline.denormalize(normalized).unwrap();
        assert_approx_eq!(back.0, location.0, 1e-9);
    }
}

/// Test that bulk conversion agrees with converting each location on its own.
#[test]
fn bulk_matches_single() {
    let mut rng = StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
    let spline = winding(SplineType::Chordal);

    let mut raw = (0..200)
        .map(|_| SplineLocation(rng.gen_range(0.0..=4.0)))
        .collect::<Vec<_>>();
    raw.extend([0.0, 1.0, 2.0, 4.0].map(SplineLocation));
    raw.sort_by(|a, b| a.0.total_cmp(&b.0));
    let bulk = bulk_normalize_ordered(&spline, raw.iter().copied()).unwrap();
    assert_eq!(bulk.len(), raw.len());
    for (location, normalized) in raw.iter().zip(&bulk) {
        assert_approx_eq!(normalized.0, spline.normalize(*location).unwrap().0, 1e-12);
    }

    let mut fractions = (0..200)
        .map(|_| NormalizedSplineLocation(rng.gen_range(0.0..=1.0)))
        .collect::<Vec<_>>();
    fractions.push(NormalizedSplineLocation::END);
    fractions.sort_by(|a, b| a.0.total_cmp(&b.0));
    let bulk = bulk_denormalize_ordered(&spline, fractions.iter().copied()).unwrap();
    for (fraction, location) in fractions.iter().zip(&bulk) {
        assert_approx_eq!(location.0, spline.denormalize(*fraction).unwrap().0, 1e-12);
    }
}

/// Test that finer integration settings agree with the default ones.
#[test]
fn subdivisions_converge() {
    let coarse = winding(SplineType::Centripetal);
    let fine = winding(SplineType::Centripetal)
        .with_settings(SplineSettings::default().with_arc_length_subdivisions(32));
    assert_approx_eq!(coarse.length().unwrap(), fine.length().unwrap(), 1e-9);
    let location = SplineLocation(2.7);
    assert_approx_eq!(
        coarse.normalize(location).unwrap().0,
        fine.normalize(location).unwrap().0,
        1e-9
    );
}

/// Test that a spline with too few handles is rejected by every conversion.
#[test]
fn invalid_spline_is_rejected() {
    let margin = Point2d::new(0.0, 0.0);
    let spline =
        ImmutableSpline::<Space2d>::new(margin, [Point2d::new(1.0, 1.0)], margin, SplineType::Uniform);
    let error = SplineError::InvalidSpline {
        required: 2,
        actual: 1,
    };
    assert_eq!(spline.normalize(SplineLocation(0.0)), Err(error.clone()));
    assert_eq!(spline.denormalize(NormalizedSplineLocation(0.0)), Err(error.clone()));
    assert_eq!(
        bulk_normalize_ordered(&spline, [SplineLocation(0.0)]),
        Err(error)
    );

    let bare = ImmutableSpline::<Space2d>::from_handles([Point2d::new(1.0, 1.0)], SplineType::Uniform);
    assert!(matches!(
        bare.length(),
        Err(SplineError::InvalidSpline { .. })
    ));
}
