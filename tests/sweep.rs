use arbitrary::Unstructured;
use geostep::{
    algorithms::find_intersections,
    sweep::{sweep, EventKind, SweepConfig, SweepEvent, PSEUDOCODE},
    Point, Segments,
};

fn run(lines: &[((f64, f64), (f64, f64))]) -> Vec<Point> {
    let config = SweepConfig::default();
    let segments = Segments::try_from_lines(lines.iter().copied(), config.eps).unwrap();
    sweep(&segments, &config).intersections.to_vec()
}

#[test]
fn collinear_but_apart() {
    assert!(run(&[((0.0, 0.0), (1.0, 0.0)), ((2.0, 0.0), (3.0, 0.0))]).is_empty());
    assert!(run(&[((0.0, 0.0), (1.0, 1.0)), ((2.0, 2.0), (3.0, 3.0))]).is_empty());
}

#[test]
fn parallel() {
    assert!(run(&[((0.0, 0.0), (10.0, 1.0)), ((0.0, 5.0), (10.0, 6.0))]).is_empty());
}

#[test]
fn simple_crossing() {
    let out = run(&[((0.0, 0.0), (10.0, 10.0)), ((0.0, 10.0), (10.0, 0.0))]);
    assert_eq!(out.len(), 1);
    assert!(out[0].close_to(&Point::new(5.0, 5.0), 1e-9));
}

#[test]
fn shared_endpoint() {
    let out = run(&[((0.0, 0.0), (10.0, 0.0)), ((0.0, 0.0), (0.0, 10.0))]);
    assert_eq!(out, vec![Point::new(0.0, 0.0)]);
}

#[test]
fn nearby_crossings_are_one_crossing() {
    let config = SweepConfig { eps: 1e-3 };
    let segments = Segments::try_from_lines(
        [
            ((0.0, 0.0), (10.0, 10.0)),
            ((0.0, 10.0), (10.0, 0.0)),
            ((4.9995, 0.0), (4.9995, 10.0)),
        ],
        config.eps,
    )
    .unwrap();
    let report = sweep(&segments, &config);
    assert_eq!(report.intersections.len(), 1);

    // Only one of the crossings made it into the queue, too.
    let crossings = report
        .events
        .iter()
        .filter(|ev| {
            matches!(
                ev,
                SweepEvent::Popped {
                    kind: EventKind::Intersection,
                    ..
                }
            )
        })
        .count();
    assert!(crossings <= 1, "{crossings} crossing events");
}

#[test]
fn degenerate_input_is_rejected() {
    let err = Segments::try_from_lines([((0.0, 0.0), (1.0, 1.0)), ((2.0, 2.0), (2.0, 2.0))], 1e-9)
        .unwrap_err();
    assert_eq!(err, geostep::Error::Degenerate(1));
    assert_eq!(err.to_string(), "input 1 has no length");

    // The lossy version just leaves it out.
    assert!(find_intersections(&[(Point::new(2.0, 2.0), Point::new(2.0, 2.0))]).is_empty());
}

#[test]
fn no_input() {
    let report = sweep(&Segments::default(), &SweepConfig::default());
    assert!(report.intersections.is_empty());
    assert!(matches!(
        report.events.as_slice(),
        [SweepEvent::Initialized { .. }, SweepEvent::Finished { count: 0 }]
    ));
}

/// Checks the things that should hold for any sweep, however degenerate.
fn sweep_is_sane(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
    let lines = geostep::arbitrary::lines(u)?;
    let config = SweepConfig::default();
    let segments = Segments::from_lines_lossy(lines, config.eps);
    let report = sweep(&segments, &config);

    assert!(matches!(
        report.events.first(),
        Some(SweepEvent::Initialized { .. })
    ));
    assert!(matches!(
        report.events.last(),
        Some(SweepEvent::Finished { count }) if *count == report.intersections.len()
    ));
    assert!(report.events.iter().all(|ev| ev.line() < PSEUDOCODE.len()));

    // The sweep line never goes backwards.
    let popped: Vec<Point> = report
        .events
        .iter()
        .filter_map(|ev| match ev {
            SweepEvent::Popped { point, .. } => Some(*point),
            _ => None,
        })
        .collect();
    assert!(popped.windows(2).all(|w| w[0] < w[1]), "{popped:?}");

    let points = report.intersections.to_vec();
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            assert!(!p.close_to(q, config.eps), "{p:?} and {q:?} are duplicates");
        }
    }
    Ok(())
}

#[test]
fn arbitrary_sweeps() {
    arbtest::arbtest(sweep_is_sane);
}
