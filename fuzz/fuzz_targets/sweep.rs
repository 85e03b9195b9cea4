#![no_main]

use arbitrary::Unstructured;

use geostep::{
    sweep::{sweep, SweepConfig, SweepEvent},
    Segments,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(lines) = geostep::arbitrary::lines(&mut u) else {
        return;
    };
    let config = SweepConfig::default();
    let segments = Segments::from_lines_lossy(lines, config.eps);
    let report = sweep(&segments, &config);

    let points = report.intersections.to_vec();
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            assert!(!p.close_to(q, config.eps));
        }
    }
    assert!(matches!(
        report.events.last(),
        Some(SweepEvent::Finished { count }) if *count == points.len()
    ));
});
