use criterion::{black_box, criterion_group, criterion_main, Criterion};

use geostep::{
    algorithms::SegmentIntersection,
    generators::{checkerboard, slanted_checkerboard, slanties, spokes},
    sweep::{sweep, SweepConfig},
    Driver, Segments,
};

fn just_the_sweep(c: &mut Criterion) {
    let config = SweepConfig::default();
    for (name, lines) in [
        ("checkerboard", checkerboard(10)),
        ("slanted checkerboard", slanted_checkerboard(10)),
        ("slanties", slanties(30)),
        ("spokes", spokes(50)),
    ] {
        let segs = Segments::from_lines_lossy(lines, config.eps);
        c.bench_function(&format!("sweep {name}"), |b| {
            b.iter(|| black_box(sweep(&segs, &config)))
        });
    }
}

fn whole_trace(c: &mut Criterion) {
    let lines = checkerboard(10);
    let alg = SegmentIntersection::default();
    c.bench_function("trace checkerboard", |b| {
        b.iter(|| black_box(alg.run(&lines)))
    });
}

criterion_group!(benches, just_the_sweep, whole_trace);
criterion_main!(benches);
