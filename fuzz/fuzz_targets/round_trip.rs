#![no_main]

use std::time::Duration;

use arbitrary::Unstructured;

use geostep::{
    algorithms::{PointInPolygon, PointInPolygonInput, PolygonClipping, PolygonClippingInput},
    Driver, Navigator, PlaybackConfig,
};
use libfuzzer_sys::fuzz_target;

fn check<D: Driver>(driver: &D, input: &D::Input) {
    let (trace, scene) = driver.run(input);
    let mut nav = Navigator::new(PlaybackConfig::default());
    nav.load(trace, scene);
    let Some(start) = nav.scene().cloned() else {
        return;
    };
    while nav.cursor() != Some(nav.len() - 1) {
        nav.forward();
    }
    while nav.cursor() != Some(0) {
        nav.back();
    }
    nav.advance(Duration::from_secs(60));
    assert_eq!(nav.scene(), Some(&start));
}

fn round_trip(u: &mut Unstructured) -> Result<(), arbitrary::Error> {
    let polygon = geostep::arbitrary::polygon(u)?;
    if u.arbitrary()? {
        let input = PolygonClippingInput {
            rect: geostep::arbitrary::rect(u)?,
            polygon,
        };
        check(&PolygonClipping::default(), &input);
    } else {
        let input = PointInPolygonInput {
            polygon,
            point: geostep::arbitrary::point(u)?,
        };
        check(&PointInPolygon::default(), &input);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let _ = round_trip(&mut u);
});
