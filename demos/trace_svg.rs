use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, ValueEnum};

use geostep::{
    algorithms::{
        ConvexHull, LineClipping, LineClippingInput, PointInPolygon, PointInPolygonInput,
        PolygonClipping, PolygonClippingInput, SegmentIntersection,
    },
    generators, Driver, Navigator, Point, PlaybackConfig, PseudocodeLine, Scene, Trace,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    Intersection,
    ConvexHull,
    LineClipping,
    PolygonClipping,
    PointInPolygon,
}

/// Writes every step of an algorithm's trace to an SVG file.
#[derive(Parser)]
struct Cli {
    #[arg(long, value_enum)]
    algorithm: Algorithm,

    /// The directory to put the SVG files in.
    #[arg(long)]
    output: PathBuf,

    /// How big the example input is.
    #[arg(long, default_value_t = 3)]
    size: usize,
}

fn rect() -> kurbo::Rect {
    kurbo::Rect::new(-60.0, -40.0, 60.0, 40.0)
}

fn run(algorithm: Algorithm, n: usize) -> (Trace, Scene, &'static [PseudocodeLine]) {
    fn go<D: Driver>(d: D, input: &D::Input) -> (Trace, Scene, &'static [PseudocodeLine]) {
        let (trace, scene) = d.run(input);
        (trace, scene, D::PSEUDOCODE)
    }

    let polygon = generators::regular_polygon(n.max(3), 80.0);
    match algorithm {
        Algorithm::Intersection => go(SegmentIntersection::default(), &generators::slanties(n)),
        Algorithm::ConvexHull => {
            let mut points = generators::regular_polygon(n.max(3), 80.0);
            points.extend(generators::regular_polygon(n.max(3) + 2, 40.0));
            go(ConvexHull::default(), &points)
        }
        Algorithm::LineClipping => go(
            LineClipping::default(),
            &LineClippingInput {
                rect: rect(),
                lines: generators::spokes(n),
            },
        ),
        Algorithm::PolygonClipping => go(
            PolygonClipping::default(),
            &PolygonClippingInput {
                rect: rect(),
                polygon,
            },
        ),
        Algorithm::PointInPolygon => go(
            PointInPolygon::default(),
            &PointInPolygonInput {
                polygon,
                point: Point::new(10.0, 5.0),
            },
        ),
    }
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    if args.size == 0 {
        bail!("the input size must be positive");
    }
    std::fs::create_dir_all(&args.output)?;

    let (trace, scene, listing) = run(args.algorithm, args.size);
    let mut nav = Navigator::new(PlaybackConfig::default());
    let mut highlight = Some(nav.load(trace, scene));
    while let Some(h) = highlight {
        let Some(scene) = nav.scene() else {
            break;
        };
        let path = args.output.join(format!("step-{:04}.svg", h.step));
        svg::save(&path, &scene.to_svg())?;

        let line = listing.get(h.line).map_or("", |l| l.code);
        println!(
            "{:4} {:40} {}",
            h.step,
            line,
            h.extra_text.as_deref().unwrap_or("")
        );

        highlight = if h.step + 1 < nav.len() {
            nav.forward()
        } else {
            None
        };
    }
    Ok(())
}
