//! Utilities for generating examples, benchmarks, and test cases.

use crate::Point;

type Lines = Vec<(Point, Point)>;

/// The edges of a closed polygon.
pub fn outline(points: &[Point]) -> Lines {
    (0..points.len())
        .map(|i| (points[i], points[(i + 1) % points.len()]))
        .collect()
}

/// Generate the edges of a bunch of squares, arranged in a grid.
///
/// The top-left of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated down by `slant`.
fn squares((x0, y0): (f64, f64), size: f64, offset: f64, slant: f64, count: usize) -> Lines {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            ret.extend(outline(&[
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]));
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// Every edge of an inner square crosses two edges of outer squares.
pub fn checkerboard(n: usize) -> Lines {
    let mut ret = squares((0.0, 0.0), 30.0, 40.0, 0.0, n);
    ret.extend(squares((20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)));
    ret
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
///
/// Vertical and horizontal lines need special handling in the sweep, so their
/// presence or absence can affect performance.
pub fn slanted_checkerboard(n: usize) -> Lines {
    let mut ret = squares((0.0, 0.0), 30.0, 40.0, 1.0, n);
    ret.extend(squares((20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)));
    ret
}

/// Long, skinny lines: `n` going from top-left to bottom-right and `n`
/// going from top-right to bottom-left. Every line of one kind crosses every
/// line of the other.
pub fn slanties(n: usize) -> Lines {
    let h = 20.0 * n as f64;

    let mut ret = Vec::new();
    for i in 0..n {
        let x_off = 20.0 * i as f64;
        ret.push((Point::new(x_off, 0.0), Point::new(x_off + h, h)));
        ret.push((Point::new(x_off + h + 10.0, 0.0), Point::new(x_off + 10.0, h)));
    }
    ret
}

/// `n` lines through a common center, like the spokes of a wheel.
///
/// They all cross at (almost) the same point, which the sweep should only
/// report once.
pub fn spokes(n: usize) -> Lines {
    let r = 100.0;
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::PI * i as f64 / n as f64;
            let (s, c) = theta.sin_cos();
            (Point::new(-r * c, -r * s), Point::new(r * c, r * s))
        })
        .collect()
}

/// A regular polygon with `n` corners, centered at the origin.
pub fn regular_polygon(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let (s, c) = theta.sin_cos();
            Point::new(radius * c, radius * s)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::find_intersections;

    #[test]
    fn slanties_cross() {
        // Every pair crosses once, and no three lines share a crossing.
        assert_eq!(find_intersections(&slanties(4)).len(), 16);
    }

    #[test]
    fn spokes_meet_once() {
        assert_eq!(find_intersections(&spokes(7)).len(), 1);
    }
}
