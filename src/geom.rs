//! Geometric primitives, like points and lines.

use kurbo::Vec2;

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`, for the convenience of our sweep-line
/// algorithm (which moves in increasing `x`).
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical coordinate.
    ///
    /// Although it isn't important for functionality, the documentation and method naming
    /// assumes that larger values are down, as they are on a canvas.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// Compute an affine combination between `self` and `other`; that is, `(1 - t) * self + t * other`.
    pub fn affine(&self, other: &Self, t: f64) -> Self {
        Point {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }

    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Are both coordinates within `eps` of `other`'s?
    pub fn close_to(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.to_kurbo().distance(other.to_kurbo())
    }

    fn vec_to(&self, other: &Point) -> Vec2 {
        other.to_kurbo() - self.to_kurbo()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// The z component of `(a - o) x (b - o)`, in canvas coordinates.
///
/// Because `y` grows downwards, a positive value means that `o -> a -> b`
/// turns clockwise on screen.
pub fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    o.vec_to(a).cross(o.vec_to(b))
}

/// A line segment, in sweep-line order.
///
/// `left` is the smaller endpoint in [`Point`]'s order, so for vertical
/// segments it is the top one.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    pub left: Point,
    pub right: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Segment { left, right } = self;
        write!(f, "{left:?} -- {right:?}")
    }
}

impl Segment {
    /// Create a new segment, putting the endpoints in sweep-line order.
    pub fn new(p: Point, q: Point) -> Self {
        debug_assert!(p != q);
        if p <= q {
            Segment { left: p, right: q }
        } else {
            Segment { left: q, right: p }
        }
    }

    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.left.to_kurbo(), self.right.to_kurbo())
    }

    pub fn length(&self) -> f64 {
        self.left.distance(&self.right)
    }

    /// Returns true if this segment is exactly vertical.
    pub fn is_vertical(&self) -> bool {
        self.left.x == self.right.x
    }

    /// The slope `dy / dx`, which is infinite for vertical segments.
    ///
    /// Since `left.x <= right.x` this is never negative infinity.
    pub fn slope(&self) -> f64 {
        if self.is_vertical() {
            f64::INFINITY
        } else {
            (self.right.y - self.left.y) / (self.right.x - self.left.x)
        }
    }

    /// The height of this segment where it meets the vertical line through `p`.
    ///
    /// Vertical segments meet that line in an interval; we report the point of
    /// the interval closest to `p`. Positions outside our horizontal range are
    /// clamped to the nearest endpoint.
    pub fn height_at(&self, p: &Point) -> f64 {
        if self.is_vertical() {
            p.y.clamp(self.left.y, self.right.y)
        } else if p.x <= self.left.x {
            self.left.y
        } else if p.x >= self.right.x {
            self.right.y
        } else {
            let t = (p.x - self.left.x) / (self.right.x - self.left.x);
            self.left.affine(&self.right, t).y
        }
    }

    /// Is `p` within `eps` of the line through this segment?
    pub fn collinear_with(&self, p: &Point, eps: f64) -> bool {
        let d = self.left.vec_to(&self.right);
        d.cross(self.left.vec_to(p)).abs() <= eps * d.hypot()
    }

    /// Is `p` on this segment, up to `eps`?
    pub fn contains(&self, p: &Point, eps: f64) -> bool {
        let (min_y, max_y) = if self.left.y <= self.right.y {
            (self.left.y, self.right.y)
        } else {
            (self.right.y, self.left.y)
        };
        p.x >= self.left.x - eps
            && p.x <= self.right.x + eps
            && p.y >= min_y - eps
            && p.y <= max_y + eps
            && self.collinear_with(p, eps)
    }

    /// Finds the point where this segment crosses `other`.
    ///
    /// Parallel segments (including collinear ones, even if they overlap) have
    /// no intersection point. A result within `eps` of one of the four endpoints
    /// is snapped onto that endpoint, so that it compares equal to the
    /// queue event that the endpoint already produced.
    pub fn intersection(&self, other: &Segment, eps: f64) -> Option<Point> {
        let d1 = self.left.vec_to(&self.right);
        let d2 = other.left.vec_to(&other.right);
        let len1 = d1.hypot();
        let len2 = d2.hypot();
        let denom = d1.cross(d2);
        if denom.abs() <= eps * len1 * len2 {
            return None;
        }

        let w = self.left.vec_to(&other.left);
        let t = w.cross(d2) / denom;
        let u = w.cross(d1) / denom;
        let t_slop = eps / len1;
        let u_slop = eps / len2;
        if !(-t_slop..=1.0 + t_slop).contains(&t) || !(-u_slop..=1.0 + u_slop).contains(&u) {
            return None;
        }

        let p = Point::from(self.left.to_kurbo() + d1 * t);
        let snapped = [self.left, self.right, other.left, other.right]
            .into_iter()
            .find(|end| end.close_to(&p, eps));
        Some(snapped.unwrap_or(p))
    }
}
