//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::Point;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

fn float(u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    float_in_range(-1e3, 1e3, u)
}

/// Generate a float, but give it a chance to be close to another float.
fn another_float(orig: f64, u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    let close: bool = u.arbitrary()?;
    if close {
        let ulps: i32 = u.int_in_range(-32..=32)?;
        let scale = 1.0f64 + ulps as f64 * f64::EPSILON;
        Ok(orig * scale)
    } else {
        float(u)
    }
}

/// Generate an arbitrary point.
pub fn point(u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(float(u)?, float(u)?))
}

/// Generate a point with a chance of being exactly or almost equal to one of
/// `others`, or of being in line with one of them.
fn another_point(others: &[Point], u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    if others.is_empty() {
        return point(u);
    }
    let idx = u.choose_index(others.len())?;
    let other = others[idx];
    Ok(match u.int_in_range(0..=3)? {
        0 => other,
        1 => Point::new(another_float(other.x, u)?, another_float(other.y, u)?),
        2 => Point::new(other.x, float(u)?),
        _ => point(u)?,
    })
}

/// Generate line segments that are likely to share endpoints, be vertical, or
/// cross at almost the same place.
pub fn lines(u: &mut Unstructured<'_>) -> Result<Vec<(Point, Point)>, arbitrary::Error> {
    let count = u.int_in_range(0..=12)?;
    let mut endpoints = Vec::new();
    let mut ret = Vec::with_capacity(count);
    for _ in 0..count {
        let p = another_point(&endpoints, u)?;
        let q = another_point(&endpoints, u)?;
        endpoints.extend([p, q]);
        ret.push((p, q));
    }
    Ok(ret)
}

/// Generate a polygon, which might go around in either direction and might
/// intersect itself.
pub fn polygon(u: &mut Unstructured<'_>) -> Result<Vec<Point>, arbitrary::Error> {
    let count = u.int_in_range(0..=10)?;
    let mut ret = Vec::with_capacity(count);
    for _ in 0..count {
        let p = another_point(&ret, u)?;
        ret.push(p);
    }
    Ok(ret)
}

/// Generate a rectangle with positive area.
pub fn rect(u: &mut Unstructured<'_>) -> Result<kurbo::Rect, arbitrary::Error> {
    let p = point(u)?;
    let w = float_in_range(1.0, 1e3, u)?;
    let h = float_in_range(1.0, 1e3, u)?;
    Ok(kurbo::Rect::new(p.x, p.y, p.x + w, p.y + h))
}
