//! Ordering and tolerance helpers for `f64`.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one just panics (in debug builds) when comparing NaNs -- it doesn't order
/// them, nor does it guard against them on construction. Every coordinate that
/// reaches the sweep has already been checked for finiteness, so this is all
/// the ordering we need for keying the event queue.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

// Now comes the fishy stuff.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        debug_assert!(!self.0.is_nan() && !other.0.is_nan());
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

/// Compares two floats, treating anything within `eps` as equal.
///
/// This is not transitive, so it must never be handed to a sort. We only
/// use it for the local decisions of the sweep (is this point on that
/// segment, are these two segments at the same height).
pub fn cmp_eps(a: f64, b: f64, eps: f64) -> std::cmp::Ordering {
    if (a - b).abs() <= eps {
        std::cmp::Ordering::Equal
    } else {
        CheapOrderedFloat(a).cmp(&CheapOrderedFloat(b))
    }
}
