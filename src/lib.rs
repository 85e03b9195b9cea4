#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

pub mod action;
pub mod algorithms;
#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod geom;
pub mod navigator;
mod num;
pub mod scene;
mod segments;
pub mod stage;
pub mod step;
pub mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod status;

pub use action::{Action, Scheduled, Transition};
pub use algorithms::Driver;
pub use geom::{Point, Segment};
pub use navigator::{Highlight, Navigator, PlaybackConfig};
pub use scene::{Color, Edit, Element, ElementId, Scene, Shape};
pub use segments::{SegIdx, Segments};
pub use stage::Stage;
pub use step::{PseudocodeLine, Step, Trace};

#[derive(Clone, Copy, Debug, PartialEq)]
/// The input points were faulty.
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// The segment at this input index has (almost) coincident endpoints.
    Degenerate(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::Degenerate(idx) => write!(f, "input {idx} has no length"),
        }
    }
}

impl std::error::Error for Error {}
