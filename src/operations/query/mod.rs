//! Query operations that inspect shapes without modifying them.

mod bounding_box;

pub use bounding_box::{ApproxBoundingBox, Axis, BoundingBox, RefineBoundingBox, Side};
