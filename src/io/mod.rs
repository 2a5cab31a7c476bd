//! File format support.

mod stl;

pub use stl::stl_bounding_box;
