//! Boolean operations between shapes.

mod common;

pub use common::PlaneCommon;
