pub mod curve;
pub mod discretize;
pub mod surface;

pub use curve::{Arc, Curve, CurveDomain, Line};
pub use surface::{Plane, Sphere};
