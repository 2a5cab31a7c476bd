use crate::error::{OperationError, Result};
use crate::geometry::surface::Plane;
use crate::math::Point3;
use crate::operations::creation::MakeWire;
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore};

/// Tolerance for the coplanarity check, relative to the polygon size.
const COPLANARITY_FACTOR: f64 = 1e-8;

/// Creates a planar face from a closed polygon of points.
///
/// This is also the probe-plane builder used by bounding box
/// refinement: four corners perpendicular to an axis give a finite
/// rectangular face to intersect against a shape.
pub struct MakeFace {
    points: Vec<Point3>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation from the polygon corners,
    /// in order, without repeating the first point.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three points are given, the points
    /// are collinear, or they are not coplanar.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        if self.points.len() < 3 {
            return Err(
                OperationError::InvalidInput("a face needs at least three points".into()).into(),
            );
        }

        let plane = self.fit_plane()?;
        let scale = self
            .points
            .iter()
            .map(|point| (point - self.points[0]).norm())
            .fold(1.0_f64, f64::max);
        for point in &self.points {
            if plane.signed_distance(point).abs() > scale * COPLANARITY_FACTOR {
                return Err(
                    OperationError::InvalidInput("face points are not coplanar".into()).into(),
                );
            }
        }

        let outer_wire = MakeWire::new(self.points.clone(), true).execute(store)?;
        Ok(store.add_face(FaceData::new(FaceSurface::Plane(plane), outer_wire)))
    }

    /// Plane through the first point and the first non-collinear triple.
    fn fit_plane(&self) -> Result<Plane> {
        let origin = self.points[0];
        let u = self.points[1] - origin;
        for point in &self.points[2..] {
            if let Ok(plane) = Plane::new(origin, u, point - origin) {
                return Ok(plane);
            }
        }
        Err(OperationError::InvalidInput("face points are collinear".into()).into())
    }
}
