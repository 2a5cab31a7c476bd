use crate::error::Result;
use crate::geometry::curve::Arc;
use crate::geometry::surface::Sphere;
use crate::math::{Point3, Vector3};
use crate::topology::{
    EdgeCurve, EdgeData, FaceData, FaceSurface, OrientedEdge, ShellData, SolidData, SolidId,
    TopologyStore, WireData,
};

/// Creates a sphere solid from a center and radius.
///
/// The sphere is a single full spherical face whose outer wire is the
/// equator seam: one circular edge starting and ending at the same
/// seam vertex. One vertex, one edge, one wire, one face.
pub struct MakeSphere {
    center: Point3,
    radius: f64,
}

impl MakeSphere {
    /// Creates a new `MakeSphere` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Executes the operation, creating the sphere in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let axis = Vector3::z();
        let ref_dir = Vector3::x();
        let surface = Sphere::new(self.center, self.radius, axis, ref_dir)?;

        let seam_point = self.center + ref_dir * self.radius;
        let seam = store.add_point_vertex(seam_point);
        let equator = Arc::full_circle(self.center, self.radius, axis, ref_dir)?;
        let edge = store.add_edge(EdgeData {
            start: seam,
            end: seam,
            curve: EdgeCurve::Arc(equator),
            t_start: 0.0,
            t_end: std::f64::consts::TAU,
        });
        let wire = store.add_wire(WireData::new(vec![OrientedEdge::forward(edge)], true));
        let face = store.add_face(FaceData::new(FaceSurface::Sphere(surface), wire));
        let shell = store.add_shell(ShellData::closed(vec![face]));
        Ok(store.add_solid(SolidData::new(shell)))
    }
}
