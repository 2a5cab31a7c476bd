use log::debug;

use crate::error::{OperationError, Result};
use crate::geometry::discretize;
use crate::geometry::surface::Plane;
use crate::math::{Point3, TOLERANCE};
use crate::topology::{
    Catalog, CompoundData, FaceId, FaceSurface, Shape, ShapeKind, TopologyStore,
};

/// Distance under which two intersection points are folded into one.
const MERGE_DISTANCE: f64 = 1e-9;

/// Boolean common of a shape with a planar probe face.
///
/// Computes representative points where the probe face's plane cuts the
/// shape and materializes them as vertices grouped in a compound, which
/// is inserted into the store and returned. Callers typically only ask
/// whether the result contains at least one vertex — that is how
/// bounding box refinement decides a probe plane has reached the shape.
pub struct PlaneCommon {
    shape: Shape,
    probe: FaceId,
}

impl PlaneCommon {
    /// Creates a new `PlaneCommon` operation.
    #[must_use]
    pub fn new(shape: Shape, probe: FaceId) -> Self {
        Self { shape, probe }
    }

    /// Executes the operation, returning the section compound.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe face is not planar, or if `shape`
    /// holds handles not present in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<Shape> {
        let probe_data = store.face(self.probe)?;
        let FaceSurface::Plane(plane) = probe_data.surface.clone() else {
            return Err(
                OperationError::InvalidInput("probe face must be planar".into()).into(),
            );
        };

        let catalog = Catalog::build(store, self.shape)?;
        let mut points = Vec::new();

        let faces = catalog.entities_of(ShapeKind::Face);
        if faces.is_empty() {
            // no faces: fall back to the shape's own edges, then vertices
            if catalog.count(ShapeKind::Edge) > 0 {
                for &edge in catalog.entities_of(ShapeKind::Edge) {
                    if let Some(id) = edge.as_edge() {
                        let polyline = discretize::edge_points(store, id)?;
                        collect_polyline_crossings(&polyline, &plane, &mut points);
                    }
                }
            } else {
                for &vertex in catalog.entities_of(ShapeKind::Vertex) {
                    if let Some(id) = vertex.as_vertex() {
                        let point = store.vertex(id)?.point;
                        if plane.signed_distance(&point).abs() <= TOLERANCE {
                            points.push(point);
                        }
                    }
                }
            }
        } else {
            for &face in faces {
                if let Some(id) = face.as_face() {
                    section_face(store, id, &plane, &mut points)?;
                }
            }
        }

        let merged = merge_points(points);
        debug!(
            "plane common of {:?}: {} intersection vertices",
            self.shape,
            merged.len()
        );

        let children = merged
            .into_iter()
            .map(|point| Shape::Vertex(store.add_point_vertex(point)))
            .collect();
        Ok(Shape::Compound(store.add_compound(CompoundData { children })))
    }
}

/// Intersection points of one face with the probe plane.
fn section_face(
    store: &TopologyStore,
    face: FaceId,
    plane: &Plane,
    points: &mut Vec<Point3>,
) -> Result<()> {
    let data = store.face(face)?;
    match &data.surface {
        FaceSurface::Plane(_) => {
            // a planar patch meets the probe plane wherever its boundary
            // crosses it; sample each boundary edge separately so no
            // phantom segments appear between loops
            for wire in
                std::iter::once(data.outer_wire).chain(data.inner_wires.iter().copied())
            {
                let wire_data = store.wire(wire)?;
                for oriented in &wire_data.edges {
                    let polyline = discretize::edge_points(store, oriented.edge)?;
                    collect_polyline_crossings(&polyline, plane, points);
                }
            }
        }
        FaceSurface::Sphere(sphere) => {
            // full spherical patch: exact circle test against the plane
            if let Some(point) = sphere.plane_section_point(plane) {
                points.push(point);
            }
        }
    }
    Ok(())
}

/// Points where a polyline touches or crosses the plane.
fn collect_polyline_crossings(polyline: &[Point3], plane: &Plane, points: &mut Vec<Point3>) {
    for pair in polyline.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let da = plane.signed_distance(&a);
        let db = plane.signed_distance(&b);
        if da.abs() <= TOLERANCE {
            points.push(a);
        }
        if da * db < 0.0 {
            let t = da / (da - db);
            points.push(a + (b - a) * t);
        }
    }
    if let Some(last) = polyline.last() {
        if plane.signed_distance(last).abs() <= TOLERANCE {
            points.push(*last);
        }
    }
}

/// Folds together points closer than [`MERGE_DISTANCE`].
fn merge_points(points: Vec<Point3>) -> Vec<Point3> {
    let mut merged: Vec<Point3> = Vec::new();
    for point in points {
        if !merged
            .iter()
            .any(|kept| (kept - point).norm() < MERGE_DISTANCE)
        {
            merged.push(point);
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeFace, MakeSphere, MakeWire};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Rectangular probe face perpendicular to X at the given coordinate.
    fn probe_at_x(store: &mut TopologyStore, x: f64) -> FaceId {
        MakeFace::new(vec![
            p(x, -50.0, -50.0),
            p(x, 50.0, -50.0),
            p(x, 50.0, 50.0),
            p(x, -50.0, 50.0),
        ])
        .execute(store)
        .unwrap()
    }

    fn section_vertex_count(store: &mut TopologyStore, shape: Shape, probe: FaceId) -> usize {
        let section = PlaneCommon::new(shape, probe).execute(store).unwrap();
        Catalog::build(store, section)
            .unwrap()
            .count(ShapeKind::Vertex)
    }

    #[test]
    fn plane_through_box_intersects() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(10.0, 20.0, 30.0))
            .execute(&mut store)
            .unwrap();
        let probe = probe_at_x(&mut store, 5.0);

        let hits = section_vertex_count(&mut store, Shape::Solid(solid), probe);
        assert!(hits >= 1);
    }

    #[test]
    fn plane_outside_box_misses() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(10.0, 20.0, 30.0))
            .execute(&mut store)
            .unwrap();

        for x in [-0.001, 10.001] {
            let probe = probe_at_x(&mut store, x);
            assert_eq!(section_vertex_count(&mut store, Shape::Solid(solid), probe), 0);
        }
    }

    #[test]
    fn sphere_section_is_exact_at_the_limit() {
        let mut store = TopologyStore::new();
        let solid = MakeSphere::new(p(0.0, 0.0, 0.0), 10.0)
            .execute(&mut store)
            .unwrap();

        let inside = probe_at_x(&mut store, 9.9999);
        assert!(section_vertex_count(&mut store, Shape::Solid(solid), inside) >= 1);

        let outside = probe_at_x(&mut store, 10.0001);
        assert_eq!(
            section_vertex_count(&mut store, Shape::Solid(solid), outside),
            0
        );
    }

    #[test]
    fn bare_wire_intersects_through_its_edges() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)], false)
            .execute(&mut store)
            .unwrap();
        let probe = probe_at_x(&mut store, 5.0);

        let hits = section_vertex_count(&mut store, Shape::Wire(wire), probe);
        assert_eq!(hits, 1);
    }

    #[test]
    fn non_planar_probe_is_rejected() {
        let mut store = TopologyStore::new();
        let solid = MakeSphere::new(p(0.0, 0.0, 0.0), 1.0)
            .execute(&mut store)
            .unwrap();
        let sphere_face = {
            let shell = store.solid(solid).unwrap().outer_shell;
            store.shell(shell).unwrap().faces[0]
        };

        let result = PlaneCommon::new(Shape::Solid(solid), sphere_face).execute(&mut store);
        assert!(result.is_err());
    }
}
