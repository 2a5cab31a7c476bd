use crate::error::{OperationError, Result};
use crate::geometry::curve::Line;
use crate::geometry::surface::Plane;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{
    EdgeData, EdgeId, FaceData, FaceSurface, OrientedEdge, ShellData, SolidData, SolidId,
    TopologyStore, VertexId, WireData,
};

/// Creates a box solid from two corner points.
///
/// The resulting topology is fully shared: 8 vertices, 12 edges each
/// bounding two faces, 6 four-edge wires, 6 planar faces, one closed
/// shell and one solid.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is degenerate on any axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        if hi.x - lo.x < TOLERANCE || hi.y - lo.y < TOLERANCE || hi.z - lo.z < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "box corners must differ on every axis".into(),
            )
            .into());
        }

        // corner index bit layout: (x, y, z), bit set = max side
        let corners = [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ];
        let vertices: Vec<VertexId> = corners
            .iter()
            .map(|&corner| store.add_point_vertex(corner))
            .collect();

        // bottom ring, top ring, then the four verticals
        let edge_ends: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let mut edges: Vec<EdgeId> = Vec::with_capacity(12);
        for &(a, b) in &edge_ends {
            let line = Line::through(corners[a], corners[b])?;
            let length = (corners[b] - corners[a]).norm();
            edges.push(store.add_edge(EdgeData::segment(
                vertices[a],
                vertices[b],
                line,
                length,
            )));
        }

        // each face: four (edge index, forward) pairs tracing the boundary,
        // plus an outward normal for the underlying plane
        let face_loops: [([(usize, bool); 4], Vector3); 6] = [
            // bottom (z = lo.z) and top (z = hi.z)
            ([(3, false), (2, false), (1, false), (0, false)], -Vector3::z()),
            ([(4, true), (5, true), (6, true), (7, true)], Vector3::z()),
            // front (y = lo.y) and back (y = hi.y)
            ([(0, true), (9, true), (4, false), (8, false)], -Vector3::y()),
            ([(2, true), (11, true), (6, false), (10, false)], Vector3::y()),
            // left (x = lo.x) and right (x = hi.x)
            ([(3, true), (8, true), (7, false), (11, false)], -Vector3::x()),
            ([(1, true), (10, true), (5, false), (9, false)], Vector3::x()),
        ];

        let mut faces = Vec::with_capacity(6);
        for (loop_edges, normal) in face_loops {
            let oriented: Vec<OrientedEdge> = loop_edges
                .iter()
                .map(|&(idx, forward)| OrientedEdge::new(edges[idx], forward))
                .collect();
            let wire = store.add_wire(WireData::new(oriented, true));
            let anchor = face_anchor(&corners, &loop_edges, &edge_ends);
            let plane = Plane::from_normal(anchor, normal)?;
            faces.push(store.add_face(FaceData::new(FaceSurface::Plane(plane), wire)));
        }

        let shell = store.add_shell(ShellData::closed(faces));
        Ok(store.add_solid(SolidData::new(shell)))
    }
}

/// Any corner on the face, used as the plane origin.
fn face_anchor(
    corners: &[Point3; 8],
    loop_edges: &[(usize, bool); 4],
    edge_ends: &[(usize, usize); 12],
) -> Point3 {
    let (edge_idx, forward) = loop_edges[0];
    let (a, b) = edge_ends[edge_idx];
    corners[if forward { a } else { b }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::WireExplorer;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_topology_is_fully_shared() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(10.0, 20.0, 30.0))
            .execute(&mut store)
            .unwrap();

        let shell_id = store.solid(solid).unwrap().outer_shell;
        let shell = store.shell(shell_id).unwrap();
        assert!(shell.is_closed);
        assert_eq!(shell.faces.len(), 6);
    }

    #[test]
    fn every_face_wire_is_a_traversable_cycle() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0))
            .execute(&mut store)
            .unwrap();

        let shell_id = store.solid(solid).unwrap().outer_shell;
        let faces = store.shell(shell_id).unwrap().faces.clone();
        for face in faces {
            let wire = store.face(face).unwrap().outer_wire;
            let vertices = WireExplorer::new(&store, wire).ordered_vertices().unwrap();
            assert_eq!(vertices.len(), 4);
        }
    }

    #[test]
    fn flat_box_is_rejected() {
        let mut store = TopologyStore::new();
        let result = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0)).execute(&mut store);
        assert!(result.is_err());
    }
}
