use crate::error::{OperationError, Result};
use crate::geometry::curve::Line;
use crate::math::{Point3, TOLERANCE};
use crate::topology::{EdgeData, OrientedEdge, TopologyStore, VertexId, WireData, WireId};

/// Creates a wire from a sequence of 3D points, connected by straight edges.
pub struct MakeWire {
    points: Vec<Point3>,
    close: bool,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation.
    ///
    /// With `close`, an extra edge from the last point back to the first
    /// is added and the wire is marked closed.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        Self { points, close }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given, or if two
    /// consecutive points coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        if self.points.len() < 2 {
            return Err(
                OperationError::InvalidInput("a wire needs at least two points".into()).into(),
            );
        }
        for pair in self.points.windows(2) {
            if (pair[1] - pair[0]).norm() < TOLERANCE {
                return Err(OperationError::InvalidInput(
                    "consecutive wire points coincide".into(),
                )
                .into());
            }
        }

        let vertices: Vec<VertexId> = self
            .points
            .iter()
            .map(|&point| store.add_point_vertex(point))
            .collect();

        let mut edges = Vec::new();
        for i in 0..vertices.len() - 1 {
            edges.push(make_segment(
                store,
                vertices[i],
                vertices[i + 1],
                self.points[i],
                self.points[i + 1],
            )?);
        }
        if self.close {
            let last = vertices.len() - 1;
            edges.push(make_segment(
                store,
                vertices[last],
                vertices[0],
                self.points[last],
                self.points[0],
            )?);
        }

        Ok(store.add_wire(WireData::new(edges, self.close)))
    }
}

fn make_segment(
    store: &mut TopologyStore,
    start: VertexId,
    end: VertexId,
    from: Point3,
    to: Point3,
) -> Result<OrientedEdge> {
    let line = Line::through(from, to)?;
    let length = (to - from).norm();
    let edge = store.add_edge(EdgeData::segment(start, end, line, length));
    Ok(OrientedEdge::forward(edge))
}
