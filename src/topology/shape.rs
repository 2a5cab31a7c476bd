use std::fmt;

use super::compound::{CompSolidId, CompoundId};
use super::edge::EdgeId;
use super::face::FaceId;
use super::shell::ShellId;
use super::solid::SolidId;
use super::vertex::VertexId;
use super::wire::WireId;

/// The eight topological entity kinds, ordered by rank.
///
/// Rank follows topological dimension (vertex 0 … solid) with the
/// aggregate kinds on top; parent/child queries are only defined
/// between a lower-ranked and a higher-ranked kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    CompSolid,
    Compound,
}

impl ShapeKind {
    /// All kinds in ascending rank order.
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Vertex,
        ShapeKind::Edge,
        ShapeKind::Wire,
        ShapeKind::Face,
        ShapeKind::Shell,
        ShapeKind::Solid,
        ShapeKind::CompSolid,
        ShapeKind::Compound,
    ];

    /// Rank of the kind in the topological hierarchy, 0 (vertex) to 7 (compound).
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Vertex => "vertex",
            ShapeKind::Edge => "edge",
            ShapeKind::Wire => "wire",
            ShapeKind::Face => "face",
            ShapeKind::Shell => "shell",
            ShapeKind::Solid => "solid",
            ShapeKind::CompSolid => "comp-solid",
            ShapeKind::Compound => "compound",
        };
        f.write_str(name)
    }
}

/// A typed reference to any topological entity.
///
/// Shapes are cheap copyable handles; the entity data lives in the
/// [`TopologyStore`](super::TopologyStore) arena. Two shapes denote the
/// same entity exactly when they are equal: sub-entities are shared by
/// id, never duplicated, so id equality is structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Vertex(VertexId),
    Edge(EdgeId),
    Wire(WireId),
    Face(FaceId),
    Shell(ShellId),
    Solid(SolidId),
    CompSolid(CompSolidId),
    Compound(CompoundId),
}

impl Shape {
    /// Returns the kind discriminant of this shape.
    #[must_use]
    pub fn kind(self) -> ShapeKind {
        match self {
            Shape::Vertex(_) => ShapeKind::Vertex,
            Shape::Edge(_) => ShapeKind::Edge,
            Shape::Wire(_) => ShapeKind::Wire,
            Shape::Face(_) => ShapeKind::Face,
            Shape::Shell(_) => ShapeKind::Shell,
            Shape::Solid(_) => ShapeKind::Solid,
            Shape::CompSolid(_) => ShapeKind::CompSolid,
            Shape::Compound(_) => ShapeKind::Compound,
        }
    }

    /// The vertex id, if this shape is a vertex.
    #[must_use]
    pub fn as_vertex(self) -> Option<VertexId> {
        match self {
            Shape::Vertex(id) => Some(id),
            _ => None,
        }
    }

    /// The edge id, if this shape is an edge.
    #[must_use]
    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            Shape::Edge(id) => Some(id),
            _ => None,
        }
    }

    /// The wire id, if this shape is a wire.
    #[must_use]
    pub fn as_wire(self) -> Option<WireId> {
        match self {
            Shape::Wire(id) => Some(id),
            _ => None,
        }
    }

    /// The face id, if this shape is a face.
    #[must_use]
    pub fn as_face(self) -> Option<FaceId> {
        match self {
            Shape::Face(id) => Some(id),
            _ => None,
        }
    }
}

impl From<VertexId> for Shape {
    fn from(id: VertexId) -> Self {
        Shape::Vertex(id)
    }
}

impl From<EdgeId> for Shape {
    fn from(id: EdgeId) -> Self {
        Shape::Edge(id)
    }
}

impl From<WireId> for Shape {
    fn from(id: WireId) -> Self {
        Shape::Wire(id)
    }
}

impl From<FaceId> for Shape {
    fn from(id: FaceId) -> Self {
        Shape::Face(id)
    }
}

impl From<ShellId> for Shape {
    fn from(id: ShellId) -> Self {
        Shape::Shell(id)
    }
}

impl From<SolidId> for Shape {
    fn from(id: SolidId) -> Self {
        Shape::Solid(id)
    }
}

impl From<CompSolidId> for Shape {
    fn from(id: CompSolidId) -> Self {
        Shape::CompSolid(id)
    }
}

impl From<CompoundId> for Shape {
    fn from(id: CompoundId) -> Self {
        Shape::Compound(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_ranked_bottom_up() {
        assert!(ShapeKind::Vertex < ShapeKind::Edge);
        assert!(ShapeKind::Face < ShapeKind::Shell);
        assert!(ShapeKind::Solid < ShapeKind::CompSolid);
        assert_eq!(ShapeKind::Vertex.rank(), 0);
        assert_eq!(ShapeKind::Compound.rank(), 7);
    }
}
