pub mod catalog;
pub mod compound;
pub mod edge;
pub mod face;
pub mod shape;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;
pub mod wire_explorer;

pub use catalog::{Catalog, EntityIter};
pub use compound::{CompSolidData, CompSolidId, CompoundData, CompoundId};
pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use face::{FaceData, FaceId, FaceSurface};
pub use shape::{Shape, ShapeKind};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};
pub use wire_explorer::WireExplorer;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

static NEXT_STORE_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
/// Because every sub-entity is stored once and referenced by id from
/// all of its parents, id equality is the structural-equality predicate
/// the catalog deduplicates with.
///
/// Ids are only meaningful within the store that issued them; the first
/// solid of two independent stores gets the same generational key. Each
/// store therefore carries a process-unique token, which consumers like
/// [`Catalog`] use to refuse handles resolved against the wrong store.
#[derive(Debug)]
pub struct TopologyStore {
    token: u64,
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
    comp_solids: SlotMap<CompSolidId, CompSolidData>,
    compounds: SlotMap<CompoundId, CompoundData>,
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: NEXT_STORE_TOKEN.fetch_add(1, Ordering::Relaxed),
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            wires: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            shells: SlotMap::with_key(),
            solids: SlotMap::with_key(),
            comp_solids: SlotMap::with_key(),
            compounds: SlotMap::with_key(),
        }
    }

    /// Process-unique identity of this store.
    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Inserts a vertex at the given point and returns its ID.
    pub fn add_point_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Shell operations ---

    /// Inserts a shell and returns its ID.
    pub fn add_shell(&mut self, data: ShellData) -> ShellId {
        self.shells.insert(data)
    }

    /// Returns a reference to the shell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shell(&self, id: ShellId) -> Result<&ShellData, TopologyError> {
        self.shells
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    // --- Aggregate operations ---

    /// Inserts a composite solid and returns its ID.
    pub fn add_comp_solid(&mut self, data: CompSolidData) -> CompSolidId {
        self.comp_solids.insert(data)
    }

    /// Returns a reference to the comp-solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn comp_solid(&self, id: CompSolidId) -> Result<&CompSolidData, TopologyError> {
        self.comp_solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("comp-solid".into()))
    }

    /// Inserts a compound and returns its ID.
    pub fn add_compound(&mut self, data: CompoundData) -> CompoundId {
        self.compounds.insert(data)
    }

    /// Returns a reference to the compound data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn compound(&self, id: CompoundId) -> Result<&CompoundData, TopologyError> {
        self.compounds
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("compound".into()))
    }

    // --- Generic shape operations ---

    /// Returns whether a shape handle refers to an entity in this store.
    #[must_use]
    pub fn contains(&self, shape: Shape) -> bool {
        match shape {
            Shape::Vertex(id) => self.vertices.contains_key(id),
            Shape::Edge(id) => self.edges.contains_key(id),
            Shape::Wire(id) => self.wires.contains_key(id),
            Shape::Face(id) => self.faces.contains_key(id),
            Shape::Shell(id) => self.shells.contains_key(id),
            Shape::Solid(id) => self.solids.contains_key(id),
            Shape::CompSolid(id) => self.comp_solids.contains_key(id),
            Shape::Compound(id) => self.compounds.contains_key(id),
        }
    }

    /// Returns the direct topological children of a shape, in stored order.
    ///
    /// Vertices have no children; a compound's children may be of any kind.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidShape`] when the handle does not
    /// refer to an entity of this store.
    pub fn direct_children(&self, shape: Shape) -> Result<Vec<Shape>, TopologyError> {
        let not_found = |_| TopologyError::InvalidShape(shape);
        let children = match shape {
            Shape::Vertex(id) => {
                self.vertex(id).map_err(not_found)?;
                Vec::new()
            }
            Shape::Edge(id) => {
                let edge = self.edge(id).map_err(not_found)?;
                vec![Shape::Vertex(edge.start), Shape::Vertex(edge.end)]
            }
            Shape::Wire(id) => {
                let wire = self.wire(id).map_err(not_found)?;
                wire.edges.iter().map(|oe| Shape::Edge(oe.edge)).collect()
            }
            Shape::Face(id) => {
                let face = self.face(id).map_err(not_found)?;
                std::iter::once(face.outer_wire)
                    .chain(face.inner_wires.iter().copied())
                    .map(Shape::Wire)
                    .collect()
            }
            Shape::Shell(id) => {
                let shell = self.shell(id).map_err(not_found)?;
                shell.faces.iter().copied().map(Shape::Face).collect()
            }
            Shape::Solid(id) => {
                let solid = self.solid(id).map_err(not_found)?;
                std::iter::once(solid.outer_shell)
                    .chain(solid.inner_shells.iter().copied())
                    .map(Shape::Shell)
                    .collect()
            }
            Shape::CompSolid(id) => {
                let cs = self.comp_solid(id).map_err(not_found)?;
                cs.solids.iter().copied().map(Shape::Solid).collect()
            }
            Shape::Compound(id) => {
                let compound = self.compound(id).map_err(not_found)?;
                compound.children.clone()
            }
        };
        Ok(children)
    }
}
