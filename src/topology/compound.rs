use super::shape::Shape;
use super::solid::SolidId;

slotmap::new_key_type! {
    /// Unique identifier for a composite solid in the topology store.
    pub struct CompSolidId;
}

slotmap::new_key_type! {
    /// Unique identifier for a compound in the topology store.
    pub struct CompoundId;
}

/// Data associated with a composite solid.
///
/// A comp-solid groups solids that share faces, forming a single
/// connected volume assembly.
#[derive(Debug, Clone)]
pub struct CompSolidData {
    /// The member solids.
    pub solids: Vec<SolidId>,
}

/// Data associated with a compound.
///
/// A compound is the catch-all aggregate: its children may be of any
/// kind, including other compounds.
#[derive(Debug, Clone)]
pub struct CompoundData {
    /// The member shapes, in insertion order.
    pub children: Vec<Shape>,
}
