use crate::error::{Result, TopologyError};
use crate::topology::{
    CompSolidData, CompSolidId, CompoundData, CompoundId, Shape, SolidId, TopologyStore,
};

/// Creates a compound grouping arbitrary shapes.
pub struct MakeCompound {
    children: Vec<Shape>,
}

impl MakeCompound {
    /// Creates a new `MakeCompound` operation.
    #[must_use]
    pub fn new(children: Vec<Shape>) -> Self {
        Self { children }
    }

    /// Executes the operation, creating the compound in the topology store.
    ///
    /// An empty compound is valid; it catalogs as a scope with no entities.
    ///
    /// # Errors
    ///
    /// Returns an error if any child handle is not present in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CompoundId> {
        for &child in &self.children {
            if !store.contains(child) {
                return Err(TopologyError::InvalidShape(child).into());
            }
        }
        Ok(store.add_compound(CompoundData {
            children: self.children.clone(),
        }))
    }
}

/// Creates a composite solid from member solids.
pub struct MakeCompSolid {
    solids: Vec<SolidId>,
}

impl MakeCompSolid {
    /// Creates a new `MakeCompSolid` operation.
    #[must_use]
    pub fn new(solids: Vec<SolidId>) -> Self {
        Self { solids }
    }

    /// Executes the operation, creating the comp-solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if any member solid is not present in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CompSolidId> {
        for &solid in &self.solids {
            if !store.contains(Shape::Solid(solid)) {
                return Err(TopologyError::InvalidShape(Shape::Solid(solid)).into());
            }
        }
        Ok(store.add_comp_solid(CompSolidData {
            solids: self.solids.clone(),
        }))
    }
}
