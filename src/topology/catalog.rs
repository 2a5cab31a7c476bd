//! Entity catalog and adjacency index over a topology scope.
//!
//! A [`Catalog`] is built once per scope shape by a single depth-first
//! exploration, recording every distinct entity of every kind in
//! first-seen order. Entities reached through several parents (an edge
//! bounding two faces, a vertex shared by three edges) are folded into
//! their first occurrence, so positional indexing into the results is
//! stable and deterministic.

use std::collections::HashSet;

use log::debug;

use crate::error::{Result, TopologyError};

use super::shape::{Shape, ShapeKind};
use super::TopologyStore;

/// Deduplicating adjacency index over one scope shape.
///
/// The catalog is read-only after [`build`](Catalog::build); it holds
/// only non-owning handles and may be shared freely across threads.
/// Queries that need to re-walk the topology (`children`, `parents`)
/// take the store again so the catalog itself stays plain data.
///
/// A catalog is bound to the store it was built from. Generational keys
/// repeat across stores, so a handle from an unrelated store can alias
/// a catalog member; the catalog remembers its store's token and rejects
/// queries made against any other store with `WrongScope`.
#[derive(Debug, Clone)]
pub struct Catalog {
    scope: Shape,
    store_token: u64,
    buckets: [Vec<Shape>; 8],
    members: HashSet<Shape>,
}

impl Catalog {
    /// Explores `scope` and builds the catalog for it.
    ///
    /// The walk is depth-first from the scope shape; every entity is
    /// recorded under its kind, in first-seen order, exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidShape`] when `scope` or anything
    /// reachable from it is not present in `store`.
    pub fn build(store: &TopologyStore, scope: Shape) -> Result<Self> {
        let mut buckets: [Vec<Shape>; 8] = Default::default();
        walk(store, scope, |shape| {
            buckets[shape.kind().rank()].push(shape);
        })?;

        let members = buckets.iter().flatten().copied().collect();
        let catalog = Self {
            scope,
            store_token: store.token(),
            buckets,
            members,
        };
        debug!(
            "catalog built for {:?}: {} vertices, {} edges, {} wires, {} faces",
            scope,
            catalog.count(ShapeKind::Vertex),
            catalog.count(ShapeKind::Edge),
            catalog.count(ShapeKind::Wire),
            catalog.count(ShapeKind::Face),
        );
        Ok(catalog)
    }

    /// The scope shape this catalog was built for.
    #[must_use]
    pub fn scope(&self) -> Shape {
        self.scope
    }

    /// All distinct entities of `kind` in the scope, in first-seen order.
    #[must_use]
    pub fn entities_of(&self, kind: ShapeKind) -> &[Shape] {
        &self.buckets[kind.rank()]
    }

    /// Number of distinct entities of `kind` in the scope.
    ///
    /// Always agrees with `entities_of(kind).len()`.
    #[must_use]
    pub fn count(&self, kind: ShapeKind) -> usize {
        self.buckets[kind.rank()].len()
    }

    /// Lazy, forward-only exploration of the scope for entities of `kind`.
    ///
    /// The iterator deduplicates on the fly and cannot rewind; calling
    /// this again yields a fresh, independent pass over the scope.
    #[must_use]
    pub fn iter<'a>(&self, store: &'a TopologyStore, kind: ShapeKind) -> EntityIter<'a> {
        EntityIter::over(store, self.scope, kind)
    }

    /// Every descendant of `shape` of the given `kind`, restricted to
    /// the subgraph below `shape`, in the catalog's canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::WrongScope`] when `shape` is not part of
    /// this catalog or `store` is not the store the catalog was built
    /// from, and [`TopologyError::WrongKind`] when `kind` is not below
    /// `shape`'s own kind in the topological hierarchy.
    pub fn children(
        &self,
        store: &TopologyStore,
        shape: Shape,
        kind: ShapeKind,
    ) -> Result<Vec<Shape>> {
        self.ensure_member(store, shape)?;
        if kind.rank() >= shape.kind().rank() {
            return Err(TopologyError::WrongKind {
                requested: kind,
                actual: shape.kind(),
            }
            .into());
        }

        let below = descendants(store, shape)?;
        Ok(self
            .entities_of(kind)
            .iter()
            .copied()
            .filter(|candidate| below.contains(candidate))
            .collect())
    }

    /// Every entity of `kind` in the scope that contains `shape` as a
    /// descendant.
    ///
    /// A sub-shape does not know its ancestors, so this scans all
    /// catalogued entities of `kind` and tests containment; cost is
    /// linear in their number. No reverse index is maintained, keeping
    /// the catalog always consistent with the forward structure.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::WrongScope`] when `shape` is not part of
    /// this catalog or `store` is not the store the catalog was built
    /// from, and [`TopologyError::WrongKind`] when `kind` is not above
    /// `shape`'s own kind in the topological hierarchy.
    pub fn parents(
        &self,
        store: &TopologyStore,
        shape: Shape,
        kind: ShapeKind,
    ) -> Result<Vec<Shape>> {
        self.ensure_member(store, shape)?;
        if kind.rank() <= shape.kind().rank() {
            return Err(TopologyError::WrongKind {
                requested: kind,
                actual: shape.kind(),
            }
            .into());
        }

        let mut found = Vec::new();
        for &candidate in self.entities_of(kind) {
            if descendants(store, candidate)?.contains(&shape) {
                found.push(candidate);
            }
        }
        Ok(found)
    }

    /// Number of descendants of `shape` at `kind`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`children`](Catalog::children).
    pub fn count_children(
        &self,
        store: &TopologyStore,
        shape: Shape,
        kind: ShapeKind,
    ) -> Result<usize> {
        Ok(self.children(store, shape, kind)?.len())
    }

    /// Number of entities of `kind` containing `shape`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`parents`](Catalog::parents).
    pub fn count_parents(
        &self,
        store: &TopologyStore,
        shape: Shape,
        kind: ShapeKind,
    ) -> Result<usize> {
        Ok(self.parents(store, shape, kind)?.len())
    }

    /// A shape is in scope only when the query runs against the store
    /// this catalog was built from and the handle was recorded during
    /// the build walk. The token check comes first: an aliased handle
    /// from another store can pass the membership test.
    fn ensure_member(&self, store: &TopologyStore, shape: Shape) -> Result<()> {
        if store.token() == self.store_token && self.members.contains(&shape) {
            Ok(())
        } else {
            Err(TopologyError::WrongScope {
                shape,
                scope: self.scope,
            }
            .into())
        }
    }
}

/// Depth-first preorder walk over all entities reachable from `scope`,
/// visiting each exactly once.
fn walk(store: &TopologyStore, scope: Shape, mut visit: impl FnMut(Shape)) -> Result<()> {
    let mut stack = vec![scope];
    let mut seen = HashSet::new();
    while let Some(shape) = stack.pop() {
        if !seen.insert(shape) {
            continue;
        }
        visit(shape);
        let children = store.direct_children(shape)?;
        // reversed so the first child is popped first
        stack.extend(children.into_iter().rev());
    }
    Ok(())
}

/// Set of all entities strictly below `shape`.
fn descendants(store: &TopologyStore, shape: Shape) -> Result<HashSet<Shape>> {
    let mut set = HashSet::new();
    walk(store, shape, |s| {
        set.insert(s);
    })?;
    set.remove(&shape);
    Ok(set)
}

/// Lazy forward-only entity explorer.
///
/// Yields each distinct entity of the target kind reachable from the
/// scope, in the same order the catalog records them. Handles that can
/// no longer be resolved in the store (removed since the iterator was
/// created) are skipped.
#[derive(Debug)]
pub struct EntityIter<'a> {
    store: &'a TopologyStore,
    kind: ShapeKind,
    stack: Vec<Shape>,
    seen: HashSet<Shape>,
}

impl<'a> EntityIter<'a> {
    /// Starts a lazy exploration of `scope` for entities of `kind`.
    #[must_use]
    pub fn over(store: &'a TopologyStore, scope: Shape, kind: ShapeKind) -> Self {
        Self {
            store,
            kind,
            stack: vec![scope],
            seen: HashSet::new(),
        }
    }
}

impl Iterator for EntityIter<'_> {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        while let Some(shape) = self.stack.pop() {
            if !self.seen.insert(shape) {
                continue;
            }
            match self.store.direct_children(shape) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(err) => {
                    debug!("skipping unresolvable shape {shape:?}: {err}");
                    continue;
                }
            }
            if shape.kind() == self.kind {
                return Some(shape);
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepError;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeCompound, MakeSphere};
    use crate::topology::CompoundData;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn box_catalog() -> (TopologyStore, Catalog) {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(10.0, 10.0, 10.0))
            .execute(&mut store)
            .unwrap();
        let catalog = Catalog::build(&store, Shape::Solid(solid)).unwrap();
        (store, catalog)
    }

    #[test]
    fn box_entity_counts() {
        let (_, catalog) = box_catalog();
        assert_eq!(catalog.count(ShapeKind::Vertex), 8);
        assert_eq!(catalog.count(ShapeKind::Edge), 12);
        assert_eq!(catalog.count(ShapeKind::Wire), 6);
        assert_eq!(catalog.count(ShapeKind::Face), 6);
        assert_eq!(catalog.count(ShapeKind::Shell), 1);
        assert_eq!(catalog.count(ShapeKind::Solid), 1);
        assert_eq!(catalog.count(ShapeKind::CompSolid), 0);
        assert_eq!(catalog.count(ShapeKind::Compound), 0);
    }

    #[test]
    fn counts_agree_with_sequences_and_entries_are_unique() {
        let (_, catalog) = box_catalog();
        for kind in ShapeKind::ALL {
            let entities = catalog.entities_of(kind);
            assert_eq!(entities.len(), catalog.count(kind));
            let unique: HashSet<Shape> = entities.iter().copied().collect();
            assert_eq!(unique.len(), entities.len(), "duplicate {kind} entries");
        }
    }

    #[test]
    fn children_of_a_face() {
        let (store, catalog) = box_catalog();
        let face = catalog.entities_of(ShapeKind::Face)[0];
        assert_eq!(catalog.children(&store, face, ShapeKind::Wire).unwrap().len(), 1);
        assert_eq!(catalog.children(&store, face, ShapeKind::Edge).unwrap().len(), 4);
        assert_eq!(
            catalog.children(&store, face, ShapeKind::Vertex).unwrap().len(),
            4
        );
    }

    #[test]
    fn parents_of_shared_entities() {
        let (store, catalog) = box_catalog();
        // in a box, every edge bounds exactly two faces
        for &edge in catalog.entities_of(ShapeKind::Edge) {
            assert_eq!(catalog.count_parents(&store, edge, ShapeKind::Face).unwrap(), 2);
        }
        // and every vertex is incident to exactly three edges and three faces
        for &vertex in catalog.entities_of(ShapeKind::Vertex) {
            assert_eq!(catalog.count_parents(&store, vertex, ShapeKind::Edge).unwrap(), 3);
            assert_eq!(catalog.count_parents(&store, vertex, ShapeKind::Face).unwrap(), 3);
        }
    }

    #[test]
    fn parents_and_children_are_inverse_consistent() {
        let (store, catalog) = box_catalog();
        for &edge in catalog.entities_of(ShapeKind::Edge) {
            for face in catalog.parents(&store, edge, ShapeKind::Face).unwrap() {
                let edges = catalog.children(&store, face, ShapeKind::Edge).unwrap();
                assert!(edges.contains(&edge));
            }
        }
    }

    #[test]
    fn children_follow_canonical_order() {
        let (store, catalog) = box_catalog();
        let solid = catalog.entities_of(ShapeKind::Solid)[0];
        let all_edges = catalog.entities_of(ShapeKind::Edge).to_vec();
        let solid_edges = catalog.children(&store, solid, ShapeKind::Edge).unwrap();
        assert_eq!(solid_edges, all_edges);
    }

    #[test]
    fn lazy_iteration_matches_materialized_results() {
        let (store, catalog) = box_catalog();
        let lazy: Vec<Shape> = catalog.iter(&store, ShapeKind::Edge).collect();
        assert_eq!(lazy, catalog.entities_of(ShapeKind::Edge));

        // a second pass is independent and exhausts again
        let again: Vec<Shape> = catalog.iter(&store, ShapeKind::Edge).collect();
        assert_eq!(again, lazy);
    }

    #[test]
    fn out_of_scope_shape_is_rejected() {
        let (mut store, catalog) = box_catalog();
        // lives in the same store, but not under the catalog's scope
        let outsider = MakeSphere::new(p(50.0, 0.0, 0.0), 1.0)
            .execute(&mut store)
            .unwrap();

        let result = catalog.children(&store, Shape::Solid(outsider), ShapeKind::Face);
        assert!(matches!(
            result,
            Err(BrepError::Topology(TopologyError::WrongScope { .. }))
        ));
    }

    #[test]
    fn queries_against_another_store_are_rejected() {
        let (_, catalog) = box_catalog();
        let mut other_store = TopologyStore::new();
        let other = MakeSphere::new(p(0.0, 0.0, 0.0), 1.0)
            .execute(&mut other_store)
            .unwrap();

        // the foreign solid's generational key collides with the catalog's
        // own solid, so only the store identity can tell them apart
        let aliased = catalog.entities_of(ShapeKind::Solid)[0];
        assert_eq!(Shape::Solid(other), aliased);

        let result = catalog.children(&other_store, Shape::Solid(other), ShapeKind::Face);
        assert!(matches!(
            result,
            Err(BrepError::Topology(TopologyError::WrongScope { .. }))
        ));
        let result = catalog.parents(&other_store, aliased, ShapeKind::Compound);
        assert!(matches!(
            result,
            Err(BrepError::Topology(TopologyError::WrongScope { .. }))
        ));
    }

    #[test]
    fn kind_mismatch_is_rejected_in_both_directions() {
        let (store, catalog) = box_catalog();
        let edge = catalog.entities_of(ShapeKind::Edge)[0];
        let face = catalog.entities_of(ShapeKind::Face)[0];

        assert!(matches!(
            catalog.children(&store, edge, ShapeKind::Face),
            Err(BrepError::Topology(TopologyError::WrongKind { .. }))
        ));
        assert!(matches!(
            catalog.parents(&store, face, ShapeKind::Edge),
            Err(BrepError::Topology(TopologyError::WrongKind { .. }))
        ));
    }

    #[test]
    fn stale_scope_fails_with_invalid_shape() {
        let mut store_a = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))
            .execute(&mut store_a)
            .unwrap();

        let store_b = TopologyStore::new();
        let result = Catalog::build(&store_b, Shape::Solid(solid));
        assert!(matches!(
            result,
            Err(BrepError::Topology(TopologyError::InvalidShape(_)))
        ));
    }

    #[test]
    fn empty_compound_scope_yields_empty_sequences() {
        let mut store = TopologyStore::new();
        let compound = store.add_compound(CompoundData { children: vec![] });
        let catalog = Catalog::build(&store, Shape::Compound(compound)).unwrap();

        assert_eq!(catalog.count(ShapeKind::Compound), 1);
        for kind in ShapeKind::ALL {
            if kind != ShapeKind::Compound {
                assert_eq!(catalog.count(kind), 0);
            }
        }
    }

    #[test]
    fn mixed_compound_scope_collects_across_kinds() {
        let mut store = TopologyStore::new();
        let box_solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let sphere_solid = MakeSphere::new(p(5.0, 0.0, 0.0), 1.0)
            .execute(&mut store)
            .unwrap();
        let compound = MakeCompound::new(vec![
            Shape::Solid(box_solid),
            Shape::Solid(sphere_solid),
        ])
        .execute(&mut store)
        .unwrap();

        let catalog = Catalog::build(&store, Shape::Compound(compound)).unwrap();
        assert_eq!(catalog.count(ShapeKind::Solid), 2);
        assert_eq!(catalog.count(ShapeKind::Face), 7);
        assert_eq!(catalog.count(ShapeKind::Vertex), 9);
    }
}
