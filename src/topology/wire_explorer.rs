//! Ordered traversal of a wire's boundary cycle.
//!
//! A wire stores its edges in whatever order the builder produced;
//! this walker re-chains them so that consecutive edges share an
//! endpoint consistent with each edge's orientation flag, yielding
//! the directed boundary cycle of the wire.

use crate::error::{Result, TopologyError};

use super::wire::{OrientedEdge, WireId};
use super::{TopologyStore, VertexId};

/// Walks a single wire, producing its edges and vertices in traversal order.
#[derive(Debug)]
pub struct WireExplorer<'a> {
    store: &'a TopologyStore,
    wire: WireId,
}

impl<'a> WireExplorer<'a> {
    /// Creates a walker for the given wire.
    #[must_use]
    pub fn new(store: &'a TopologyStore, wire: WireId) -> Self {
        Self { store, wire }
    }

    /// The wire's edges in traversal order.
    ///
    /// Starting from an arbitrary edge, the walker repeatedly appends the
    /// unvisited edge whose resolved start vertex matches the current
    /// edge's resolved end vertex; for open wires it then extends backward
    /// from the head the same way, so the result is the full path no
    /// matter which edge the walk happened to start on.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedWire`] when a vertex is shared by
    /// more than two wire edges, or when the continuation is ambiguous.
    pub fn ordered_edges(&self) -> Result<Vec<OrientedEdge>> {
        let chain = self.chain()?;
        Ok(chain.into_iter().map(|link| link.oriented).collect())
    }

    /// The wire's vertices in traversal order, index-aligned with
    /// [`ordered_edges`](WireExplorer::ordered_edges): vertex `i` is the
    /// resolved start of edge `i`. Open wires additionally carry the
    /// terminal vertex, so N edges yield N+1 vertices; a closed wire of N
    /// edges yields exactly N.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ordered_edges`](WireExplorer::ordered_edges).
    pub fn ordered_vertices(&self) -> Result<Vec<VertexId>> {
        let chain = self.chain()?;
        let mut vertices: Vec<VertexId> = chain.iter().map(|link| link.start).collect();
        if let (Some(first), Some(last)) = (chain.first(), chain.last()) {
            if last.end != first.start {
                vertices.push(last.end);
            }
        }
        Ok(vertices)
    }

    fn chain(&self) -> Result<Vec<Link>> {
        let data = self.store.wire(self.wire)?;
        let mut links = Vec::with_capacity(data.edges.len());
        for oriented in &data.edges {
            let edge = self.store.edge(oriented.edge)?;
            let (start, end) = if oriented.forward {
                (edge.start, edge.end)
            } else {
                (edge.end, edge.start)
            };
            links.push(Link {
                oriented: *oriented,
                start,
                end,
            });
        }

        if links.is_empty() {
            return Ok(links);
        }
        self.check_incidence(&links)?;

        let mut visited = vec![false; links.len()];
        visited[0] = true;
        let mut ordered = vec![links[0]];

        // forward: append edges continuing from the current tail
        loop {
            let tail = ordered[ordered.len() - 1].end;
            let head = ordered[0].start;
            if tail == head {
                break; // cycle closed
            }
            match self.next_unvisited(&links, &visited, |link| link.start == tail)? {
                Some(idx) => {
                    visited[idx] = true;
                    ordered.push(links[idx]);
                }
                None => break, // open wire, forward end reached
            }
        }

        // backward: prepend edges leading into the current head, in case
        // the walk started mid-path of an open wire
        loop {
            let head = ordered[0].start;
            let tail = ordered[ordered.len() - 1].end;
            if tail == head {
                break;
            }
            match self.next_unvisited(&links, &visited, |link| link.end == head)? {
                Some(idx) => {
                    visited[idx] = true;
                    ordered.insert(0, links[idx]);
                }
                None => break,
            }
        }

        if ordered.len() != links.len() {
            return Err(TopologyError::MalformedWire {
                wire: self.wire,
                detail: "edges do not form a single connected path".into(),
            }
            .into());
        }
        Ok(ordered)
    }

    /// Finds the unique unvisited edge matched by `predicate`.
    fn next_unvisited(
        &self,
        links: &[Link],
        visited: &[bool],
        predicate: impl Fn(&Link) -> bool,
    ) -> Result<Option<usize>> {
        let mut found = None;
        for (idx, link) in links.iter().enumerate() {
            if visited[idx] || !predicate(link) {
                continue;
            }
            if found.is_some() {
                return Err(TopologyError::MalformedWire {
                    wire: self.wire,
                    detail: "ambiguous continuation: vertex shared by more than two edges".into(),
                }
                .into());
            }
            found = Some(idx);
        }
        Ok(found)
    }

    /// Rejects wires where a vertex is incident to more than two edges.
    fn check_incidence(&self, links: &[Link]) -> Result<()> {
        let mut counts: std::collections::HashMap<VertexId, usize> =
            std::collections::HashMap::new();
        for link in links {
            *counts.entry(link.start).or_insert(0) += 1;
            if link.end != link.start {
                *counts.entry(link.end).or_insert(0) += 1;
            }
        }
        if counts.values().any(|&n| n > 2) {
            return Err(TopologyError::MalformedWire {
                wire: self.wire,
                detail: "vertex shared by more than two wire edges".into(),
            }
            .into());
        }
        Ok(())
    }
}

/// One wire edge with its orientation-resolved endpoints.
#[derive(Debug, Clone, Copy)]
struct Link {
    oriented: OrientedEdge,
    start: VertexId,
    end: VertexId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepError;
    use crate::geometry::curve::Line;
    use crate::math::Point3;
    use crate::operations::creation::MakeWire;
    use crate::topology::{EdgeData, WireData};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square_points() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(20.0, 0.0, 0.0),
            p(20.0, 20.0, 0.0),
            p(0.0, 20.0, 0.0),
        ]
    }

    #[test]
    fn closed_wire_yields_n_edges_and_n_vertices() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(square_points(), true)
            .execute(&mut store)
            .unwrap();

        let explorer = WireExplorer::new(&store, wire);
        let edges = explorer.ordered_edges().unwrap();
        let vertices = explorer.ordered_vertices().unwrap();
        assert_eq!(edges.len(), 4);
        assert_eq!(vertices.len(), 4);

        // consecutive edges share exactly one endpoint
        for i in 0..edges.len() {
            let a = store.edge(edges[i].edge).unwrap();
            let b = store.edge(edges[(i + 1) % edges.len()].edge).unwrap();
            let ends_a = [a.start, a.end];
            let shared = [b.start, b.end]
                .iter()
                .filter(|v| ends_a.contains(v))
                .count();
            assert_eq!(shared, 1);
        }
    }

    #[test]
    fn open_wire_carries_terminal_vertex() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(20.0, 0.0, 0.0), p(20.0, 20.0, 0.0)],
            false,
        )
        .execute(&mut store)
        .unwrap();

        let explorer = WireExplorer::new(&store, wire);
        assert_eq!(explorer.ordered_edges().unwrap().len(), 2);
        assert_eq!(explorer.ordered_vertices().unwrap().len(), 3);
    }

    #[test]
    fn shuffled_storage_order_is_rechained() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(square_points(), true)
            .execute(&mut store)
            .unwrap();

        // rebuild a wire with the same edges listed out of order
        let mut edges = store.wire(wire).unwrap().edges.clone();
        edges.swap(0, 2);
        edges.swap(1, 3);
        let shuffled = store.add_wire(WireData::new(edges, true));

        let explorer = WireExplorer::new(&store, shuffled);
        let ordered = explorer.ordered_edges().unwrap();
        assert_eq!(ordered.len(), 4);
        for pair in ordered.windows(2) {
            let a = store.edge(pair[0].edge).unwrap();
            let b = store.edge(pair[1].edge).unwrap();
            let a_end = if pair[0].forward { a.end } else { a.start };
            let b_start = if pair[1].forward { b.start } else { b.end };
            assert_eq!(a_end, b_start);
        }
    }

    #[test]
    fn reversed_edge_orientation_is_respected() {
        let mut store = TopologyStore::new();
        let a = store.add_point_vertex(p(0.0, 0.0, 0.0));
        let b = store.add_point_vertex(p(1.0, 0.0, 0.0));
        let c = store.add_point_vertex(p(2.0, 0.0, 0.0));
        let line_ab = Line::through(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        // second edge stored end-to-start, flagged reversed in the wire
        let line_cb = Line::through(p(2.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let e1 = store.add_edge(EdgeData::segment(a, b, line_ab, 1.0));
        let e2 = store.add_edge(EdgeData::segment(c, b, line_cb, 1.0));
        let wire = store.add_wire(WireData::new(
            vec![OrientedEdge::forward(e1), OrientedEdge::reversed(e2)],
            false,
        ));

        let vertices = WireExplorer::new(&store, wire).ordered_vertices().unwrap();
        assert_eq!(vertices, vec![a, b, c]);
    }

    #[test]
    fn branching_wire_is_malformed() {
        let mut store = TopologyStore::new();
        let hub = store.add_point_vertex(p(0.0, 0.0, 0.0));
        let tips = [
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        let mut edges = Vec::new();
        for tip in tips {
            let v = store.add_point_vertex(tip);
            let line = Line::through(p(0.0, 0.0, 0.0), tip).unwrap();
            let e = store.add_edge(EdgeData::segment(hub, v, line, 1.0));
            edges.push(OrientedEdge::forward(e));
        }
        let wire = store.add_wire(WireData::new(edges, false));

        let result = WireExplorer::new(&store, wire).ordered_edges();
        assert!(matches!(
            result,
            Err(BrepError::Topology(TopologyError::MalformedWire { .. }))
        ));
    }

    #[test]
    fn single_seam_edge_closes_immediately() {
        let mut store = TopologyStore::new();
        let solid = crate::operations::creation::MakeSphere::new(p(0.0, 0.0, 0.0), 2.0)
            .execute(&mut store)
            .unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        let face = store.shell(shell).unwrap().faces[0];
        let wire = store.face(face).unwrap().outer_wire;

        let explorer = WireExplorer::new(&store, wire);
        assert_eq!(explorer.ordered_edges().unwrap().len(), 1);
        assert_eq!(explorer.ordered_vertices().unwrap().len(), 1);
    }
}
