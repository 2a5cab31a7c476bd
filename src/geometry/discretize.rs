//! Chordal sampling of edge curves into polylines.
//!
//! Bounding-box estimation and planar sections both reduce curved
//! boundaries to point sets; this module is the single place where
//! that reduction happens.

use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::Point3;
use crate::topology::{EdgeCurve, EdgeId, TopologyStore};

/// Angular step used when sampling circular arcs, in radians.
const ARC_ANGULAR_STEP: f64 = std::f64::consts::PI / 64.0;

/// Samples a single edge into an ordered polyline, start to end.
///
/// Lines contribute their two endpoints; arcs are sampled at a fixed
/// angular step so that seam circles and fillet rims contribute their
/// full sweep, not just their (possibly coincident) end vertices.
///
/// # Errors
///
/// Returns an error if the edge is not present in the store.
pub fn edge_points(store: &TopologyStore, edge: EdgeId) -> Result<Vec<Point3>> {
    let data = store.edge(edge)?;
    let points = match &data.curve {
        EdgeCurve::Line(line) => {
            vec![line.evaluate(data.t_start), line.evaluate(data.t_end)]
        }
        EdgeCurve::Arc(arc) => {
            let sweep = (data.t_end - data.t_start).abs();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let segments = ((sweep / ARC_ANGULAR_STEP).ceil() as usize).max(1);
            #[allow(clippy::cast_precision_loss)]
            (0..=segments)
                .map(|i| {
                    let t = data.t_start
                        + (data.t_end - data.t_start) * (i as f64) / (segments as f64);
                    arc.evaluate(t)
                })
                .collect()
        }
    };
    Ok(points)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::{Arc, Line};
    use crate::math::Vector3;
    use crate::topology::EdgeData;

    #[test]
    fn line_edge_yields_endpoints() {
        let mut store = TopologyStore::new();
        let a = store.add_point_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = store.add_point_vertex(Point3::new(3.0, 0.0, 0.0));
        let line = Line::through(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)).unwrap();
        let edge = store.add_edge(EdgeData {
            start: a,
            end: b,
            curve: EdgeCurve::Line(line),
            t_start: 0.0,
            t_end: 3.0,
        });

        let points = edge_points(&store, edge).unwrap();
        assert_eq!(points.len(), 2);
        assert!((points[1].x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn full_circle_is_densely_sampled() {
        let mut store = TopologyStore::new();
        let seam = store.add_point_vertex(Point3::new(2.0, 0.0, 0.0));
        let circle = Arc::full_circle(
            Point3::origin(),
            2.0,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        let edge = store.add_edge(EdgeData {
            start: seam,
            end: seam,
            curve: EdgeCurve::Arc(circle),
            t_start: 0.0,
            t_end: std::f64::consts::TAU,
        });

        let points = edge_points(&store, edge).unwrap();
        assert!(points.len() > 64);
        // every sample sits on the circle
        for p in points {
            assert!((p.coords.norm() - 2.0).abs() < 1e-9);
        }
    }
}
