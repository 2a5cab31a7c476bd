use std::fmt;

use log::{debug, trace};

use crate::error::{AnalysisError, Result};
use crate::geometry::discretize;
use crate::math::{midpoint, Point3, DEFAULT_GAP};
use crate::operations::boolean::PlaneCommon;
use crate::operations::creation::MakeFace;
use crate::topology::{Catalog, FaceId, FaceSurface, Shape, ShapeKind, TopologyStore};

/// Default plane-sweep step for [`RefineBoundingBox`].
const DEFAULT_INCREMENT: f64 = 0.01;

/// How far probe face corners extend past the cross-axis extents.
const PROBE_MARGIN: f64 = 1.0;

/// A coordinate axis of the model space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// Which bound of an axis a probe refines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Min,
    Max,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// An axis-aligned bounding box with a record of the tolerance that
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    /// The gap or sweep increment the bounds were computed with.
    pub tolerance: f64,
}

impl BoundingBox {
    /// Extent along the x axis.
    #[must_use]
    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the y axis.
    #[must_use]
    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Extent along the z axis.
    #[must_use]
    pub fn z_span(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Extent along the given axis.
    #[must_use]
    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_span(),
            Axis::Y => self.y_span(),
            Axis::Z => self.z_span(),
        }
    }

    /// The largest of the three spans.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.x_span().max(self.y_span()).max(self.z_span())
    }

    /// The smallest of the three spans.
    #[must_use]
    pub fn min_dimension(&self) -> f64 {
        self.x_span().min(self.y_span()).min(self.z_span())
    }

    /// Ratio of the largest span to the smallest.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.max_dimension() / self.min_dimension()
    }

    /// Geometric centre of the box.
    #[must_use]
    pub fn centre(&self) -> Point3 {
        midpoint(
            &Point3::new(self.x_min, self.y_min, self.z_min),
            &Point3::new(self.x_max, self.y_max, self.z_max),
        )
    }

    /// The bound refined by a probe on the given axis and side.
    #[must_use]
    pub fn bound(&self, axis: Axis, side: Side) -> f64 {
        match (axis, side) {
            (Axis::X, Side::Min) => self.x_min,
            (Axis::X, Side::Max) => self.x_max,
            (Axis::Y, Side::Min) => self.y_min,
            (Axis::Y, Side::Max) => self.y_max,
            (Axis::Z, Side::Min) => self.z_min,
            (Axis::Z, Side::Max) => self.z_max,
        }
    }

    /// The six bounds as `(x_min, y_min, z_min, x_max, y_max, z_max)`.
    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.x_min, self.y_min, self.z_min, self.x_max, self.y_max, self.z_max,
        )
    }
}

/// Computes a conservative axis-aligned bounding box of a shape.
///
/// The box encloses every vertex and every sampled edge point of the
/// shape, inflated on all sides by a gap so that the true shape is
/// strictly inside. Spherical faces contribute their full extent
/// analytically rather than through boundary samples.
pub struct ApproxBoundingBox {
    shape: Shape,
    gap: f64,
}

impl ApproxBoundingBox {
    /// Creates a new `ApproxBoundingBox` query with the default gap.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            gap: DEFAULT_GAP,
        }
    }

    /// Overrides the inflation gap.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyShape`] if the shape contains no
    /// geometry to bound, or a topology error if `shape` holds handles
    /// not present in the store.
    pub fn execute(&self, store: &TopologyStore) -> Result<BoundingBox> {
        let catalog = Catalog::build(store, self.shape)?;

        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut include = |p: Point3| {
            min = min.inf(&p);
            max = max.sup(&p);
        };

        for &vertex in catalog.entities_of(ShapeKind::Vertex) {
            if let Some(id) = vertex.as_vertex() {
                include(store.vertex(id)?.point);
            }
        }
        for &edge in catalog.entities_of(ShapeKind::Edge) {
            if let Some(id) = edge.as_edge() {
                for point in discretize::edge_points(store, id)? {
                    include(point);
                }
            }
        }
        for &face in catalog.entities_of(ShapeKind::Face) {
            if let Some(id) = face.as_face() {
                if let FaceSurface::Sphere(sphere) = &store.face(id)?.surface {
                    let r = sphere.radius();
                    let c = sphere.center();
                    include(Point3::new(c.x - r, c.y - r, c.z - r));
                    include(Point3::new(c.x + r, c.y + r, c.z + r));
                }
            }
        }

        if !min.x.is_finite() {
            return Err(AnalysisError::EmptyShape(self.shape).into());
        }

        Ok(BoundingBox {
            x_min: min.x - self.gap,
            x_max: max.x + self.gap,
            y_min: min.y - self.gap,
            y_max: max.y + self.gap,
            z_min: min.z - self.gap,
            z_max: max.z + self.gap,
            tolerance: self.gap,
        })
    }
}

/// Tightens an approximate bounding box by plane sweeping.
///
/// Each of the six bounds is refined independently: a large planar
/// probe face starts at the approximate bound and steps towards the
/// shape in fixed increments until a [`PlaneCommon`] section first
/// yields a vertex. The refined bound is the hit position backed off
/// outwards by twice the increment, which keeps the result conservative
/// while bounding its error by `2 * increment`.
pub struct RefineBoundingBox {
    shape: Shape,
    increment: f64,
    max_travel: Option<f64>,
}

impl RefineBoundingBox {
    /// Creates a new `RefineBoundingBox` operation with the default
    /// increment.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            increment: DEFAULT_INCREMENT,
            max_travel: None,
        }
    }

    /// Overrides the sweep increment.
    #[must_use]
    pub fn with_increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self
    }

    /// Overrides how far a probe plane may travel before giving up.
    ///
    /// The default is the approximate span of the swept axis plus two
    /// increments, which always suffices for a shape that actually
    /// intersects its own approximate box.
    #[must_use]
    pub fn with_max_travel(mut self, max_travel: f64) -> Self {
        self.max_travel = Some(max_travel);
        self
    }

    /// Executes the refinement.
    ///
    /// Probe faces and their sections are materialized in the store as
    /// the sweep progresses and are left behind afterwards; callers
    /// that care should run the refinement against a scratch store.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RefinementNonConvergent`] if the
    /// increment is not strictly positive or a probe exhausts its
    /// travel without meeting the shape, and propagates any error from
    /// the underlying approximate box.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<BoundingBox> {
        if self.increment <= 0.0 {
            return Err(AnalysisError::RefinementNonConvergent(format!(
                "increment {} is not strictly positive",
                self.increment
            ))
            .into());
        }

        let approx = ApproxBoundingBox::new(self.shape).execute(store)?;
        debug!(
            "refining approximate box {:?} with increment {}",
            approx.as_tuple(),
            self.increment
        );

        let mut refined = approx;
        refined.tolerance = self.increment;
        refined.x_min = self.probe(store, &approx, Axis::X, Side::Min)?;
        refined.x_max = self.probe(store, &approx, Axis::X, Side::Max)?;
        refined.y_min = self.probe(store, &approx, Axis::Y, Side::Min)?;
        refined.y_max = self.probe(store, &approx, Axis::Y, Side::Max)?;
        refined.z_min = self.probe(store, &approx, Axis::Z, Side::Min)?;
        refined.z_max = self.probe(store, &approx, Axis::Z, Side::Max)?;
        Ok(refined)
    }

    /// Sweeps one probe plane inwards until it meets the shape.
    fn probe(
        &self,
        store: &mut TopologyStore,
        approx: &BoundingBox,
        axis: Axis,
        side: Side,
    ) -> Result<f64> {
        let direction = match side {
            Side::Min => 1.0,
            Side::Max => -1.0,
        };
        let max_travel = self
            .max_travel
            .unwrap_or(approx.span(axis) + 2.0 * self.increment);

        let mut position = approx.bound(axis, side);
        let mut travelled = 0.0;
        loop {
            let face = probe_face(store, approx, axis, position)?;
            let section = PlaneCommon::new(self.shape, face).execute(store)?;
            let hits = Catalog::build(store, section)?.count(ShapeKind::Vertex);
            trace!("{axis} {side} probe at {position}: {hits} section vertices");

            if hits >= 1 {
                // back the plane off so the bound stays conservative
                return Ok(position - direction * 2.0 * self.increment);
            }

            position += direction * self.increment;
            travelled += self.increment;
            if travelled > max_travel {
                return Err(AnalysisError::RefinementNonConvergent(format!(
                    "no section within travel {max_travel} while sweeping the {axis} {side} plane"
                ))
                .into());
            }
        }
    }
}

/// Builds a rectangular probe face perpendicular to `axis` at the given
/// coordinate, oversized past the cross-axis extents of the box.
fn probe_face(
    store: &mut TopologyStore,
    approx: &BoundingBox,
    axis: Axis,
    position: f64,
) -> Result<FaceId> {
    let corners = match axis {
        Axis::X => [
            Point3::new(position, approx.y_max + PROBE_MARGIN, approx.z_max + PROBE_MARGIN),
            Point3::new(position, approx.y_min - PROBE_MARGIN, approx.z_max + PROBE_MARGIN),
            Point3::new(position, approx.y_min - PROBE_MARGIN, approx.z_min - PROBE_MARGIN),
            Point3::new(position, approx.y_max + PROBE_MARGIN, approx.z_min - PROBE_MARGIN),
        ],
        Axis::Y => [
            Point3::new(approx.x_max + PROBE_MARGIN, position, approx.z_max + PROBE_MARGIN),
            Point3::new(approx.x_min - PROBE_MARGIN, position, approx.z_max + PROBE_MARGIN),
            Point3::new(approx.x_min - PROBE_MARGIN, position, approx.z_min - PROBE_MARGIN),
            Point3::new(approx.x_max + PROBE_MARGIN, position, approx.z_min - PROBE_MARGIN),
        ],
        Axis::Z => [
            Point3::new(approx.x_max + PROBE_MARGIN, approx.y_max + PROBE_MARGIN, position),
            Point3::new(approx.x_min - PROBE_MARGIN, approx.y_max + PROBE_MARGIN, position),
            Point3::new(approx.x_min - PROBE_MARGIN, approx.y_min - PROBE_MARGIN, position),
            Point3::new(approx.x_max + PROBE_MARGIN, approx.y_min - PROBE_MARGIN, position),
        ],
    };
    MakeFace::new(corners.to_vec()).execute(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepError;
    use crate::operations::creation::{MakeBox, MakeCompound, MakeSphere};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn box_solid(store: &mut TopologyStore) -> Shape {
        Shape::Solid(
            MakeBox::new(p(0.0, 0.0, 0.0), p(10.0, 20.0, 30.0))
                .execute(store)
                .unwrap(),
        )
    }

    #[test]
    fn approximate_box_spans_stay_within_the_gap() {
        let mut store = TopologyStore::new();
        let solid = box_solid(&mut store);
        let gap = 1e-4;

        let bb = ApproxBoundingBox::new(solid)
            .with_gap(gap)
            .execute(&store)
            .unwrap();

        for (span, dim) in [(bb.x_span(), 10.0), (bb.y_span(), 20.0), (bb.z_span(), 30.0)] {
            assert!(span >= dim);
            assert!(span <= dim + 2.001 * gap);
        }
    }

    #[test]
    fn approximate_sphere_box_covers_the_full_diameter() {
        let mut store = TopologyStore::new();
        let solid = MakeSphere::new(p(1.0, 2.0, 3.0), 10.0)
            .execute(&mut store)
            .unwrap();

        let bb = ApproxBoundingBox::new(Shape::Solid(solid))
            .execute(&store)
            .unwrap();

        assert!(bb.x_span() >= 20.0);
        assert!(bb.y_span() >= 20.0);
        assert!(bb.z_span() >= 20.0);
        assert!((bb.centre() - p(1.0, 2.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn centre_and_aspect_ratio() {
        let mut store = TopologyStore::new();
        let solid = box_solid(&mut store);

        let bb = ApproxBoundingBox::new(solid).execute(&store).unwrap();

        assert!((bb.centre() - p(5.0, 10.0, 15.0)).norm() < 1e-9);
        assert!((bb.aspect_ratio() - 3.0).abs() < 1e-3);
        assert!((bb.max_dimension() - 30.0).abs() < 1e-3);
        assert!((bb.min_dimension() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn empty_compound_has_no_bounding_box() {
        let mut store = TopologyStore::new();
        let compound = MakeCompound::new(Vec::new()).execute(&mut store).unwrap();

        let result = ApproxBoundingBox::new(Shape::Compound(compound)).execute(&store);
        assert!(matches!(
            result,
            Err(BrepError::Analysis(AnalysisError::EmptyShape(_)))
        ));
    }

    #[test]
    fn refined_box_bounds_are_conservative_and_tight() {
        for increment in [0.01, 0.001] {
            let mut store = TopologyStore::new();
            let solid = box_solid(&mut store);

            let bb = RefineBoundingBox::new(solid)
                .with_increment(increment)
                .execute(&mut store)
                .unwrap();

            let slack = 2.0 * increment;
            for (min, max, dim) in [
                (bb.x_min, bb.x_max, 10.0),
                (bb.y_min, bb.y_max, 20.0),
                (bb.z_min, bb.z_max, 30.0),
            ] {
                assert!(min <= 0.0 && min >= -slack, "min bound {min} for dim {dim}");
                assert!(max >= dim && max <= dim + slack, "max bound {max} for dim {dim}");
            }
            assert!((bb.tolerance - increment).abs() < 1e-15);
        }
    }

    #[test]
    fn refined_sphere_bounds_are_conservative_and_tight() {
        let mut store = TopologyStore::new();
        let solid = MakeSphere::new(p(0.0, 0.0, 0.0), 10.0)
            .execute(&mut store)
            .unwrap();
        let increment = 0.01;

        let bb = RefineBoundingBox::new(Shape::Solid(solid))
            .with_increment(increment)
            .execute(&mut store)
            .unwrap();

        let slack = 2.0 * increment;
        for (min, max) in [
            (bb.x_min, bb.x_max),
            (bb.y_min, bb.y_max),
            (bb.z_min, bb.z_max),
        ] {
            assert!(min <= -10.0 && min >= -10.0 - slack);
            assert!(max >= 10.0 && max <= 10.0 + slack);
        }
    }

    #[test]
    fn non_positive_increment_is_rejected() {
        let mut store = TopologyStore::new();
        let solid = box_solid(&mut store);

        for increment in [0.0, -0.5] {
            let result = RefineBoundingBox::new(solid)
                .with_increment(increment)
                .execute(&mut store);
            assert!(matches!(
                result,
                Err(BrepError::Analysis(AnalysisError::RefinementNonConvergent(_)))
            ));
        }
    }

    #[test]
    fn exhausted_travel_reports_non_convergence() {
        let mut store = TopologyStore::new();
        let solid = box_solid(&mut store);

        let result = RefineBoundingBox::new(solid)
            .with_increment(0.01)
            .with_max_travel(0.005)
            .execute(&mut store);
        assert!(matches!(
            result,
            Err(BrepError::Analysis(AnalysisError::RefinementNonConvergent(_)))
        ));
    }
}
