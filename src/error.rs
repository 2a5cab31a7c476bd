use crate::topology::{Shape, ShapeKind, WireId};
use thiserror::Error;

/// Top-level error type for the brepindex crate.
#[derive(Debug, Error)]
pub enum BrepError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological queries.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid shape handle: {0:?} is not present in the store")]
    InvalidShape(Shape),

    #[error("shape {shape:?} is not part of the catalog scope {scope:?}")]
    WrongScope { shape: Shape, scope: Shape },

    #[error("wire {wire:?} is malformed: {detail}")]
    MalformedWire { wire: WireId, detail: String },

    #[error("no {requested} relation is defined for a {actual}")]
    WrongKind {
        requested: ShapeKind,
        actual: ShapeKind,
    },
}

/// Errors related to shape construction and boolean operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to bounding box analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("shape {0:?} has no geometric extent")]
    EmptyShape(Shape),

    #[error("bounding box refinement cannot converge: {0}")]
    RefinementNonConvergent(String),
}

/// Errors related to file input.
#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed vertex data at line {line}")]
    ParseVertex { line: usize },

    #[error("no vertex data found in STL file")]
    NoVertices,
}

/// Convenience type alias for results using [`BrepError`].
pub type Result<T> = std::result::Result<T, BrepError>;
