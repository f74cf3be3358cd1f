use thiserror::Error;

/// Failures surfaced by the atmosphere layer.
///
/// Parcels advected off the grid are not represented here: they are dropped
/// and counted in [`crate::layer::TickStats`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AtmosphereError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid expects {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error(
        "{field} grid is {}x{} but the atmosphere grid is {}x{}",
        .actual.0,
        .actual.1,
        .expected.0,
        .expected.1
    )]
    ShapeMismatch {
        field: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, AtmosphereError>;
