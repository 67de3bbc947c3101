//! Error types.

use thiserror::Error;

/// Invalid geometric construction.
///
/// These are programmer errors: a shape that cannot exist is rejected when
/// it is built rather than producing NaNs later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least {expected} vertices, got {found}")]
    TooFewVertices { expected: usize, found: usize },
    #[error("triangle vertices are duplicated or collinear")]
    DegenerateTriangle,
    #[error("spline needs at least {expected} control points, got {found}")]
    TooFewControlPoints { expected: usize, found: usize },
    #[error("shape coordinates must be finite")]
    NonFiniteCoordinate,
}

/// Misuse of a force generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForceError {
    /// Two-body constraints only act on their fixed endpoints.
    #[error("{generator} does not accept registered bodies; it acts on its two endpoints only")]
    RegistrationUnsupported { generator: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Force(#[from] ForceError),
}

pub type Result<T> = std::result::Result<T, Error>;
