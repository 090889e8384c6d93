//! Crate error type

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a simulation or its renderer.
///
/// Stepping a constructed simulation cannot fail; everything here happens at
/// construction time.
#[derive(Debug, Error)]
pub enum Error {
    /// A settings value or arena dimension is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Rejection sampling could not find a spot outside the panel cutout.
    #[error("could not place body {id} outside the panel after {attempts} attempts")]
    Placement { id: u32, attempts: usize },

    /// GPU device or surface setup failed.
    #[error("renderer: {0}")]
    Renderer(String),

    /// Settings JSON could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read (native runner).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
