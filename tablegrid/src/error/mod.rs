//! Error types

mod api;

pub use api::*;

/// Top-level error type for grid operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error raised while talking to the backend.
    #[error(transparent)]
    Api(#[from] ApiError),
}
