//! Error types for the engine.
//!
//! The animation itself never fails; these cover the few operations
//! that take external input (flow ids, JSON documents, colour strings).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `start_flow` was called with an id that is not in the library.
    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    /// A colour string was not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    /// A JSON document (config, flow library, graph payload) failed to parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
