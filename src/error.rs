//! Error types for boundary handling and event fetching.

use thiserror::Error;

/// Errors raised while loading or reducing boundary geometry
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The geometry has no vertices, so no bounding box can be formed
    #[error("geometry contains no vertices")]
    EmptyGeometry,

    /// The boundary source yielded no usable polygons
    #[error("no polygon geometry found in {0}")]
    NoGeometry(String),

    #[error("failed to read boundary: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid boundary JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the event service client
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode event page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    /// Every attempt for one page failed; carries the last error
    #[error("giving up on offset {offset} after {attempts} attempts: {last}")]
    Exhausted {
        offset: usize,
        attempts: u32,
        last: String,
    },
}
