use std::path::PathBuf;

/// Errors from model loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported location scheme `{0}` (only local paths, file://, http:// and https:// are fetched)")]
    UnsupportedScheme(String),
    #[error("invalid URL `{location}`: {source}")]
    InvalidUrl {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("buffer {index} has a data URI that is not base64")]
    DataUri { index: usize },
    #[error("buffer {index}: {source}")]
    Base64 {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },
    #[error("buffer {index} refers to a GLB chunk but the file has none")]
    MissingBlob { index: usize },
    #[error("buffer {index} holds {actual} bytes, expected at least {expected}")]
    BufferLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("asset contains no scene")]
    NoScene,
    #[error("{0}")]
    Rejected(String),
    #[error("loader stopped before reporting a result")]
    WorkerLost,
}
