use snapmap_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} is not a FeatureCollection")]
    NotFeatureCollection { context: String },

    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("unsupported geometry type {found}; expected {expected}")]
    UnsupportedGeometry {
        found: &'static str,
        expected: &'static str,
    },

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("invalid coordinate ({lon}, {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
