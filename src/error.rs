//! Error types for the rendering engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the engine to a host
///
/// Rendering itself never fails: unknown templates and palettes fall back to
/// defaults and template faults are contained by the registry. Only export
/// and configuration problems reach the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Export (rasterization / PDF encoding) failed
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Terminal failures of the export pipeline.
///
/// Any of these means no artifact was produced at all.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The offscreen target was rasterized before anything was mounted on it
    #[error("offscreen render target has no mounted page")]
    TargetNotMounted,

    /// The mounted page could not be turned into pages
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// The PDF encoder rejected the rasterized pages
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    /// The blocking export worker died before reporting back
    #[error("export worker failed: {0}")]
    Worker(String),

    /// Export requested without a PDF backend compiled in
    #[error("PDF support is not enabled (build with the `pdf` feature)")]
    Unsupported,
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

/// A shape problem found while normalizing a persisted record.
///
/// These are never returned as errors: the mapper coerces the offending value
/// to the nearest valid default and records the problem for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The record (or a nested group) was not a JSON object
    #[error("`{field}` is not an object (found {found})")]
    NotAnObject { field: String, found: String },

    /// A list field was not an array
    #[error("`{field}` is not a list (found {found})")]
    NotAList { field: String, found: String },

    /// A list entry was neither an object nor a string
    #[error("`{field}[{index}]` is neither an object nor a string (found {found})")]
    InvalidEntry {
        field: String,
        index: usize,
        found: String,
    },

    /// A scalar field held a non-string, non-number value
    #[error("`{field}` is not a text value (found {found})")]
    InvalidScalar { field: String, found: String },
}

/// A panic caught while a template was rendering.
///
/// Recorded in the logs by the registry, which substitutes the default
/// template's output; never surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFault {
    pub template_id: String,
    pub message: String,
}

impl std::fmt::Display for RenderFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template `{}` faulted: {}", self.template_id, self.message)
    }
}
