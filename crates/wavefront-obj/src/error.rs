//! Load errors and recovered warnings.

use std::sync::Arc;

/// Errors that abort a load or a derived-geometry access.
///
/// Cloneable so a loader that failed to parse can hand the same error back
/// on every later access.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ObjError {
    #[error("line {line}: malformed face index '{corner}': {reason}")]
    MalformedFaceIndex {
        line: usize,
        corner: String,
        reason: String,
    },

    #[error("group {selection} does not exist ({available} groups loaded)")]
    InvalidGroupSelection { selection: String, available: usize },

    #[error("stream '{name}' is unavailable: {source}")]
    StreamUnavailable {
        name: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("read failed after line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ObjError {
    pub(crate) fn stream_unavailable(name: impl Into<String>, err: std::io::Error) -> Self {
        Self::StreamUnavailable {
            name: name.into(),
            source: Arc::new(err),
        }
    }
}

/// Conditions recovered locally during a load. Each one is logged when it
/// happens and kept on the parsed model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjWarning {
    #[error("line {line}: material '{name}' is not defined, faces use no material")]
    UnresolvedMaterialReference { line: usize, name: String },

    #[error("line {line}: '{keyword}' needs three numbers, statement ignored")]
    MalformedMaterialStatement { line: usize, keyword: String },

    #[error("material library '{name}' is unavailable: {reason}")]
    MaterialStreamUnavailable { name: String, reason: String },

    #[error("line {line}: malformed '{keyword}' statement ignored")]
    MalformedVertexStatement { line: usize, keyword: String },

    #[error("line {line}: face with {corners} corners ignored")]
    DegenerateFace { line: usize, corners: usize },
}
