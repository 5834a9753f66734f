use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, reassembling or measuring ASCII STL files.
#[derive(Debug, Error)]
pub enum StlError {
    #[error("read STL {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed vertex record {text:?}")]
    MalformedVertex { line: usize, text: String },

    #[error("unbalanced solid markers: {starts} `solid` vs {ends} `endsolid`")]
    UnbalancedSolids { starts: usize, ends: usize },

    #[error("`endsolid` at line {line} has no open solid")]
    OrphanEnd { line: usize },

    #[error("solid {name:?} opened at line {start} is not closed before line {next}")]
    OverlappingSolids {
        name: String,
        start: usize,
        next: usize,
    },

    #[error("cannot derive solid name from {filename:?}: {reason}")]
    Naming { filename: String, reason: String },

    #[error("empty vertex set in {path:?}")]
    EmptyVertexSet { path: PathBuf },
}

impl StlError {
    pub fn naming(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Naming {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by the external geometry session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown {kind} id {id}")]
    UnknownEntity { kind: &'static str, id: u32 },

    #[error("session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stl(#[from] StlError),

    #[error("geometry session: {0}")]
    Session(#[from] SessionError),

    #[error("{action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
