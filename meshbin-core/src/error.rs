//! Error types for mesh conversion

use crate::point::Point3f;
use std::fmt;
use thiserror::Error;

/// Vertex attribute stream referenced by a face key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::Texcoord => write!(f, "texcoord"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// Errors that can occur during mesh conversion.
///
/// Every variant is fatal: the pipeline runs to completion or aborts with
/// no partial output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing input file: {path}")]
    MissingInput { path: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("face references {attribute} {index}, but the stream holds {available} entries")]
    UnresolvedAttribute {
        attribute: Attribute,
        index: usize,
        available: usize,
    },

    #[error("vertex at position ({x}, {y}, {z}) has no resolvable normal")]
    MissingNormal { x: f32, y: f32, z: f32 },

    #[error("{counter} count {count} does not fit in a 16-bit field of the mesh format")]
    CountOverflow { counter: &'static str, count: usize },
}

impl Error {
    /// Fatal missing-normal error carrying the offending vertex position.
    pub fn missing_normal(position: Point3f) -> Self {
        Error::MissingNormal {
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }
}

/// Result type alias for meshbin operations
pub type Result<T> = std::result::Result<T, Error>;
