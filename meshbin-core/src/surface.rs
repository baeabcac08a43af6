//! Surface and vertex records produced by the conversion pipeline

use crate::point::{Point3f, Vector2f, Vector3f};
use serde::{Deserialize, Serialize};

/// Composite index key identifying one face-vertex reference.
///
/// Indices are 1-based, as written in the source text. Equality is exact
/// index equality: two keys that resolve to numerically identical
/// attributes are still distinct vertices when any index differs, and a
/// key without a texcoord segment never merges with one that has one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexKey {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// A resolved vertex attribute bundle.
///
/// A vertex without a normal cannot be encoded; the builder rejects one at
/// parse time and the encoder re-checks before writing. A missing texcoord
/// is legal and only becomes `(0, 0)` at encoding time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3f,
    pub normal: Option<Vector3f>,
    pub texcoord: Option<Vector2f>,
}

/// One material-homogeneous triangle batch with its own local vertex and
/// index buffers.
///
/// Indices are a triangle list (length a multiple of 3) stored as `u32` in
/// memory; the binary format narrows them to `u16`, which the encoder
/// enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub material: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Surface {
    /// Create an empty surface bound to a material name.
    pub fn new(name: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: material.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }
}
