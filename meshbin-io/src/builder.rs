//! Surface assembly: fan triangulation and per-surface vertex deduplication

use crate::obj::AttributeTables;
use meshbin_core::{Attribute, Error, Result, Surface, Vertex, VertexKey};
use std::collections::HashMap;

/// Builds one surface's vertex and index buffers from face declarations.
///
/// Each builder owns its own key-to-index map, so vertices are never shared
/// across surfaces: a vertex referenced by two surfaces is stored once per
/// surface even when its attributes are identical. That keeps every
/// surface's buffers independently drawable and is deliberate.
pub struct SurfaceBuilder<'a> {
    tables: &'a AttributeTables,
    surface: Surface,
    interned: HashMap<VertexKey, u32>,
}

impl<'a> SurfaceBuilder<'a> {
    pub fn new(name: String, material: String, tables: &'a AttributeTables) -> Self {
        Self {
            tables,
            surface: Surface::new(name, material),
            interned: HashMap::new(),
        }
    }

    /// Add one face declaration.
    ///
    /// A face with exactly three keys emits a single triangle. Anything
    /// else is fan-triangulated with the neighbor pattern — keys at
    /// (i-1, i, i+1) wrapping around, one triangle per key. The fan is only
    /// an approximation, acceptable for convex and roughly planar polygons;
    /// no validation is attempted.
    pub fn add_face(&mut self, keys: &[VertexKey]) -> Result<()> {
        if keys.len() == 3 {
            return self.add_triangle(&keys[0], &keys[1], &keys[2]);
        }
        let count = keys.len();
        for i in 0..count {
            let prev = if i == 0 { count - 1 } else { i - 1 };
            let next = (i + 1) % count;
            self.add_triangle(&keys[prev], &keys[i], &keys[next])?;
        }
        Ok(())
    }

    /// Consume the builder, returning the finished surface.
    pub fn finish(self) -> Surface {
        self.surface
    }

    fn add_triangle(&mut self, a: &VertexKey, b: &VertexKey, c: &VertexKey) -> Result<()> {
        let ia = self.intern(a)?;
        let ib = self.intern(b)?;
        let ic = self.intern(c)?;
        self.surface.indices.extend([ia, ib, ic]);
        Ok(())
    }

    /// Look up a key's buffer index, resolving and appending the vertex on
    /// first sight. Insertion order defines the vertex buffer order.
    fn intern(&mut self, key: &VertexKey) -> Result<u32> {
        if let Some(&index) = self.interned.get(key) {
            return Ok(index);
        }
        let vertex = self.resolve(key)?;
        let index = self.surface.vertices.len() as u32;
        self.surface.vertices.push(vertex);
        self.interned.insert(key.clone(), index);
        Ok(index)
    }

    fn resolve(&self, key: &VertexKey) -> Result<Vertex> {
        let position = self
            .tables
            .position(key.position)
            .ok_or(Error::UnresolvedAttribute {
                attribute: Attribute::Position,
                index: key.position,
                available: self.tables.positions.len(),
            })?;

        let texcoord = match key.texcoord {
            Some(index) => Some(self.tables.texcoord(index).ok_or(Error::UnresolvedAttribute {
                attribute: Attribute::Texcoord,
                index,
                available: self.tables.texcoords.len(),
            })?),
            None => None,
        };

        // A normal segment that is absent or out of range is fatal either
        // way; the error reports the resolved position rather than the
        // index, since that is what identifies the vertex in the source.
        let normal = key.normal.and_then(|index| self.tables.normal(index));
        if normal.is_none() {
            return Err(Error::missing_normal(position));
        }

        Ok(Vertex {
            position,
            normal,
            texcoord,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbin_core::{Point3f, Vector2f, Vector3f};

    fn quad_tables() -> AttributeTables {
        let mut tables = AttributeTables::default();
        tables.positions = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        tables.normals = vec![Vector3f::new(0.0, 0.0, 1.0)];
        tables.texcoords = vec![Vector2f::new(0.0, 0.0)];
        tables
    }

    fn key(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> VertexKey {
        VertexKey {
            position,
            texcoord,
            normal,
        }
    }

    #[test]
    fn triangle_face_emits_one_triangle() {
        let tables = quad_tables();
        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);

        builder
            .add_face(&[
                key(1, Some(1), Some(1)),
                key(2, Some(1), Some(1)),
                key(3, Some(1), Some(1)),
            ])
            .unwrap();

        let surface = builder.finish();
        assert_eq!(surface.vertex_count(), 3);
        assert_eq!(surface.indices, vec![0, 1, 2]);
    }

    #[test]
    fn quad_fans_into_four_triangles() {
        let tables = quad_tables();
        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);

        builder
            .add_face(&[
                key(1, Some(1), Some(1)),
                key(2, Some(1), Some(1)),
                key(3, Some(1), Some(1)),
                key(4, Some(1), Some(1)),
            ])
            .unwrap();

        let surface = builder.finish();
        // only the positions differ, so dedup leaves one entry per corner
        assert_eq!(surface.vertex_count(), 4);
        assert_eq!(surface.triangle_count(), 4);
        // neighbor fan: (i-1, i, i+1) per corner, vertex 4 interned first
        assert_eq!(
            surface.indices,
            vec![0, 1, 2, 1, 2, 3, 2, 3, 0, 3, 0, 1]
        );
        assert_eq!(surface.vertices[0].position, Point3f::new(0.0, 1.0, 0.0));
        assert_eq!(surface.vertices[1].position, Point3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn dedup_is_exact_key_equality() {
        let tables = quad_tables();
        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);

        // same position and normal, one key with a texcoord and one without:
        // these must stay distinct buffer entries
        builder
            .add_face(&[
                key(1, Some(1), Some(1)),
                key(1, None, Some(1)),
                key(2, Some(1), Some(1)),
            ])
            .unwrap();
        builder
            .add_face(&[
                key(1, Some(1), Some(1)),
                key(2, Some(1), Some(1)),
                key(3, Some(1), Some(1)),
            ])
            .unwrap();

        let surface = builder.finish();
        assert_eq!(surface.vertex_count(), 4);
        assert_eq!(surface.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(surface.vertices[0].texcoord, Some(Vector2f::new(0.0, 0.0)));
        assert_eq!(surface.vertices[1].texcoord, None);
    }

    #[test]
    fn missing_normal_is_fatal_and_carries_the_position() {
        let tables = quad_tables();
        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);

        let err = builder
            .add_face(&[
                key(2, Some(1), None),
                key(3, Some(1), Some(1)),
                key(4, Some(1), Some(1)),
            ])
            .unwrap_err();

        match err {
            Error::MissingNormal { x, y, z } => {
                assert_eq!((x, y, z), (1.0, 0.0, 0.0));
            }
            other => panic!("expected MissingNormal, got {other:?}"),
        }

        // an out-of-range normal index fails the same way
        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);
        let err = builder
            .add_face(&[
                key(1, Some(1), Some(9)),
                key(2, Some(1), Some(1)),
                key(3, Some(1), Some(1)),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::MissingNormal { .. }));
    }

    #[test]
    fn out_of_range_position_and_texcoord_are_fatal() {
        let tables = quad_tables();

        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);
        let err = builder
            .add_face(&[
                key(9, None, Some(1)),
                key(1, None, Some(1)),
                key(2, None, Some(1)),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedAttribute {
                attribute: Attribute::Position,
                index: 9,
                available: 4,
            }
        ));

        let mut builder = SurfaceBuilder::new("s.0".into(), "m".into(), &tables);
        let err = builder
            .add_face(&[
                key(1, Some(5), Some(1)),
                key(2, Some(1), Some(1)),
                key(3, Some(1), Some(1)),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedAttribute {
                attribute: Attribute::Texcoord,
                index: 5,
                available: 1,
            }
        ));
    }
}
