//! Binary mesh encoding
//!
//! Serializes the surface list into the fixed little-endian layout the
//! runtime loads directly: a `u16` surface count (plus two bytes of
//! padding), then per surface the `u16` vertex/index counts, a 60-byte
//! material block (`Ns`, `Ka`, `Kd`, `Ks`, `Ke`, `Ni`, `d` as `f32`s), the
//! 36-byte vertices, and the `u16` index list.

use byteorder::{LittleEndian, WriteBytesExt};
use meshbin_core::{Error, Material, MaterialLibrary, Result, Surface, Vector2f};

/// File header: `u16` surface count plus two bytes of padding.
pub const HEADER_SIZE: usize = 4;
/// Per-surface header: `u16` vertex count, `u16` index count.
pub const SURFACE_HEADER_SIZE: usize = 4;
/// Fifteen `f32` reflectance fields.
pub const MATERIAL_BLOCK_SIZE: usize = 60;
/// Position, normal, and texcoord floats plus the trailing color word.
pub const VERTEX_STRIDE: usize = 36;
/// Bytes per index entry.
pub const INDEX_SIZE: usize = 2;
/// Constant color word appended to every encoded vertex.
pub const VERTEX_COLOR: u32 = 0xFFFF_FFFF;

/// Exact size in bytes of the encoded buffer for `surfaces`.
pub fn encoded_size(surfaces: &[Surface]) -> usize {
    HEADER_SIZE
        + surfaces
            .iter()
            .map(|surface| {
                SURFACE_HEADER_SIZE
                    + MATERIAL_BLOCK_SIZE
                    + surface.vertices.len() * VERTEX_STRIDE
                    + surface.indices.len() * INDEX_SIZE
            })
            .sum::<usize>()
}

/// Serialize surfaces into the runtime mesh format.
///
/// Every 16-bit count bound is validated before anything is written, and
/// the buffer is allocated once at its exact final size. A surface naming
/// a material absent from the library encodes an all-zero material block.
pub fn encode(surfaces: &[Surface], materials: &MaterialLibrary) -> Result<Vec<u8>> {
    check_u16("surface", surfaces.len())?;
    for surface in surfaces {
        check_u16("vertex", surface.vertices.len())?;
        check_u16("index", surface.indices.len())?;
    }

    let mut buffer = Vec::with_capacity(encoded_size(surfaces));
    buffer.write_u16::<LittleEndian>(surfaces.len() as u16)?;
    buffer.write_u16::<LittleEndian>(0)?; // padding

    let fallback = Material::default();
    for surface in surfaces {
        buffer.write_u16::<LittleEndian>(surface.vertices.len() as u16)?;
        buffer.write_u16::<LittleEndian>(surface.indices.len() as u16)?;

        let material = materials.get(&surface.material).unwrap_or(&fallback);
        buffer.write_f32::<LittleEndian>(material.scalar("Ns"))?;
        for key in ["Ka", "Kd", "Ks", "Ke"] {
            for component in material.triple(key) {
                buffer.write_f32::<LittleEndian>(component)?;
            }
        }
        buffer.write_f32::<LittleEndian>(material.scalar("Ni"))?;
        buffer.write_f32::<LittleEndian>(material.scalar("d"))?;

        for vertex in &surface.vertices {
            buffer.write_f32::<LittleEndian>(vertex.position.x)?;
            buffer.write_f32::<LittleEndian>(vertex.position.y)?;
            buffer.write_f32::<LittleEndian>(vertex.position.z)?;

            // re-check of the parse-time invariant, for surfaces built by hand
            let normal = vertex
                .normal
                .ok_or_else(|| Error::missing_normal(vertex.position))?;
            buffer.write_f32::<LittleEndian>(normal.x)?;
            buffer.write_f32::<LittleEndian>(normal.y)?;
            buffer.write_f32::<LittleEndian>(normal.z)?;

            let texcoord = vertex.texcoord.unwrap_or_else(Vector2f::zeros);
            buffer.write_f32::<LittleEndian>(texcoord.x)?;
            buffer.write_f32::<LittleEndian>(texcoord.y)?;

            buffer.write_u32::<LittleEndian>(VERTEX_COLOR)?;
        }

        for &index in &surface.indices {
            let index = u16::try_from(index).map_err(|_| Error::CountOverflow {
                counter: "index value",
                count: index as usize,
            })?;
            buffer.write_u16::<LittleEndian>(index)?;
        }
    }

    debug_assert_eq!(buffer.len(), encoded_size(surfaces));
    Ok(buffer)
}

fn check_u16(counter: &'static str, count: usize) -> Result<()> {
    if count > u16::MAX as usize {
        return Err(Error::CountOverflow { counter, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbin_core::{Point3f, Vector3f, Vertex};

    fn vertex(x: f32) -> Vertex {
        Vertex {
            position: Point3f::new(x, 0.0, 0.0),
            normal: Some(Vector3f::new(0.0, 0.0, 1.0)),
            texcoord: None,
        }
    }

    fn triangle_surface() -> Surface {
        let mut surface = Surface::new("default.0", "m");
        surface.vertices = vec![vertex(0.0), vertex(1.0), vertex(2.0)];
        surface.indices = vec![0, 1, 2];
        surface
    }

    #[test]
    fn empty_surface_list_is_just_the_header() {
        let bytes = encode(&[], &MaterialLibrary::new()).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn buffer_length_matches_the_size_law() {
        let surfaces = vec![triangle_surface(), Surface::new("default.1", "m")];
        let bytes = encode(&surfaces, &MaterialLibrary::new()).unwrap();

        assert_eq!(bytes.len(), encoded_size(&surfaces));
        assert_eq!(bytes.len(), 4 + (4 + 60 + 3 * 36 + 3 * 2) + (4 + 60));
    }

    #[test]
    fn unknown_material_encodes_as_zeroes() {
        let bytes = encode(&[Surface::new("default.0", "nope")], &MaterialLibrary::new()).unwrap();
        // everything after the two count pairs is the zeroed material block
        assert_eq!(bytes.len(), 4 + 4 + 60);
        assert!(bytes[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn vertex_without_normal_is_rejected() {
        let mut surface = triangle_surface();
        surface.vertices[1].normal = None;

        let err = encode(&[surface], &MaterialLibrary::new()).unwrap_err();
        assert!(matches!(err, Error::MissingNormal { .. }));
    }

    #[test]
    fn index_count_overflow_is_reported() {
        let mut surface = triangle_surface();
        surface.indices = vec![0; 70_000];

        let err = encode(&[surface], &MaterialLibrary::new()).unwrap_err();
        match err {
            Error::CountOverflow { counter, count } => {
                assert_eq!(counter, "index");
                assert_eq!(count, 70_000);
            }
            other => panic!("expected CountOverflow, got {other:?}"),
        }
    }

    #[test]
    fn vertex_count_overflow_is_reported() {
        let mut surface = Surface::new("default.0", "m");
        surface.vertices = vec![vertex(0.0); 65_537];

        let err = encode(&[surface], &MaterialLibrary::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::CountOverflow {
                counter: "vertex",
                count: 65_537,
            }
        ));
    }
}
