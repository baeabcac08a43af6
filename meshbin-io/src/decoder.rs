//! Binary mesh decoding
//!
//! Reads buffers produced by [`crate::encoder`] back into surface data,
//! mirroring what the runtime loader does. Mostly useful for inspecting
//! and round-trip-testing emitted files.

use byteorder::{LittleEndian, ReadBytesExt};
use meshbin_core::{Error, Point3f, Result, Vector2f, Vector3f};

/// Reflectance block attached to each decoded surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedMaterial {
    pub ns: f32,
    pub ka: [f32; 3],
    pub kd: [f32; 3],
    pub ks: [f32; 3],
    pub ke: [f32; 3],
    pub ni: f32,
    pub d: f32,
}

/// One surface as the runtime sees it.
#[derive(Debug, Clone)]
pub struct DecodedSurface {
    pub material: DecodedMaterial,
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    pub texcoords: Vec<Vector2f>,
    pub colors: Vec<u32>,
    pub indices: Vec<u16>,
}

/// Decode a buffer produced by [`crate::encoder::encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<DecodedSurface>> {
    let mut reader = bytes;

    let surface_count = read_u16(&mut reader)?;
    let _padding = read_u16(&mut reader)?;

    let mut surfaces = Vec::with_capacity(surface_count as usize);
    for _ in 0..surface_count {
        let vertex_count = read_u16(&mut reader)? as usize;
        let index_count = read_u16(&mut reader)? as usize;

        let ns = read_f32(&mut reader)?;
        let ka = read_triple(&mut reader)?;
        let kd = read_triple(&mut reader)?;
        let ks = read_triple(&mut reader)?;
        let ke = read_triple(&mut reader)?;
        let ni = read_f32(&mut reader)?;
        let d = read_f32(&mut reader)?;

        let mut surface = DecodedSurface {
            material: DecodedMaterial {
                ns,
                ka,
                kd,
                ks,
                ke,
                ni,
                d,
            },
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            texcoords: Vec::with_capacity(vertex_count),
            colors: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
        };

        for _ in 0..vertex_count {
            let [x, y, z] = read_triple(&mut reader)?;
            surface.positions.push(Point3f::new(x, y, z));
            let [x, y, z] = read_triple(&mut reader)?;
            surface.normals.push(Vector3f::new(x, y, z));
            let u = read_f32(&mut reader)?;
            let v = read_f32(&mut reader)?;
            surface.texcoords.push(Vector2f::new(u, v));
            surface.colors.push(read_u32(&mut reader)?);
        }

        for _ in 0..index_count {
            surface.indices.push(read_u16(&mut reader)?);
        }

        surfaces.push(surface);
    }

    Ok(surfaces)
}

fn read_u16(reader: &mut &[u8]) -> Result<u16> {
    reader.read_u16::<LittleEndian>().map_err(truncated)
}

fn read_u32(reader: &mut &[u8]) -> Result<u32> {
    reader.read_u32::<LittleEndian>().map_err(truncated)
}

fn read_f32(reader: &mut &[u8]) -> Result<f32> {
    reader.read_f32::<LittleEndian>().map_err(truncated)
}

fn read_triple(reader: &mut &[u8]) -> Result<[f32; 3]> {
    Ok([read_f32(reader)?, read_f32(reader)?, read_f32(reader)?])
}

fn truncated(_: std::io::Error) -> Error {
    Error::Parse("truncated mesh buffer".to_string())
}
