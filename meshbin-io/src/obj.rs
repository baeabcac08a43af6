//! Wavefront OBJ geometry parsing
//!
//! The parser makes two passes over the text. The first collects the
//! position/normal/texcoord tables and loads any referenced material
//! library; the second replays the stream and builds one surface per
//! `usemtl` directive. Splitting the passes keeps the tables complete
//! before any face resolves against them, so a face may legally reference
//! attribute lines that appear later in the file.

use crate::builder::SurfaceBuilder;
use crate::mtl;
use crate::TextSource;
use meshbin_core::{
    Error, MaterialLibrary, Point3f, Result, Surface, Vector2f, Vector3f, VertexKey,
};

/// Ordered vertex attribute streams collected from `v`/`vn`/`vt` lines.
///
/// Entries are stored in file order and looked up with the 1-based indices
/// face declarations use; an out-of-range or zero index resolves to `None`.
#[derive(Debug, Clone, Default)]
pub struct AttributeTables {
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    pub texcoords: Vec<Vector2f>,
}

impl AttributeTables {
    pub fn position(&self, index: usize) -> Option<Point3f> {
        index.checked_sub(1).and_then(|i| self.positions.get(i)).copied()
    }

    pub fn normal(&self, index: usize) -> Option<Vector3f> {
        index.checked_sub(1).and_then(|i| self.normals.get(i)).copied()
    }

    pub fn texcoord(&self, index: usize) -> Option<Vector2f> {
        index.checked_sub(1).and_then(|i| self.texcoords.get(i)).copied()
    }
}

/// A fully parsed OBJ document: attribute tables, the resolved material
/// library, and the ordered surface list.
#[derive(Debug, Clone)]
pub struct ObjDocument {
    pub tables: AttributeTables,
    pub materials: MaterialLibrary,
    pub surfaces: Vec<Surface>,
}

/// Parse OBJ text, resolving `mtllib` references through `source`.
pub fn parse_document<S: TextSource>(text: &str, source: &S) -> Result<ObjDocument> {
    let (tables, materials) = scan_attributes(text, source)?;
    let surfaces = build_surfaces(text, &tables)?;
    Ok(ObjDocument {
        tables,
        materials,
        surfaces,
    })
}

/// Pass 1: collect attribute tables and load referenced material libraries.
fn scan_attributes<S: TextSource>(
    text: &str,
    source: &S,
) -> Result<(AttributeTables, MaterialLibrary)> {
    let mut tables = AttributeTables::default();
    let mut materials = MaterialLibrary::new();

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats(&parts[1..], "v")?;
                tables.positions.push(Point3f::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats(&parts[1..], "vn")?;
                tables.normals.push(Vector3f::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats(&parts[1..], "vt")?;
                tables.texcoords.push(Vector2f::new(u, v));
            }
            "mtllib" => {
                if let Some(name) = parts.get(1) {
                    let library = source.load(name)?;
                    materials.merge(mtl::parse_library(&library));
                }
            }
            _ => {}
        }
    }

    Ok((tables, materials))
}

/// Pass 2: replay the stream, opening a surface per `usemtl` and routing
/// faces to the active builder.
fn build_surfaces(text: &str, tables: &AttributeTables) -> Result<Vec<Surface>> {
    let mut surfaces = Vec::new();
    let mut builder: Option<SurfaceBuilder<'_>> = None;
    let mut object_name = String::from("default");

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "o" => {
                if let Some(name) = parts.get(1) {
                    object_name = name.to_string();
                }
            }
            "usemtl" => {
                if let Some(open) = builder.take() {
                    surfaces.push(open.finish());
                }
                let material = parts.get(1).copied().unwrap_or("");
                // The ordinal is the global count of surfaces opened so far,
                // not a per-object counter.
                let name = format!("{}.{}", object_name, surfaces.len());
                builder = Some(SurfaceBuilder::new(name, material.to_string(), tables));
            }
            "f" => {
                let keys = parts[1..]
                    .iter()
                    .map(|token| parse_vertex_key(token))
                    .collect::<Result<Vec<VertexKey>>>()?;
                let open = builder.as_mut().ok_or_else(|| {
                    Error::Parse("face declared before any usemtl directive".to_string())
                })?;
                open.add_face(&keys)?;
            }
            _ => {}
        }
    }

    if let Some(open) = builder.take() {
        surfaces.push(open.finish());
    }

    Ok(surfaces)
}

/// Parse one `position[/texcoord[/normal]]` face token into a key.
///
/// An empty texcoord segment (`1//3`) yields `None`, which keeps such keys
/// distinct from texcoord-carrying ones during deduplication.
pub fn parse_vertex_key(token: &str) -> Result<VertexKey> {
    let mut segments = token.split('/');

    let position = parse_index(segments.next().unwrap_or(""), token)?.ok_or_else(|| {
        Error::Parse(format!("face token {token:?} has no position index"))
    })?;
    let texcoord = parse_index(segments.next().unwrap_or(""), token)?;
    let normal = parse_index(segments.next().unwrap_or(""), token)?;

    Ok(VertexKey {
        position,
        texcoord,
        normal,
    })
}

fn parse_index(segment: &str, token: &str) -> Result<Option<usize>> {
    if segment.is_empty() {
        return Ok(None);
    }
    segment.parse::<usize>().map(Some).map_err(|_| {
        Error::Parse(format!("invalid index {segment:?} in face token {token:?}"))
    })
}

fn parse_floats<const N: usize>(args: &[&str], directive: &str) -> Result<[f32; N]> {
    if args.len() < N {
        return Err(Error::Parse(format!(
            "{directive} directive needs {N} values, found {}",
            args.len()
        )));
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token.parse::<f32>().map_err(|_| {
            Error::Parse(format!("invalid float {token:?} in {directive} directive"))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_tokens_parse_into_keys() {
        assert_eq!(
            parse_vertex_key("1/2/3").unwrap(),
            VertexKey {
                position: 1,
                texcoord: Some(2),
                normal: Some(3)
            }
        );
        assert_eq!(
            parse_vertex_key("4//6").unwrap(),
            VertexKey {
                position: 4,
                texcoord: None,
                normal: Some(6)
            }
        );
        assert_eq!(
            parse_vertex_key("7").unwrap(),
            VertexKey {
                position: 7,
                texcoord: None,
                normal: None
            }
        );
    }

    #[test]
    fn malformed_face_tokens_are_rejected() {
        assert!(parse_vertex_key("").is_err());
        assert!(parse_vertex_key("/1/2").is_err());
        assert!(parse_vertex_key("a/1/2").is_err());
        assert!(parse_vertex_key("1/b/2").is_err());
    }

    #[test]
    fn tables_are_one_based() {
        let mut tables = AttributeTables::default();
        tables.positions.push(Point3f::new(1.0, 2.0, 3.0));

        assert_eq!(tables.position(1), Some(Point3f::new(1.0, 2.0, 3.0)));
        assert_eq!(tables.position(0), None);
        assert_eq!(tables.position(2), None);
    }
}
