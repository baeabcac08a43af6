//! Wavefront MTL material library parsing
//!
//! The parser is deliberately permissive: property tokens that fail to
//! parse as floats are kept verbatim, unknown keys are stored as found, and
//! stray lines outside any material are skipped. Nothing in an MTL file is
//! a fatal error.

use meshbin_core::{Material, MaterialLibrary, MaterialToken, MaterialValue};

/// Parse MTL text into a material library.
///
/// A `newmtl` directive opens a zero-initialized record; every following
/// property line mutates it until the next `newmtl` or end of input. A
/// single-token property is stored as a scalar, anything else as a list of
/// whatever arity the line carried.
pub fn parse_library(text: &str) -> MaterialLibrary {
    let mut library = MaterialLibrary::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "newmtl" => {
                let name = parts.get(1).copied().unwrap_or("").to_string();
                library.insert(name.clone(), Material::zeroed());
                current = Some(name);
            }
            key => {
                // Property lines before the first newmtl have nothing to
                // attach to and are dropped.
                let Some(name) = &current else { continue };

                let mut tokens: Vec<MaterialToken> =
                    parts[1..].iter().map(|token| MaterialToken::parse(token)).collect();
                let value = if tokens.len() == 1 {
                    MaterialValue::Scalar(tokens.remove(0))
                } else {
                    MaterialValue::List(tokens)
                };

                if let Some(material) = library.get_mut(name) {
                    material.set(key, value);
                }
            }
        }
    }

    library
}
