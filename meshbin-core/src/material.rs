//! Material records parsed from MTL libraries

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reflectance keys the encoder reads; zero-initialized on every `newmtl`.
const SCALAR_KEYS: [&str; 3] = ["Ns", "Ni", "d"];
const TRIPLE_KEYS: [&str; 4] = ["Ka", "Kd", "Ks", "Ke"];

/// One whitespace-separated token from a material property line.
///
/// MTL parsing is deliberately permissive: a token that does not parse as a
/// float survives verbatim instead of failing the whole library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialToken {
    Number(f32),
    Raw(String),
}

impl MaterialToken {
    /// Parse a token, falling back to `Raw` when it is not a float.
    pub fn parse(token: &str) -> Self {
        match token.parse::<f32>() {
            Ok(value) => MaterialToken::Number(value),
            Err(_) => MaterialToken::Raw(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            MaterialToken::Number(value) => Some(*value),
            MaterialToken::Raw(_) => None,
        }
    }
}

/// Value of one material property: a scalar for single-token lines, a list
/// of whatever arity appeared otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialValue {
    Scalar(MaterialToken),
    List(Vec<MaterialToken>),
}

/// A named material record.
///
/// Properties are stored exactly as they appear in the library. The
/// reflectance fields consumed by the encoder (`Ns`, `Ka`, `Kd`, `Ks`,
/// `Ke`, `Ni`, `d`) are zero-initialized when the record is created, so a
/// sparse library still encodes a complete material block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    properties: HashMap<String, MaterialValue>,
}

impl Material {
    /// Fresh material with the encoder-visible fields zeroed, as a
    /// `newmtl` directive requires.
    pub fn zeroed() -> Self {
        let mut material = Material::default();
        for key in SCALAR_KEYS {
            material
                .properties
                .insert(key.to_string(), MaterialValue::Scalar(MaterialToken::Number(0.0)));
        }
        for key in TRIPLE_KEYS {
            material.properties.insert(
                key.to_string(),
                MaterialValue::List(vec![MaterialToken::Number(0.0); 3]),
            );
        }
        material
    }

    /// Set a property, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: MaterialValue) {
        self.properties.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MaterialValue> {
        self.properties.get(key)
    }

    /// Scalar property as a float; absent or raw entries read as 0.0.
    pub fn scalar(&self, key: &str) -> f32 {
        match self.properties.get(key) {
            Some(MaterialValue::Scalar(token)) => token.as_number().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Three-component property; missing or raw components read as 0.0.
    pub fn triple(&self, key: &str) -> [f32; 3] {
        let mut out = [0.0; 3];
        if let Some(MaterialValue::List(tokens)) = self.properties.get(key) {
            for (slot, token) in out.iter_mut().zip(tokens) {
                *slot = token.as_number().unwrap_or(0.0);
            }
        }
        out
    }
}

/// Mapping from material name to material record, as loaded from one or
/// more `mtllib` references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, material: Material) {
        self.materials.insert(name.into(), material);
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// Fold another library into this one; same-named materials are replaced.
    pub fn merge(&mut self, other: MaterialLibrary) {
        self.materials.extend(other.materials);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
