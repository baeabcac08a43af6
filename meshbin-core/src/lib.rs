//! Core data structures for meshbin
//!
//! This crate provides the data model shared by the conversion pipeline:
//! vertex attribute types, material records, surface buffers, and the
//! common error type.

pub mod point;
pub mod material;
pub mod surface;
pub mod error;

pub use point::*;
pub use material::*;
pub use surface::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector2, Vector3};
