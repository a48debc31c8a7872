//! Material Property Catalog
//!
//! Mechanical, thermal and sensor-interaction properties keyed by
//! [`MaterialType`]. The stress analyzer reads yield and tensile strength from
//! here and asks for upgrade candidates when a member is under-designed.
//!
//! # Usage
//!
//! ```rust
//! use mechguard::materials::{MaterialCatalog, MaterialType};
//!
//! let catalog = MaterialCatalog::builtin();
//! let pla = catalog.get_material(MaterialType::PlasticPla);
//! let better = catalog.get_stronger_material(MaterialType::PlasticPla);
//! assert!(better.yield_strength > pla.yield_strength);
//! ```

pub mod builtin;
pub mod catalog;
pub mod schema;

pub use builtin::{builtin_materials, load_materials_from_file};
pub use catalog::{MaterialCatalog, DEFAULT_MATERIAL};
pub use schema::*;
