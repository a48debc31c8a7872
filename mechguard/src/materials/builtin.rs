//! Built-in and external material tables
//!
//! The built-in table covers the structural materials a hobby or lab robot is
//! usually made of, plus a handful of surfaces (tape, floor coverings, paper,
//! cardboard) whose sensor properties matter more than their strength.
//!
//! Users can supply extra or replacement entries as a JSON array of
//! [`Material`] records without recompiling.

use crate::core::MechGuardError;
use crate::materials::schema::*;
use std::path::Path;

/// The reference material table, in catalog order.
pub fn builtin_materials() -> Vec<Material> {
    vec![
        aluminum(),
        structural(MaterialType::Steel, "Steel AISI 1045", 7850.0, 530.0, 625.0, 200.0, 49.8, 486.0, 11.5e-6),
        structural(MaterialType::PlasticAbs, "ABS Plastic", 1040.0, 45.0, 46.0, 2.3, 0.25, 1425.0, 90e-6),
        structural(MaterialType::PlasticPla, "PLA Plastic", 1240.0, 50.0, 65.0, 3.5, 0.13, 1800.0, 68e-6),
        structural(MaterialType::CarbonFiber, "Carbon Fiber Composite", 1600.0, 600.0, 700.0, 70.0, 5.0, 1050.0, 1.5e-6),
        structural(MaterialType::Titanium, "Titanium Ti-6Al-4V", 4430.0, 880.0, 950.0, 114.0, 6.7, 526.0, 8.6e-6),
        structural(MaterialType::Brass, "Brass", 8500.0, 200.0, 400.0, 100.0, 120.0, 380.0, 19.0e-6),
        structural(MaterialType::Copper, "Copper", 8960.0, 70.0, 220.0, 120.0, 385.0, 385.0, 16.5e-6),
        structural(MaterialType::StainlessSteel, "Stainless Steel 304", 8000.0, 215.0, 505.0, 193.0, 16.2, 500.0, 17.3e-6),
        structural(MaterialType::Nylon, "Nylon 6/6", 1140.0, 75.0, 85.0, 2.8, 0.25, 1670.0, 80e-6),
        Material {
            sensor: SensorInteraction::new(0.02, 0.05, 0.8, 0.95, 0.1),
            ..structural(MaterialType::BlackTape, "Black Electrical Tape", 900.0, 5.0, 8.0, 0.5, 0.15, 1800.0, 120e-6)
        },
        Material {
            sensor: SensorInteraction::new(0.4, 0.35, 0.2, 0.3, 0.6),
            ..structural(MaterialType::FloorTile, "Floor Tile", 2300.0, 40.0, 50.0, 30.0, 1.2, 840.0, 8e-6)
        },
        Material {
            sensor: SensorInteraction::new(0.25, 0.2, 0.9, 0.6, 0.3),
            ..structural(MaterialType::FloorCarpet, "Floor Carpet", 400.0, 2.0, 3.0, 0.1, 0.06, 1340.0, 150e-6)
        },
        Material {
            sensor: SensorInteraction::new(0.85, 0.7, 0.5, 0.15, 0.8),
            ..structural(MaterialType::PaperA4, "A4 Paper (Single Sheet)", 700.0, 3.0, 5.0, 1.5, 0.05, 1400.0, 100e-6)
        },
        Material {
            sensor: SensorInteraction::new(0.85, 0.65, 0.7, 0.25, 0.65),
            ..structural(MaterialType::PaperMultiLayer, "A4 Paper Stack (Multi-layer)", 700.0, 8.0, 12.0, 3.0, 0.08, 1400.0, 100e-6)
        },
        Material {
            sensor: SensorInteraction::new(0.6, 0.5, 0.6, 0.4, 0.5),
            ..structural(MaterialType::Cardboard, "Cardboard", 650.0, 4.0, 6.0, 2.0, 0.06, 1500.0, 110e-6)
        },
    ]
}

/// Aluminum 6061-T6, the catalog's fallback entry.
pub fn aluminum() -> Material {
    structural(MaterialType::Aluminum, "Aluminum 6061-T6", 2700.0, 276.0, 310.0, 68.9, 167.0, 896.0, 23.6e-6)
}

#[allow(clippy::too_many_arguments)]
fn structural(
    material_type: MaterialType,
    name: &str,
    density: f64,
    yield_strength: f64,
    ultimate_tensile_strength: f64,
    youngs_modulus: f64,
    thermal_conductivity: f64,
    specific_heat: f64,
    thermal_expansion: f64,
) -> Material {
    Material {
        material_type,
        name: name.to_string(),
        density,
        yield_strength,
        ultimate_tensile_strength,
        youngs_modulus,
        thermal_conductivity,
        specific_heat,
        thermal_expansion,
        sensor: SensorInteraction::default(),
    }
}

/// Load a material table from a JSON file containing an array of materials.
pub fn load_materials_from_file(path: &Path) -> Result<Vec<Material>, MechGuardError> {
    let content = std::fs::read_to_string(path)?;
    let materials: Vec<Material> = serde_json::from_str(&content)
        .map_err(|e| MechGuardError::Parse(format!("{}: {}", path.display(), e)))?;

    tracing::info!(
        count = materials.len(),
        "Loaded material table from {:?}",
        path.file_name()
    );

    Ok(materials)
}
