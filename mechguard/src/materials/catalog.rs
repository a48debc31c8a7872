//! Read-only material lookup shared by every analyzer.

use std::collections::BTreeMap;

use crate::materials::builtin::{aluminum, builtin_materials};
use crate::materials::schema::{Material, MaterialType};

/// Material returned for tags the catalog does not hold.
pub const DEFAULT_MATERIAL: MaterialType = MaterialType::Aluminum;

/// Immutable table of material properties.
///
/// Built once and passed by reference into the analyzers. Lookups never fail:
/// an unknown tag resolves to [`DEFAULT_MATERIAL`].
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    materials: BTreeMap<MaterialType, Material>,
    fallback: Material,
}

impl MaterialCatalog {
    /// Catalog with the built-in reference table.
    pub fn builtin() -> Self {
        Self::with_materials(builtin_materials())
    }

    /// Catalog holding exactly the given materials (plus the default entry if
    /// it was not supplied). Later duplicates replace earlier ones.
    pub fn with_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let mut table = BTreeMap::new();
        for material in materials {
            if material.material_type == MaterialType::Unknown {
                tracing::warn!(name = %material.name, "Skipping material with unknown type tag");
                continue;
            }
            table.insert(material.material_type, material);
        }

        let fallback = table
            .entry(DEFAULT_MATERIAL)
            .or_insert_with(aluminum)
            .clone();

        Self {
            materials: table,
            fallback,
        }
    }

    /// Built-in table with the given entries added or replaced.
    pub fn with_overrides(materials: impl IntoIterator<Item = Material>) -> Self {
        Self::with_materials(builtin_materials().into_iter().chain(materials))
    }

    pub fn get_material(&self, material_type: MaterialType) -> &Material {
        self.materials.get(&material_type).unwrap_or(&self.fallback)
    }

    /// The catalog entry with the highest yield strength, or the current
    /// material if nothing beats it. Ties keep the first entry in catalog order.
    pub fn get_stronger_material(&self, current: MaterialType) -> &Material {
        let mut best = self.get_material(current);
        for material in self.materials.values() {
            if material.yield_strength > best.yield_strength {
                best = material;
            }
        }
        best
    }

    pub fn list_material_types(&self) -> Vec<MaterialType> {
        self.materials.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::schema::SensorInteraction;

    fn material(material_type: MaterialType, name: &str, yield_strength: f64) -> Material {
        Material {
            material_type,
            name: name.to_string(),
            density: 1000.0,
            yield_strength,
            ultimate_tensile_strength: yield_strength * 1.2,
            youngs_modulus: 10.0,
            thermal_conductivity: 1.0,
            specific_heat: 1000.0,
            thermal_expansion: 1e-5,
            sensor: SensorInteraction::default(),
        }
    }

    #[test]
    fn test_builtin_has_sixteen_entries() {
        let catalog = MaterialCatalog::builtin();
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.list_material_types(), MaterialType::ALL.to_vec());
    }

    #[test]
    fn test_aluminum_properties() {
        let catalog = MaterialCatalog::builtin();
        let al = catalog.get_material(MaterialType::Aluminum);
        assert_eq!(al.name, "Aluminum 6061-T6");
        assert_eq!(al.yield_strength, 276.0);
        assert_eq!(al.ultimate_tensile_strength, 310.0);
        assert_eq!(al.density, 2700.0);
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        let catalog = MaterialCatalog::builtin();
        let m = catalog.get_material(MaterialType::Unknown);
        assert_eq!(m.material_type, DEFAULT_MATERIAL);
    }

    #[test]
    fn test_missing_entry_in_substitute_catalog_falls_back() {
        let catalog = MaterialCatalog::with_materials(vec![material(MaterialType::Steel, "Steel", 500.0)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_material(MaterialType::Nylon).material_type, MaterialType::Aluminum);
    }

    #[test]
    fn test_stronger_material_is_titanium() {
        let catalog = MaterialCatalog::builtin();
        for t in MaterialType::ALL {
            let stronger = catalog.get_stronger_material(t);
            assert_eq!(stronger.material_type, MaterialType::Titanium, "from {}", t);
        }
    }

    #[test]
    fn test_stronger_material_tie_keeps_catalog_order() {
        let catalog = MaterialCatalog::with_materials(vec![
            material(MaterialType::Aluminum, "A", 100.0),
            material(MaterialType::Steel, "S", 300.0),
            material(MaterialType::Brass, "B", 300.0),
        ]);
        assert_eq!(catalog.get_stronger_material(MaterialType::Aluminum).name, "S");
        // Already the strongest: stays put
        assert_eq!(catalog.get_stronger_material(MaterialType::Brass).name, "B");
    }

    #[test]
    fn test_stronger_material_round_trip() {
        let catalog = MaterialCatalog::builtin();
        for t in catalog.list_material_types() {
            let stronger = catalog.get_stronger_material(t);
            assert_eq!(
                catalog.get_material(stronger.material_type).yield_strength,
                stronger.yield_strength
            );
        }
    }

    #[test]
    fn test_overrides_replace_builtin_entry() {
        let catalog = MaterialCatalog::with_overrides(vec![material(MaterialType::Steel, "Maraging Steel", 1900.0)]);
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.get_material(MaterialType::Steel).name, "Maraging Steel");
        assert_eq!(catalog.get_stronger_material(MaterialType::Nylon).material_type, MaterialType::Steel);
    }

    #[test]
    fn test_unknown_tagged_entries_are_skipped() {
        let catalog = MaterialCatalog::with_materials(vec![material(MaterialType::Unknown, "Mystery", 9999.0)]);
        assert_eq!(catalog.list_material_types(), vec![MaterialType::Aluminum]);
    }
}
