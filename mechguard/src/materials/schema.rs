//! Material record types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying a catalog material.
///
/// Declaration order is the catalog iteration order, which decides ties in
/// [`MaterialCatalog::get_stronger_material`](super::MaterialCatalog::get_stronger_material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialType {
    Aluminum,
    Steel,
    PlasticAbs,
    PlasticPla,
    CarbonFiber,
    Titanium,
    Brass,
    Copper,
    StainlessSteel,
    Nylon,
    // Surfaces and consumables that mostly matter for sensors
    BlackTape,
    FloorTile,
    FloorCarpet,
    PaperA4,
    PaperMultiLayer,
    Cardboard,
    /// Any tag this build does not know. Looks up as the default material.
    #[serde(other)]
    Unknown,
}

impl MaterialType {
    /// Every known tag, in catalog order.
    pub const ALL: [MaterialType; 16] = [
        MaterialType::Aluminum,
        MaterialType::Steel,
        MaterialType::PlasticAbs,
        MaterialType::PlasticPla,
        MaterialType::CarbonFiber,
        MaterialType::Titanium,
        MaterialType::Brass,
        MaterialType::Copper,
        MaterialType::StainlessSteel,
        MaterialType::Nylon,
        MaterialType::BlackTape,
        MaterialType::FloorTile,
        MaterialType::FloorCarpet,
        MaterialType::PaperA4,
        MaterialType::PaperMultiLayer,
        MaterialType::Cardboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Aluminum => "Aluminum",
            MaterialType::Steel => "Steel",
            MaterialType::PlasticAbs => "PlasticAbs",
            MaterialType::PlasticPla => "PlasticPla",
            MaterialType::CarbonFiber => "CarbonFiber",
            MaterialType::Titanium => "Titanium",
            MaterialType::Brass => "Brass",
            MaterialType::Copper => "Copper",
            MaterialType::StainlessSteel => "StainlessSteel",
            MaterialType::Nylon => "Nylon",
            MaterialType::BlackTape => "BlackTape",
            MaterialType::FloorTile => "FloorTile",
            MaterialType::FloorCarpet => "FloorCarpet",
            MaterialType::PaperA4 => "PaperA4",
            MaterialType::PaperMultiLayer => "PaperMultiLayer",
            MaterialType::Cardboard => "Cardboard",
            MaterialType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = std::convert::Infallible;

    /// Case-insensitive; underscores and dashes are ignored so `plastic_abs`
    /// and `Plastic-ABS` both resolve. Unrecognised tags become `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        Ok(MaterialType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().to_lowercase() == key)
            .unwrap_or(MaterialType::Unknown))
    }
}

/// Physical and sensor-interaction properties of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_type: MaterialType,
    pub name: String,
    /// kg/m³
    pub density: f64,
    /// MPa
    pub yield_strength: f64,
    /// MPa
    pub ultimate_tensile_strength: f64,
    /// GPa
    pub youngs_modulus: f64,
    /// W/(m·K)
    pub thermal_conductivity: f64,
    /// J/(kg·K)
    pub specific_heat: f64,
    /// 1/K
    pub thermal_expansion: f64,
    #[serde(default)]
    pub sensor: SensorInteraction,
}

/// How a surface made of this material looks to common robot sensors.
/// Every coefficient is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorInteraction {
    pub optical_reflectivity: f64,
    pub ir_reflectivity: f64,
    /// Higher means harder for ultrasonic ranging to see.
    pub ultrasonic_absorption: f64,
    pub color_sensor_error: f64,
    pub line_sensor_detectability: f64,
}

impl Default for SensorInteraction {
    fn default() -> Self {
        Self {
            optical_reflectivity: 0.5,
            ir_reflectivity: 0.5,
            ultrasonic_absorption: 0.3,
            color_sensor_error: 0.1,
            line_sensor_detectability: 0.7,
        }
    }
}

impl SensorInteraction {
    pub fn new(
        optical_reflectivity: f64,
        ir_reflectivity: f64,
        ultrasonic_absorption: f64,
        color_sensor_error: f64,
        line_sensor_detectability: f64,
    ) -> Self {
        Self {
            optical_reflectivity,
            ir_reflectivity,
            ultrasonic_absorption,
            color_sensor_error,
            line_sensor_detectability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_material_type() {
        assert_eq!("Aluminum".parse::<MaterialType>().unwrap(), MaterialType::Aluminum);
        assert_eq!("plastic_abs".parse::<MaterialType>().unwrap(), MaterialType::PlasticAbs);
        assert_eq!("Carbon-Fiber".parse::<MaterialType>().unwrap(), MaterialType::CarbonFiber);
        assert_eq!("unobtainium".parse::<MaterialType>().unwrap(), MaterialType::Unknown);
    }

    #[test]
    fn test_unknown_tag_deserializes() {
        let t: MaterialType = serde_json::from_str("\"Adamantium\"").unwrap();
        assert_eq!(t, MaterialType::Unknown);

        let t: MaterialType = serde_json::from_str("\"Titanium\"").unwrap();
        assert_eq!(t, MaterialType::Titanium);
    }

    #[test]
    fn test_catalog_order_matches_declaration() {
        let mut sorted = MaterialType::ALL;
        sorted.sort();
        assert_eq!(sorted, MaterialType::ALL);
    }
}
