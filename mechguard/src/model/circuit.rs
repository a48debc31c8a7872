//! Circuit configuration: the electrical side of a design.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::MechGuardError;
use crate::model::robot::{BoardType, Connector};

/// One part on the schematic. Electrical values are filled in by the circuit
/// simulator; the analyzers here only read names and connectivity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitComponent {
    pub name: String,
    /// e.g. "Resistor", "Capacitor", "IC"
    pub component_type: String,
    /// Schematic position.
    pub position: DVec2,
    pub voltage: f64,
    pub current: f64,
    pub power_dissipation: f64,
    pub temperature: f64,
}

impl CircuitComponent {
    pub fn new(name: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_type: component_type.into(),
            ..Default::default()
        }
    }
}

/// A wire between two circuit components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub from_component: String,
    pub to_component: String,
    /// "Power", "Ground", "Digital", "Analog"
    pub signal_type: String,
    /// m
    pub length: f64,
    /// Ω
    pub impedance: f64,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>, signal_type: impl Into<String>) -> Self {
        Self {
            from_component: from.into(),
            to_component: to.into(),
            signal_type: signal_type.into(),
            ..Default::default()
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn is_power(&self) -> bool {
        self.signal_type.eq_ignore_ascii_case("power")
    }

    pub fn is_ground(&self) -> bool {
        self.signal_type.eq_ignore_ascii_case("ground")
    }
}

/// Candidate control/power circuit for a robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfiguration {
    pub name: String,
    pub board_type: BoardType,
    /// V
    pub supply_voltage: f64,
    /// W
    pub total_power_supply: f64,
    pub components: Vec<CircuitComponent>,
    pub connections: Vec<Connection>,
    pub available_connectors: Vec<Connector>,
}

impl Default for CircuitConfiguration {
    fn default() -> Self {
        Self {
            name: String::new(),
            board_type: BoardType::ArduinoUno,
            supply_voltage: 12.0,
            total_power_supply: 20.0,
            components: Vec::new(),
            connections: Vec::new(),
            available_connectors: Vec::new(),
        }
    }
}

impl CircuitConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MechGuardError> {
        serde_json::from_str(json).map_err(|e| MechGuardError::Parse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, MechGuardError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| MechGuardError::Parse(format!("{}: {}", path.display(), e)))
    }

    pub fn to_file(&self, path: &Path) -> Result<(), MechGuardError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| MechGuardError::Other(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
