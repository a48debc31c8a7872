//! Thermal analysis.
//!
//! Motors, the electronics block and the battery are modeled as heat sources
//! with a fixed thermal resistance each. Motor heat is also spread into a
//! 10×10×10 voxel map covering a ±0.5 m cube around the robot origin using a
//! radius-limited inverse-square falloff. This is an additive approximation,
//! not a diffusion solve.

use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::Serialize;

use crate::core::{AnalysisKind, Finding, Severity};
use crate::model::RobotConfiguration;

pub const GRID_SIZE: usize = 10;

/// K/W
pub const MOTOR_THERMAL_RESISTANCE: f64 = 5.0;
/// K/W
pub const ELECTRONICS_THERMAL_RESISTANCE: f64 = 10.0;
/// K/W
pub const BATTERY_THERMAL_RESISTANCE: f64 = 8.0;

pub const DIFFUSION_RATE: f64 = 0.1;
/// Neighborhood radius in voxels.
pub const SPREAD_RADIUS: i64 = 2;

/// W per sensor
pub const SENSOR_POWER: f64 = 0.05;
/// W
pub const MISC_ELECTRONICS_POWER: f64 = 0.3;
/// W per mAh of capacity
pub const BATTERY_POWER_PER_MAH: f64 = 0.001;

pub const ELECTRONICS: &str = "Electronics";
pub const BATTERY: &str = "Battery";

const PASSIVE_COOLING_ABOVE: f64 = 70.0;
const ACTIVE_COOLING_ABOVE: f64 = 80.0;
const THERMAL_PATH_ABOVE_W: f64 = 10.0;

/// Flat 10×10×10 grid of accumulated heat contributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatMap {
    cells: Vec<f64>,
}

impl Default for HeatMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatMap {
    pub fn new() -> Self {
        Self {
            cells: vec![0.0; GRID_SIZE * GRID_SIZE * GRID_SIZE],
        }
    }

    fn offset(x: usize, y: usize, z: usize) -> usize {
        (x * GRID_SIZE + y) * GRID_SIZE + z
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        if x < GRID_SIZE && y < GRID_SIZE && z < GRID_SIZE {
            self.cells.get(Self::offset(x, y, z)).copied()
        } else {
            None
        }
    }

    /// Voxel containing a robot-local position, clamped to the grid.
    pub fn world_to_grid(position: DVec3) -> [usize; 3] {
        let axis = |c: f64| ((c + 0.5) * GRID_SIZE as f64).floor().clamp(0.0, (GRID_SIZE - 1) as f64) as usize;
        [axis(position.x), axis(position.y), axis(position.z)]
    }

    /// Add `power · DIFFUSION_RATE / d²` to every in-bounds voxel within
    /// [`SPREAD_RADIUS`] of `source` on each axis. The source voxel itself
    /// receives nothing.
    pub fn spread(&mut self, source: [usize; 3], power: f64) {
        for dx in -SPREAD_RADIUS..=SPREAD_RADIUS {
            for dy in -SPREAD_RADIUS..=SPREAD_RADIUS {
                for dz in -SPREAD_RADIUS..=SPREAD_RADIUS {
                    let d2 = (dx * dx + dy * dy + dz * dz) as f64;
                    if d2 == 0.0 {
                        continue;
                    }
                    let (Some(x), Some(y), Some(z)) = (
                        shifted(source[0], dx),
                        shifted(source[1], dy),
                        shifted(source[2], dz),
                    ) else {
                        continue;
                    };
                    self.cells[Self::offset(x, y, z)] += power * DIFFUSION_RATE / d2;
                }
            }
        }
    }

    /// Voxel with the largest accumulated heat, first in x-y-z order on ties.
    pub fn hottest(&self) -> Option<HotVoxel> {
        let mut best: Option<HotVoxel> = None;
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                for z in 0..GRID_SIZE {
                    let heat = self.cells[Self::offset(x, y, z)];
                    if heat > best.map_or(0.0, |b| b.heat) {
                        best = Some(HotVoxel { index: [x, y, z], heat });
                    }
                }
            }
        }
        best
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }
}

fn shifted(base: usize, delta: i64) -> Option<usize> {
    let v = base as i64 + delta;
    (0..GRID_SIZE as i64).contains(&v).then_some(v as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HotVoxel {
    pub index: [usize; 3],
    pub heat: f64,
}

/// Steady-state estimate for one heat source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentTemperature {
    pub name: String,
    /// W turned into heat
    pub heat_dissipated: f64,
    /// °C
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThermalAnalysisResult {
    pub timestamp: DateTime<Utc>,
    pub ambient_temperature: f64,
    pub max_operating_temp: f64,
    /// Motors in robot order, then electronics, then battery.
    pub component_temperatures: Vec<ComponentTemperature>,
    pub heat_map: HeatMap,
    pub hottest_voxel: Option<HotVoxel>,
    pub max_temperature: f64,
    pub hot_spot_component: Option<String>,
    /// W
    pub total_power_dissipation: f64,
    pub is_thermal_safe: bool,
    pub cooling_recommendations: Vec<String>,
}

impl ThermalAnalysisResult {
    pub fn temperature_of(&self, name: &str) -> Option<f64> {
        self.component_temperatures
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.temperature)
    }

    pub(crate) fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        if !self.is_thermal_safe {
            let mut f = Finding::new(
                AnalysisKind::Thermal,
                Severity::Critical,
                format!(
                    "Reaches {:.1}°C, limit is {:.1}°C",
                    self.max_temperature, self.max_operating_temp
                ),
            );
            if let Some(name) = &self.hot_spot_component {
                f = f.with_component(name);
            }
            findings.push(f);
        }
        for rec in &self.cooling_recommendations {
            let mut f = Finding::new(AnalysisKind::Thermal, Severity::Info, rec.clone());
            if let Some(name) = &self.hot_spot_component {
                f = f.with_component(name);
            }
            findings.push(f);
        }
        findings
    }
}

pub fn analyze(robot: &RobotConfiguration, ambient_temperature: f64, max_operating_temp: f64) -> ThermalAnalysisResult {
    let mut heat_map = HeatMap::new();
    let mut component_temperatures = Vec::new();
    let mut total_power_dissipation = 0.0;

    for motor in robot.motors() {
        let heat = motor.electrical_power() * (1.0 - motor.efficiency);
        total_power_dissipation += heat;
        component_temperatures.push(ComponentTemperature {
            name: motor.name.clone(),
            heat_dissipated: heat,
            temperature: ambient_temperature + heat * MOTOR_THERMAL_RESISTANCE,
        });
        heat_map.spread(HeatMap::world_to_grid(motor.position), heat);
    }

    let electronics_power =
        robot.board_type.base_power_w() + SENSOR_POWER * robot.sensors().count() as f64 + MISC_ELECTRONICS_POWER;
    total_power_dissipation += electronics_power;
    component_temperatures.push(ComponentTemperature {
        name: ELECTRONICS.to_string(),
        heat_dissipated: electronics_power,
        temperature: ambient_temperature + electronics_power * ELECTRONICS_THERMAL_RESISTANCE,
    });

    let battery_power = robot.battery_capacity * BATTERY_POWER_PER_MAH;
    total_power_dissipation += battery_power;
    component_temperatures.push(ComponentTemperature {
        name: BATTERY.to_string(),
        heat_dissipated: battery_power,
        temperature: ambient_temperature + battery_power * BATTERY_THERMAL_RESISTANCE,
    });

    let mut max_temperature = ambient_temperature;
    let mut hot_spot_component = None;
    for c in &component_temperatures {
        if c.temperature > max_temperature {
            max_temperature = c.temperature;
            hot_spot_component = Some(c.name.clone());
        }
    }

    let is_thermal_safe = max_temperature < max_operating_temp;

    let mut cooling_recommendations = Vec::new();
    if max_temperature > PASSIVE_COOLING_ABOVE {
        cooling_recommendations.push("Add passive heatsinks to hot components".to_string());
    }
    if max_temperature > ACTIVE_COOLING_ABOVE {
        cooling_recommendations.push("Consider active cooling (fan) for critical components".to_string());
    }
    if total_power_dissipation > THERMAL_PATH_ABOVE_W {
        cooling_recommendations.push("Improve thermal design: increase surface area or add thermal vias".to_string());
    }

    tracing::debug!(
        max_temperature,
        total_power_dissipation,
        safe = is_thermal_safe,
        "Thermal analysis complete"
    );

    ThermalAnalysisResult {
        timestamp: Utc::now(),
        ambient_temperature,
        max_operating_temp,
        component_temperatures,
        hottest_voxel: heat_map.hottest(),
        heat_map,
        max_temperature,
        hot_spot_component,
        total_power_dissipation,
        is_thermal_safe,
        cooling_recommendations,
    }
}
