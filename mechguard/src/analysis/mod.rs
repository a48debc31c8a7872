//! Feasibility Analyzers
//!
//! Five independent checks over a [`RobotConfiguration`]:
//! - [`stress`]: structural safety factor per member
//! - [`thermal`]: heat sources and a coarse 3D heat map
//! - [`joints`]: load, wear and precision per joint
//! - [`balance`]: center of mass, tip-over margin, wheel loads, inertia
//! - [`compatibility`]: whether a circuit can power and drive the robot
//!
//! Every analyzer is a pure function of its inputs and the read-only
//! [`MaterialCatalog`]. Results are fresh snapshots owned by the caller.

pub mod balance;
pub mod compatibility;
pub mod joints;
pub mod stress;
pub mod thermal;

use crate::core::AnalysisOptions;
use crate::materials::MaterialCatalog;
use crate::model::{CircuitConfiguration, RobotConfiguration};

use balance::WeightDistributionResult;
use compatibility::CircuitCompatibilityResult;
use joints::JointAnalysisResult;
use stress::StressAnalysisResult;
use thermal::ThermalAnalysisResult;

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.81;

/// `num / den` without NaN: a positive numerator over a non-positive
/// denominator saturates to `f64::MAX`, zero over zero is zero.
pub(crate) fn guarded_ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else if num > 0.0 {
        f64::MAX
    } else {
        0.0
    }
}

/// Holds the analysis options and material catalog and runs the analyzers.
///
/// Cheap to share across threads; no analysis mutates it.
#[derive(Debug, Clone)]
pub struct RobotAnalyzer {
    options: AnalysisOptions,
    catalog: MaterialCatalog,
}

impl RobotAnalyzer {
    pub fn new(options: AnalysisOptions, catalog: MaterialCatalog) -> Self {
        Self { options, catalog }
    }

    /// Default options with a caller-supplied catalog.
    pub fn with_catalog(catalog: MaterialCatalog) -> Self {
        Self::new(AnalysisOptions::default(), catalog)
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn analyze_stress(&self, robot: &RobotConfiguration) -> StressAnalysisResult {
        stress::analyze(robot, &self.catalog, self.options.safety_factor)
    }

    pub fn analyze_thermal(&self, robot: &RobotConfiguration, ambient_temperature: f64) -> ThermalAnalysisResult {
        thermal::analyze(robot, ambient_temperature, self.options.max_operating_temp)
    }

    pub fn analyze_joints(&self, robot: &RobotConfiguration) -> JointAnalysisResult {
        joints::analyze(robot)
    }

    pub fn analyze_weight_distribution(&self, robot: &RobotConfiguration) -> WeightDistributionResult {
        balance::analyze(robot)
    }

    pub fn check_circuit_compatibility(
        &self,
        robot: &RobotConfiguration,
        circuit: &CircuitConfiguration,
    ) -> CircuitCompatibilityResult {
        compatibility::analyze(robot, circuit)
    }
}

impl Default for RobotAnalyzer {
    fn default() -> Self {
        Self::with_catalog(MaterialCatalog::builtin())
    }
}
