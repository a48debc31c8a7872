//! Weight distribution and balance.
//!
//! Center of mass from the component list, a tip-over heuristic against the
//! vehicle footprint, a four-wheel load split for ground rovers and a
//! diagonal inertia tensor.

use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::Serialize;

use crate::analysis::{guarded_ratio, GRAVITY};
use crate::core::{AnalysisKind, Finding, Severity};
use crate::model::{RobotConfiguration, VehicleType};

/// CoM must stay inside this share of the half footprint.
pub const STABLE_FOOTPRINT_SHARE: f64 = 0.8;
/// Wheel loads may differ by less than this share of the heaviest wheel.
pub const MAX_WHEEL_IMBALANCE: f64 = 0.3;
/// Margins below this (m) earn a wider-stance suggestion.
pub const MIN_STABILITY_MARGIN: f64 = 0.05;

const LOWER_COM: &str = "Lower center of mass by relocating heavy components";
const REDISTRIBUTE: &str = "Redistribute weight for better balance";
const WIDEN_STANCE: &str = "Increase wheelbase or track width for better stability";

/// Per-wheel normal load in newtons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelLoads {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

impl WheelLoads {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("FrontLeft", self.front_left),
            ("FrontRight", self.front_right),
            ("RearLeft", self.rear_left),
            ("RearRight", self.rear_right),
        ]
        .into_iter()
    }

    pub fn max(&self) -> f64 {
        self.iter().map(|(_, l)| l).fold(f64::MIN, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.iter().map(|(_, l)| l).fold(f64::MAX, f64::min)
    }

    /// `(max - min) / max` below the imbalance limit. A non-positive heaviest
    /// wheel is balanced only if every wheel carries the same load.
    pub fn is_balanced(&self) -> bool {
        let (max, min) = (self.max(), self.min());
        if max <= 0.0 {
            return max == min;
        }
        (max - min) / max < MAX_WHEEL_IMBALANCE
    }
}

/// Diagonal moments of inertia about the center of mass, kg·m².
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InertiaTensor {
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightDistributionResult {
    pub timestamp: DateTime<Utc>,
    /// Component masses in robot order.
    pub component_weights: Vec<(String, f64)>,
    /// kg
    pub total_mass: f64,
    pub center_of_mass: DVec3,
    pub is_stable: bool,
    /// m, negative when the CoM is already outside the footprint
    pub stability_margin: f64,
    /// Only computed for ground rovers.
    pub wheel_loads: Option<WheelLoads>,
    pub is_balanced: bool,
    pub inertia_tensor: InertiaTensor,
    pub recommendations: Vec<String>,
}

impl WeightDistributionResult {
    pub(crate) fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        if !self.is_stable {
            findings.push(
                Finding::new(
                    AnalysisKind::Weight,
                    Severity::Critical,
                    format!(
                        "Center of mass at ({:.3}, {:.3}, {:.3}) m is outside the stable footprint",
                        self.center_of_mass.x, self.center_of_mass.y, self.center_of_mass.z
                    ),
                )
                .with_suggestion(LOWER_COM),
            );
        }
        if !self.is_balanced {
            let detail = self
                .wheel_loads
                .map(|w| format!(" ({:.1} N to {:.1} N)", w.min(), w.max()))
                .unwrap_or_default();
            findings.push(
                Finding::new(AnalysisKind::Weight, Severity::Warning, format!("Wheel loads are unbalanced{}", detail))
                    .with_suggestion(REDISTRIBUTE),
            );
        }
        if self.stability_margin < MIN_STABILITY_MARGIN {
            findings.push(
                Finding::new(
                    AnalysisKind::Weight,
                    Severity::Warning,
                    format!("Stability margin {:.3} m", self.stability_margin),
                )
                .with_suggestion(WIDEN_STANCE),
            );
        }
        findings
    }
}

pub fn analyze(robot: &RobotConfiguration) -> WeightDistributionResult {
    let mut total_mass = 0.0;
    let mut moment = DVec3::ZERO;
    let mut component_weights = Vec::with_capacity(robot.components.len());

    for c in robot.all_components() {
        total_mass += c.mass();
        moment += c.position() * c.mass();
        component_weights.push((c.name().to_string(), c.mass()));
    }

    let center_of_mass = if total_mass > 0.0 {
        moment / total_mass
    } else {
        tracing::warn!(robot = %robot.name, "Robot has no mass, placing center of mass at origin");
        DVec3::ZERO
    };

    let is_stable = check_stability(center_of_mass, robot.vehicle_width, robot.vehicle_length);
    let stability_margin = stability_margin(center_of_mass, robot.vehicle_width, robot.vehicle_length);

    let wheel_loads = match robot.vehicle_type {
        VehicleType::GroundRover => Some(wheel_loads(center_of_mass, robot)),
        _ => None,
    };
    let is_balanced = wheel_loads.map_or(true, |w| w.is_balanced());

    let inertia_tensor = inertia_tensor(robot, center_of_mass);

    let mut recommendations = Vec::new();
    if !is_stable {
        recommendations.push(LOWER_COM.to_string());
    }
    if !is_balanced {
        recommendations.push(REDISTRIBUTE.to_string());
    }
    if stability_margin < MIN_STABILITY_MARGIN {
        recommendations.push(WIDEN_STANCE.to_string());
    }

    tracing::debug!(
        total_mass,
        stable = is_stable,
        balanced = is_balanced,
        stability_margin,
        "Weight analysis complete"
    );

    WeightDistributionResult {
        timestamp: Utc::now(),
        component_weights,
        total_mass,
        center_of_mass,
        is_stable,
        stability_margin,
        wheel_loads,
        is_balanced,
        inertia_tensor,
        recommendations,
    }
}

/// CoM inside 80 % of the half footprint and lower than the vehicle is wide.
pub fn check_stability(com: DVec3, width: f64, length: f64) -> bool {
    let half_width = width / 2.0;
    let half_length = length / 2.0;
    com.x.abs() < half_width * STABLE_FOOTPRINT_SHARE && com.z.abs() < half_length * STABLE_FOOTPRINT_SHARE && com.y < width
}

pub fn stability_margin(com: DVec3, width: f64, length: f64) -> f64 {
    let margin_x = width / 2.0 - com.x.abs();
    let margin_z = length / 2.0 - com.z.abs();
    margin_x.min(margin_z)
}

fn wheel_loads(com: DVec3, robot: &RobotConfiguration) -> WheelLoads {
    let total_weight = robot.total_mass * GRAVITY;
    let wheelbase = robot.vehicle_length;
    let track = robot.vehicle_width;

    if wheelbase <= 0.0 || track <= 0.0 {
        tracing::warn!(wheelbase, track, "Degenerate footprint, assuming an even wheel split");
    }

    let front = if wheelbase > 0.0 { 0.5 + guarded_ratio(com.z, wheelbase) } else { 0.5 };
    let rear = 1.0 - front;
    let left = if track > 0.0 { 0.5 - guarded_ratio(com.x, track) } else { 0.5 };
    let right = 1.0 - left;

    WheelLoads {
        front_left: total_weight * front * left,
        front_right: total_weight * front * right,
        rear_left: total_weight * rear * left,
        rear_right: total_weight * rear * right,
    }
}

fn inertia_tensor(robot: &RobotConfiguration, com: DVec3) -> InertiaTensor {
    let mut tensor = InertiaTensor::default();
    for c in robot.all_components() {
        let m = c.mass();
        let r = c.position() - com;
        tensor.ixx += m * (r.y * r.y + r.z * r.z);
        tensor.iyy += m * (r.x * r.x + r.z * r.z);
        tensor.izz += m * (r.x * r.x + r.y * r.y);
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Motor, Sensor};

    fn two_masses(a: DVec3, b: DVec3) -> RobotConfiguration {
        let mut robot = RobotConfiguration::new("Pair");
        robot.add_component(Motor {
            name: "A".to_string(),
            position: a,
            mass: 2.0,
            ..Default::default()
        });
        robot.add_component(Motor {
            name: "B".to_string(),
            position: b,
            mass: 2.0,
            ..Default::default()
        });
        robot
    }

    #[test]
    fn test_symmetric_center_of_mass() {
        let robot = two_masses(DVec3::new(0.1, 0.0, 0.0), DVec3::new(-0.1, 0.0, 0.0));
        let result = analyze(&robot);

        assert_eq!(result.center_of_mass.x, 0.0);
        assert_eq!(result.total_mass, 4.0);
        assert!(result.is_stable);
        assert!(result.is_balanced);
        assert!((result.stability_margin - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_inertia_about_center_of_mass() {
        let robot = two_masses(DVec3::new(0.1, 0.0, 0.0), DVec3::new(-0.1, 0.0, 0.0));
        let tensor = analyze(&robot).inertia_tensor;

        assert_eq!(tensor.ixx, 0.0);
        assert!((tensor.iyy - 0.04).abs() < 1e-12);
        assert!((tensor.izz - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_offset_mass_is_unstable_and_unbalanced() {
        let robot = two_masses(DVec3::new(0.14, 0.0, 0.0), DVec3::new(0.14, 0.0, 0.0));
        let result = analyze(&robot);

        // 0.14 > 0.8 · 0.15
        assert!(!result.is_stable);
        assert!(!result.is_balanced);
        assert!((result.stability_margin - 0.01).abs() < 1e-12);
        assert_eq!(
            result.recommendations,
            vec![LOWER_COM.to_string(), REDISTRIBUTE.to_string(), WIDEN_STANCE.to_string()]
        );
    }

    #[test]
    fn test_wheel_loads_use_declared_mass() {
        let mut robot = two_masses(DVec3::ZERO, DVec3::ZERO);
        robot.total_mass = 10.0;
        let loads = analyze(&robot).wheel_loads.unwrap();

        let expected = 10.0 * GRAVITY / 4.0;
        for (_, load) in loads.iter() {
            assert!((load - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wheel_load_bias() {
        let mut robot = two_masses(DVec3::new(0.0, 0.0, 0.1), DVec3::new(0.0, 0.0, 0.1));
        robot.total_mass = 1.0;
        let loads = analyze(&robot).wheel_loads.unwrap();

        // front bias 0.5 + 0.1 / 0.4 = 0.75
        assert!((loads.front_left - GRAVITY * 0.75 * 0.5).abs() < 1e-9);
        assert!((loads.rear_right - GRAVITY * 0.25 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_rover_has_no_wheel_loads() {
        let mut robot = two_masses(DVec3::new(0.14, 0.0, 0.0), DVec3::new(0.14, 0.0, 0.0));
        robot.vehicle_type = VehicleType::Drone;
        let result = analyze(&robot);
        assert!(result.wheel_loads.is_none());
        assert!(result.is_balanced);
    }

    #[test]
    fn test_massless_robot_is_guarded() {
        let mut robot = RobotConfiguration::new("Ghost");
        robot.add_component(Sensor {
            name: "Eye".to_string(),
            position: DVec3::new(0.3, 0.3, 0.3),
            ..Default::default()
        });
        let result = analyze(&robot);
        assert_eq!(result.center_of_mass, DVec3::ZERO);
        assert!(result.center_of_mass.is_finite());
        assert!(result.is_stable);
    }

    #[test]
    fn test_zero_footprint_does_not_divide_by_zero() {
        let mut robot = two_masses(DVec3::ZERO, DVec3::ZERO);
        robot.vehicle_width = 0.0;
        robot.vehicle_length = 0.0;
        let result = analyze(&robot);

        assert!(!result.is_stable);
        let loads = result.wheel_loads.unwrap();
        assert!(loads.iter().all(|(_, l)| l.is_finite()));
        assert!(result.is_balanced);
    }

    #[test]
    fn test_all_zero_loads_are_balanced() {
        let loads = WheelLoads {
            front_left: 0.0,
            front_right: 0.0,
            rear_left: 0.0,
            rear_right: 0.0,
        };
        assert!(loads.is_balanced());
    }
}
