//! Joint load, wear and precision analysis.

use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::Serialize;

use crate::analysis::{guarded_ratio, GRAVITY};
use crate::core::{AnalysisKind, Finding, Severity};
use crate::model::{Joint, JointType, RobotConfiguration};

/// Components closer than this to a joint count as carried by it (m).
pub const SUPPORT_RADIUS: f64 = 0.5;
/// Joints below this load safety factor are critical.
pub const CRITICAL_SAFETY_FACTOR: f64 = 2.0;
/// Backlash under this is precise enough (degrees).
pub const PRECISION_BACKLASH: f64 = 0.5;
/// Backlash above this earns a replacement suggestion (degrees).
pub const REPLACE_BACKLASH: f64 = 1.0;
pub const BASE_MAINTENANCE_CYCLES: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointDetail {
    pub name: String,
    pub joint_type: JointType,
    pub position: DVec3,
    pub min_angle: f64,
    pub max_angle: f64,
    pub total_range_of_motion: f64,
    /// N
    pub applied_load: f64,
    /// N
    pub load_capacity: f64,
    /// N·m
    pub max_torque: f64,
    pub load_safety_factor: f64,
    pub estimated_cycles: f64,
    pub wear_factor: f64,
    pub maintenance_interval: u64,
    pub required_flexibility: f64,
    pub actual_flexibility: f64,
    pub is_flexibility_sufficient: bool,
    pub backlash: f64,
    pub position_accuracy: f64,
    pub is_precision_sufficient: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JointAnalysisResult {
    pub timestamp: DateTime<Utc>,
    pub joints: Vec<JointDetail>,
    pub total_joints: usize,
    pub critical_joints: Vec<String>,
    pub all_joints_safe: bool,
    pub recommended_upgrades: Vec<String>,
}

impl JointAnalysisResult {
    pub fn joint(&self, name: &str) -> Option<&JointDetail> {
        self.joints.iter().find(|j| j.name == name)
    }

    pub(crate) fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        for j in &self.joints {
            if j.load_safety_factor < CRITICAL_SAFETY_FACTOR {
                findings.push(
                    Finding::new(
                        AnalysisKind::Joints,
                        Severity::Critical,
                        format!(
                            "Load safety factor {:.2} ({:.1} N applied, {:.1} N capacity)",
                            j.load_safety_factor, j.applied_load, j.load_capacity
                        ),
                    )
                    .with_component(&j.name)
                    .with_suggestion(upgrade_text(&j.name)),
                );
            }
            if j.backlash > REPLACE_BACKLASH {
                findings.push(
                    Finding::new(
                        AnalysisKind::Joints,
                        Severity::Warning,
                        format!("Backlash {:.2}° exceeds {:.1}°", j.backlash, REPLACE_BACKLASH),
                    )
                    .with_component(&j.name)
                    .with_suggestion(precision_text(&j.name, j.backlash)),
                );
            }
            if !j.is_flexibility_sufficient {
                findings.push(
                    Finding::new(
                        AnalysisKind::Joints,
                        Severity::Warning,
                        format!(
                            "Flexibility {:.2} below required {:.2}",
                            j.actual_flexibility, j.required_flexibility
                        ),
                    )
                    .with_component(&j.name),
                );
            }
        }
        findings
    }
}

fn upgrade_text(name: &str) -> String {
    format!("{}: Upgrade to higher load capacity joint", name)
}

fn precision_text(name: &str, backlash: f64) -> String {
    format!("{}: Replace with precision joint (current backlash: {:.2}°)", name, backlash)
}

pub fn analyze(robot: &RobotConfiguration) -> JointAnalysisResult {
    let joints: Vec<JointDetail> = robot.joints.iter().map(|j| evaluate_joint(j, robot)).collect();

    let critical_joints: Vec<String> = joints
        .iter()
        .filter(|j| j.load_safety_factor < CRITICAL_SAFETY_FACTOR)
        .map(|j| j.name.clone())
        .collect();

    let mut recommended_upgrades = Vec::new();
    for j in &joints {
        if j.load_safety_factor < CRITICAL_SAFETY_FACTOR {
            recommended_upgrades.push(upgrade_text(&j.name));
        }
        if j.backlash > REPLACE_BACKLASH {
            recommended_upgrades.push(precision_text(&j.name, j.backlash));
        }
    }

    tracing::debug!(
        joints = joints.len(),
        critical = critical_joints.len(),
        "Joint analysis complete"
    );

    JointAnalysisResult {
        timestamp: Utc::now(),
        total_joints: joints.len(),
        all_joints_safe: critical_joints.is_empty(),
        joints,
        critical_joints,
        recommended_upgrades,
    }
}

/// Weight (N) of every component within [`SUPPORT_RADIUS`] of the joint.
pub fn joint_load(joint: &Joint, robot: &RobotConfiguration) -> f64 {
    robot
        .all_components()
        .filter(|c| c.position().distance(joint.position) < SUPPORT_RADIUS)
        .map(|c| c.mass() * GRAVITY)
        .sum()
}

/// Normalized load times normalized usage. Zero capacity or zero rated life
/// saturates instead of producing NaN.
pub fn wear_factor(applied_load: f64, max_load_capacity: f64, total_cycles: f64, estimated_life_cycles: f64) -> f64 {
    let normalized_load = guarded_ratio(applied_load, max_load_capacity);
    let usage = guarded_ratio(total_cycles, estimated_life_cycles);
    (normalized_load * usage).min(f64::MAX)
}

pub fn maintenance_interval(wear_factor: f64) -> u64 {
    (BASE_MAINTENANCE_CYCLES / (1.0 + wear_factor)) as u64
}

fn evaluate_joint(joint: &Joint, robot: &RobotConfiguration) -> JointDetail {
    let applied_load = joint_load(joint, robot);

    let load_safety_factor = if applied_load > 0.0 {
        guarded_ratio(joint.max_load_capacity, applied_load)
    } else {
        f64::MAX
    };
    if joint.max_load_capacity <= 0.0 && applied_load > 0.0 {
        tracing::warn!(joint = %joint.name, "Joint has no load capacity");
    }

    let wear = wear_factor(
        applied_load,
        joint.max_load_capacity,
        joint.total_cycles,
        joint.estimated_life_cycles,
    );

    JointDetail {
        name: joint.name.clone(),
        joint_type: joint.joint_type,
        position: joint.position,
        min_angle: joint.min_angle,
        max_angle: joint.max_angle,
        total_range_of_motion: joint.max_angle - joint.min_angle,
        applied_load,
        load_capacity: joint.max_load_capacity,
        max_torque: applied_load * (joint.diameter / 2.0),
        load_safety_factor,
        estimated_cycles: joint.estimated_life_cycles,
        wear_factor: wear,
        maintenance_interval: maintenance_interval(wear),
        required_flexibility: joint.required_flexibility,
        actual_flexibility: joint.actual_flexibility,
        is_flexibility_sufficient: joint.actual_flexibility >= joint.required_flexibility,
        backlash: joint.backlash,
        position_accuracy: joint.position_accuracy,
        is_precision_sufficient: joint.backlash < PRECISION_BACKLASH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Motor, Servo};

    fn arm_robot(mass_near: f64) -> RobotConfiguration {
        let mut robot = RobotConfiguration::new("Arm");
        robot.add_component(Servo {
            name: "Wrist".to_string(),
            position: DVec3::new(0.0, 0.3, 0.0),
            mass: mass_near,
            ..Default::default()
        });
        robot.add_component(Motor {
            name: "Base".to_string(),
            position: DVec3::new(0.0, 0.0, 0.6),
            mass: 10.0,
            ..Default::default()
        });
        robot.add_joint(Joint {
            name: "Shoulder".to_string(),
            diameter: 0.02,
            min_angle: -90.0,
            max_angle: 45.0,
            ..Default::default()
        });
        robot
    }

    #[test]
    fn test_load_counts_only_nearby_components() {
        let result = analyze(&arm_robot(2.0));
        let shoulder = result.joint("Shoulder").unwrap();

        assert!((shoulder.applied_load - 19.62).abs() < 1e-9);
        assert!((shoulder.max_torque - 19.62 * 0.01).abs() < 1e-9);
        assert_eq!(shoulder.total_range_of_motion, 135.0);
        assert!((shoulder.load_safety_factor - 100.0 / 19.62).abs() < 1e-9);
        assert!(result.all_joints_safe);
    }

    #[test]
    fn test_overloaded_joint_is_critical() {
        let result = analyze(&arm_robot(6.0));

        assert!(!result.all_joints_safe);
        assert_eq!(result.critical_joints, vec!["Shoulder".to_string()]);
        assert_eq!(
            result.recommended_upgrades,
            vec!["Shoulder: Upgrade to higher load capacity joint".to_string()]
        );
    }

    #[test]
    fn test_no_joints_is_vacuously_safe() {
        let robot = RobotConfiguration::new("Rigid");
        let result = analyze(&robot);
        assert!(result.all_joints_safe);
        assert_eq!(result.total_joints, 0);
        assert!(result.findings().is_empty());
    }

    #[test]
    fn test_unloaded_joint_does_not_divide_by_zero() {
        let mut robot = RobotConfiguration::new("Free");
        robot.add_joint(Joint {
            name: "Idle".to_string(),
            total_cycles: 500.0,
            ..Default::default()
        });
        let result = analyze(&robot);
        let idle = result.joint("Idle").unwrap();
        assert_eq!(idle.load_safety_factor, f64::MAX);
        assert_eq!(idle.wear_factor, 0.0);
        assert_eq!(idle.maintenance_interval, 100_000);
    }

    #[test]
    fn test_zero_capacity_is_worst_case() {
        let mut robot = arm_robot(1.0);
        robot.joints[0].max_load_capacity = 0.0;
        let result = analyze(&robot);
        let shoulder = result.joint("Shoulder").unwrap();
        assert_eq!(shoulder.load_safety_factor, 0.0);
        assert!(!result.all_joints_safe);
    }

    #[test]
    fn test_wear_monotonic() {
        let loads = [0.0, 5.0, 20.0, 80.0];
        let cycles = [0.0, 1e3, 1e5, 1e6];
        for w in loads.windows(2) {
            for c in cycles {
                assert!(wear_factor(w[0], 100.0, c, 1e6) <= wear_factor(w[1], 100.0, c, 1e6));
            }
        }
        for w in cycles.windows(2) {
            for l in loads {
                assert!(wear_factor(l, 100.0, w[0], 1e6) <= wear_factor(l, 100.0, w[1], 1e6));
            }
        }
    }

    #[test]
    fn test_maintenance_interval() {
        assert_eq!(maintenance_interval(0.0), 100_000);
        assert_eq!(maintenance_interval(1.0), 50_000);
        assert_eq!(maintenance_interval(f64::MAX), 0);
    }

    #[test]
    fn test_backlash_and_flexibility_findings() {
        let mut robot = RobotConfiguration::new("Loose");
        robot.add_joint(Joint {
            name: "Elbow".to_string(),
            backlash: 1.25,
            actual_flexibility: 0.2,
            required_flexibility: 0.5,
            ..Default::default()
        });
        let result = analyze(&robot);
        let elbow = result.joint("Elbow").unwrap();
        assert!(!elbow.is_precision_sufficient);
        assert!(!elbow.is_flexibility_sufficient);
        assert_eq!(
            result.recommended_upgrades,
            vec!["Elbow: Replace with precision joint (current backlash: 1.25°)".to_string()]
        );

        let findings = result.findings();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
    }
}
