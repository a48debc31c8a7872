//! Robot configuration: the mechanical side of a design.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::MechGuardError;
use crate::materials::MaterialType;

/// Locomotion family of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    GroundRover,
    Drone,
    Walker,
    Arm,
    #[serde(other)]
    Unknown,
}

/// Controller board driving the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardType {
    ArduinoUno,
    ArduinoMega,
    RaspberryPi,
    #[serde(other)]
    Unknown,
}

impl BoardType {
    /// GPIO pins the analyzers assume are usable on this board.
    pub fn available_pins(&self) -> u32 {
        match self {
            BoardType::ArduinoMega => 54,
            _ => 14,
        }
    }

    /// Idle draw of the board itself in watts.
    pub fn base_power_w(&self) -> f64 {
        match self {
            BoardType::ArduinoMega => 0.5,
            _ => 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointType {
    Revolute,
    Prismatic,
    Fixed,
    Spherical,
    Universal,
}

/// DC drive motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Motor {
    pub name: String,
    /// Robot-local position in meters.
    pub position: DVec3,
    /// kg
    pub mass: f64,
    /// V
    pub voltage: f64,
    /// A
    pub current: f64,
    /// Electrical-to-mechanical efficiency in `[0, 1]`.
    pub efficiency: f64,
    pub required_pins: u32,
}

impl Default for Motor {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: DVec3::ZERO,
            mass: 0.0,
            voltage: 0.0,
            current: 0.0,
            efficiency: 0.8,
            required_pins: 2,
        }
    }
}

impl Motor {
    pub fn electrical_power(&self) -> f64 {
        self.voltage * self.current
    }
}

/// Hobby servo. Always driven from a single PWM pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Servo {
    pub name: String,
    pub position: DVec3,
    pub mass: f64,
    /// W
    pub power_consumption: f64,
    /// N·m
    pub max_torque: f64,
    pub required_pins: u32,
}

impl Default for Servo {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: DVec3::ZERO,
            mass: 0.0,
            power_consumption: 1.0,
            max_torque: 0.0,
            required_pins: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensor {
    pub name: String,
    pub position: DVec3,
    pub mass: f64,
    /// Free-form kind, e.g. "Ultrasonic", "LineFollower", "Color".
    pub sensor_type: String,
    /// W
    pub power_consumption: f64,
    pub required_pins: u32,
}

impl Default for Sensor {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: DVec3::ZERO,
            mass: 0.0,
            sensor_type: String::new(),
            power_consumption: 0.05,
            required_pins: 1,
        }
    }
}

/// Load-bearing member of the chassis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralComponent {
    pub name: String,
    pub position: DVec3,
    pub mass: f64,
    pub material: MaterialType,
    /// m
    pub width: f64,
    /// m
    pub height: f64,
    /// m
    pub thickness: f64,
    /// Share of the robot's total weight carried by this member.
    pub load_factor: f64,
    pub has_joints: bool,
    /// m
    pub joint_hole_diameter: f64,
}

impl Default for StructuralComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: DVec3::ZERO,
            mass: 0.0,
            material: MaterialType::Aluminum,
            width: 0.0,
            height: 0.0,
            thickness: 0.0,
            load_factor: 1.0,
            has_joints: false,
            joint_hole_diameter: 0.0,
        }
    }
}

impl StructuralComponent {
    /// Cross-section area in m².
    pub fn cross_section_area(&self) -> f64 {
        self.width * self.height
    }
}

/// Any part with a mass and a position on the robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Motor(Motor),
    Servo(Servo),
    Sensor(Sensor),
    Structural(StructuralComponent),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Motor(c) => &c.name,
            Component::Servo(c) => &c.name,
            Component::Sensor(c) => &c.name,
            Component::Structural(c) => &c.name,
        }
    }

    pub fn position(&self) -> DVec3 {
        match self {
            Component::Motor(c) => c.position,
            Component::Servo(c) => c.position,
            Component::Sensor(c) => c.position,
            Component::Structural(c) => c.position,
        }
    }

    pub fn mass(&self) -> f64 {
        match self {
            Component::Motor(c) => c.mass,
            Component::Servo(c) => c.mass,
            Component::Sensor(c) => c.mass,
            Component::Structural(c) => c.mass,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Component::Motor(_) => "motor",
            Component::Servo(_) => "servo",
            Component::Sensor(_) => "sensor",
            Component::Structural(_) => "structural",
        }
    }
}

impl From<Motor> for Component {
    fn from(m: Motor) -> Self {
        Component::Motor(m)
    }
}

impl From<Servo> for Component {
    fn from(s: Servo) -> Self {
        Component::Servo(s)
    }
}

impl From<Sensor> for Component {
    fn from(s: Sensor) -> Self {
        Component::Sensor(s)
    }
}

impl From<StructuralComponent> for Component {
    fn from(s: StructuralComponent) -> Self {
        Component::Structural(s)
    }
}

/// Mechanical joint between parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Joint {
    pub name: String,
    pub joint_type: JointType,
    pub position: DVec3,
    /// m
    pub diameter: f64,
    /// degrees
    pub min_angle: f64,
    /// degrees
    pub max_angle: f64,
    /// N
    pub max_load_capacity: f64,
    pub estimated_life_cycles: f64,
    pub total_cycles: f64,
    pub required_flexibility: f64,
    pub actual_flexibility: f64,
    /// degrees
    pub backlash: f64,
    /// degrees
    pub position_accuracy: f64,
}

impl Default for Joint {
    fn default() -> Self {
        Self {
            name: String::new(),
            joint_type: JointType::Revolute,
            position: DVec3::ZERO,
            diameter: 0.01,
            min_angle: -180.0,
            max_angle: 180.0,
            max_load_capacity: 100.0,
            estimated_life_cycles: 1_000_000.0,
            total_cycles: 0.0,
            required_flexibility: 0.5,
            actual_flexibility: 1.0,
            backlash: 0.2,
            position_accuracy: 0.1,
        }
    }
}

impl Joint {
    /// Describe every violated invariant. Empty means the joint is well formed.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.min_angle > self.max_angle {
            problems.push(format!(
                "{}: min angle {:.1}° exceeds max angle {:.1}°",
                self.name, self.min_angle, self.max_angle
            ));
        }
        if self.diameter <= 0.0 {
            problems.push(format!("{}: diameter must be positive (got {})", self.name, self.diameter));
        }
        problems
    }
}

/// Physical connector on either the robot or the circuit side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Connector {
    pub name: String,
    /// Free-form family, e.g. "USB", "JST", "GPIO".
    pub connector_type: String,
    /// "Male" or "Female".
    pub gender: String,
    pub pin_count: u32,
}

impl Connector {
    pub fn new(name: impl Into<String>, connector_type: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connector_type: connector_type.into(),
            gender: gender.into(),
            pin_count: 0,
        }
    }

    pub fn with_pins(mut self, pin_count: u32) -> Self {
        self.pin_count = pin_count;
        self
    }

    /// Same family, opposite gender.
    pub fn mates_with(&self, other: &Connector) -> bool {
        self.connector_type == other.connector_type && self.gender != other.gender
    }
}

/// Complete mechanical description of a robot.
///
/// Produced by an editor and handed to the analyzers as a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfiguration {
    pub name: String,
    pub vehicle_type: VehicleType,
    pub board_type: BoardType,

    /// m
    pub vehicle_width: f64,
    /// m
    pub vehicle_length: f64,
    /// m
    pub vehicle_height: f64,
    /// Declared mass of the whole vehicle in kg.
    pub total_mass: f64,
    pub center_of_mass: DVec3,

    /// V
    pub operating_voltage: f64,
    /// mAh
    pub battery_capacity: f64,

    pub components: Vec<Component>,
    pub joints: Vec<Joint>,
    pub required_connectors: Vec<Connector>,
}

impl Default for RobotConfiguration {
    fn default() -> Self {
        Self {
            name: String::new(),
            vehicle_type: VehicleType::GroundRover,
            board_type: BoardType::ArduinoUno,
            vehicle_width: 0.3,
            vehicle_length: 0.4,
            vehicle_height: 0.2,
            total_mass: 5.0,
            center_of_mass: DVec3::ZERO,
            operating_voltage: 12.0,
            battery_capacity: 5000.0,
            components: Vec::new(),
            joints: Vec::new(),
            required_connectors: Vec::new(),
        }
    }
}

impl RobotConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_component(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    pub fn add_joint(&mut self, joint: Joint) {
        self.joints.push(joint);
    }

    pub fn add_required_connector(&mut self, connector: Connector) {
        self.required_connectors.push(connector);
    }

    /// Every component in insertion order.
    pub fn all_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn motors(&self) -> impl Iterator<Item = &Motor> {
        self.components.iter().filter_map(|c| match c {
            Component::Motor(m) => Some(m),
            _ => None,
        })
    }

    pub fn servos(&self) -> impl Iterator<Item = &Servo> {
        self.components.iter().filter_map(|c| match c {
            Component::Servo(s) => Some(s),
            _ => None,
        })
    }

    pub fn sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.components.iter().filter_map(|c| match c {
            Component::Sensor(s) => Some(s),
            _ => None,
        })
    }

    pub fn structural_components(&self) -> impl Iterator<Item = &StructuralComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::Structural(s) => Some(s),
            _ => None,
        })
    }

    /// Sum of component masses in kg.
    pub fn component_mass(&self) -> f64 {
        self.components.iter().map(Component::mass).sum()
    }

    /// Advisory list of malformed joints.
    pub fn validate(&self) -> Vec<String> {
        self.joints.iter().flat_map(Joint::validate).collect()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_robot() -> RobotConfiguration {
        let mut robot = RobotConfiguration::new("Rover");
        robot.add_component(Motor {
            name: "LeftDrive".to_string(),
            mass: 0.3,
            voltage: 12.0,
            current: 1.5,
            ..Default::default()
        });
        robot.add_component(Sensor {
            name: "Sonar".to_string(),
            mass: 0.05,
            sensor_type: "Ultrasonic".to_string(),
            ..Default::default()
        });
        robot.add_component(StructuralComponent {
            name: "Chassis".to_string(),
            mass: 1.2,
            width: 0.2,
            height: 0.005,
            thickness: 0.005,
            ..Default::default()
        });
        robot
    }

    #[test]
    fn test_typed_iterators() {
        let robot = sample_robot();
        assert_eq!(robot.motors().count(), 1);
        assert_eq!(robot.servos().count(), 0);
        assert_eq!(robot.sensors().count(), 1);
        assert_eq!(robot.structural_components().count(), 1);
        assert_eq!(robot.all_components().count(), 3);
        assert!((robot.component_mass() - 1.55).abs() < 1e-12);
    }

    #[test]
    fn test_board_facts() {
        assert_eq!(BoardType::ArduinoMega.available_pins(), 54);
        assert_eq!(BoardType::ArduinoUno.available_pins(), 14);
        assert_eq!(BoardType::RaspberryPi.available_pins(), 14);
        assert_eq!(BoardType::ArduinoMega.base_power_w(), 0.5);
        assert_eq!(BoardType::Unknown.base_power_w(), 0.2);
    }

    #[test]
    fn test_connector_mating() {
        let plug = Connector::new("J1", "JST", "Male");
        let socket = Connector::new("P1", "JST", "Female");
        let usb = Connector::new("USB", "USB", "Female");

        assert!(plug.mates_with(&socket));
        assert!(!plug.mates_with(&plug));
        assert!(!plug.mates_with(&usb));
    }

    #[test]
    fn test_joint_validation() {
        let good = Joint {
            name: "Hip".to_string(),
            ..Default::default()
        };
        assert!(good.validate().is_empty());

        let bad = Joint {
            name: "Knee".to_string(),
            min_angle: 90.0,
            max_angle: -90.0,
            diameter: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate().len(), 2);
    }

    #[test]
    fn test_json_defaults_and_tags() {
        let json = r#"{
            "name": "Tiny",
            "board_type": "ArduinoMega",
            "vehicle_type": "Hovercraft",
            "components": [
                { "kind": "motor", "name": "M1", "position": [0.1, 0.0, 0.0], "voltage": 6.0, "current": 0.5 },
                { "kind": "structural", "name": "Plate", "material": "Vibranium", "width": 0.1, "height": 0.01 }
            ]
        }"#;

        let robot = RobotConfiguration::from_json(json).unwrap();
        assert_eq!(robot.board_type, BoardType::ArduinoMega);
        assert_eq!(robot.vehicle_type, VehicleType::Unknown);
        assert_eq!(robot.operating_voltage, 12.0);

        let motor = robot.motors().next().unwrap();
        assert_eq!(motor.efficiency, 0.8);
        assert_eq!(motor.required_pins, 2);
        assert_eq!(motor.position, DVec3::new(0.1, 0.0, 0.0));

        let plate = robot.structural_components().next().unwrap();
        assert_eq!(plate.material, MaterialType::Unknown);
        assert_eq!(plate.load_factor, 1.0);
    }

    #[test]
    fn test_file_round_trip() {
        let robot = sample_robot();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rover.json");

        robot.to_file(&path).unwrap();
        let loaded = RobotConfiguration::from_file(&path).unwrap();
        assert_eq!(loaded, robot);
    }
}
