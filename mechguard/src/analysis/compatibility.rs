//! Circuit compatibility.
//!
//! Decides whether a candidate circuit can power and drive a robot. Power,
//! voltage, connectors and pin count gate the result; signal integrity and the
//! wiring checks from [`CircuitGraph`] are advisory.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{AnalysisKind, Finding, Severity};
use crate::model::{CircuitConfiguration, CircuitGraph, RobotConfiguration};

/// Added to every robot's electrical load, W.
pub const BOARD_MARGIN_W: f64 = 1.0;
pub const POWER_HEADROOM: f64 = 1.2;
/// V
pub const VOLTAGE_TOLERANCE: f64 = 0.5;
/// Wires longer than this (m) cost signal integrity.
pub const LONG_WIRE: f64 = 0.5;
pub const LONG_WIRE_PENALTY: f64 = 0.1;
pub const SIGNAL_INTEGRITY_OK_ABOVE: f64 = 0.8;
/// Servos are driven from one PWM pin regardless of their own pin count.
pub const PINS_PER_SERVO: u32 = 1;

/// Shown in place of a connector name when nothing mates.
pub const NO_MATCH: &str = "NO_MATCH";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityIssue {
    pub severity: Severity,
    pub component: String,
    pub description: String,
    pub recommendation: String,
}

impl CompatibilityIssue {
    fn new(
        severity: Severity,
        component: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            component: component.into(),
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }
}

impl From<&CompatibilityIssue> for Finding {
    fn from(issue: &CompatibilityIssue) -> Self {
        Finding::new(AnalysisKind::Compatibility, issue.severity, issue.description.clone())
            .with_component(issue.component.clone())
            .with_suggestion(issue.recommendation.clone())
    }
}

/// A robot-required connector and the circuit connector it mates with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorMatch {
    pub required: String,
    pub matched: Option<String>,
}

impl ConnectorMatch {
    pub fn display_match(&self) -> &str {
        self.matched.as_deref().unwrap_or(NO_MATCH)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CircuitCompatibilityResult {
    pub timestamp: DateTime<Utc>,

    /// W
    pub robot_power_requirement: f64,
    /// W, supply minus requirement
    pub power_margin: f64,
    pub power_compatible: bool,

    pub voltage_compatible: bool,

    pub connector_matches: Vec<ConnectorMatch>,
    pub all_connectors_compatible: bool,

    pub signal_integrity_score: f64,
    pub signal_integrity_ok: bool,

    pub required_pins: u32,
    /// Pins left over, negative on shortfall.
    pub available_pins: i64,
    pub pin_count_compatible: bool,

    pub is_fully_compatible: bool,
    pub compatibility_score: f64,
    pub issues: Vec<CompatibilityIssue>,
}

impl CircuitCompatibilityResult {
    pub(crate) fn findings(&self) -> Vec<Finding> {
        self.issues.iter().map(Finding::from).collect()
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &CompatibilityIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// `POWER_HEADROOM × (motor V·I + servo W + sensor W + board margin)`.
pub fn robot_power_requirement(robot: &RobotConfiguration) -> f64 {
    let motors: f64 = robot.motors().map(|m| m.electrical_power()).sum();
    let servos: f64 = robot.servos().map(|s| s.power_consumption).sum();
    let sensors: f64 = robot.sensors().map(|s| s.power_consumption).sum();
    (motors + servos + sensors + BOARD_MARGIN_W) * POWER_HEADROOM
}

pub fn required_pins(robot: &RobotConfiguration) -> u32 {
    let motors: u32 = robot.motors().map(|m| m.required_pins).sum();
    let servos = robot.servos().count() as u32 * PINS_PER_SERVO;
    let sensors: u32 = robot.sensors().map(|s| s.required_pins).sum();
    motors + servos + sensors
}

/// Starts at 1 and loses [`LONG_WIRE_PENALTY`] per long connection, clamped to `[0, 1]`.
pub fn signal_integrity_score(circuit: &CircuitConfiguration) -> f64 {
    let mut score = 1.0;
    for conn in &circuit.connections {
        if conn.length > LONG_WIRE {
            score -= LONG_WIRE_PENALTY;
        }
    }
    f64::clamp(score, 0.0, 1.0)
}

pub fn analyze(robot: &RobotConfiguration, circuit: &CircuitConfiguration) -> CircuitCompatibilityResult {
    let mut issues = Vec::new();

    let requirement = robot_power_requirement(robot);
    let supply = circuit.total_power_supply;
    let power_compatible = supply >= requirement;
    if !power_compatible {
        issues.push(CompatibilityIssue::new(
            Severity::Critical,
            "Power Supply",
            format!("Circuit provides {:.1}W but robot needs {:.1}W", supply, requirement),
            format!(
                "Upgrade power supply or reduce robot power consumption by {:.1}W",
                requirement - supply
            ),
        ));
    }

    let voltage_compatible = (robot.operating_voltage - circuit.supply_voltage).abs() <= VOLTAGE_TOLERANCE;
    if !voltage_compatible {
        issues.push(CompatibilityIssue::new(
            Severity::Warning,
            "Voltage Level",
            format!(
                "Robot operates at {:.1}V but circuit supplies {:.1}V",
                robot.operating_voltage, circuit.supply_voltage
            ),
            "Add voltage regulator or adjust circuit voltage",
        ));
    }

    let connector_matches: Vec<ConnectorMatch> = robot
        .required_connectors
        .iter()
        .map(|required| ConnectorMatch {
            required: required.name.clone(),
            matched: circuit
                .available_connectors
                .iter()
                .find(|available| available.mates_with(required))
                .map(|available| available.name.clone()),
        })
        .collect();
    let all_connectors_compatible = connector_matches.iter().all(|m| m.matched.is_some());
    for (m, required) in connector_matches.iter().zip(&robot.required_connectors) {
        if m.matched.is_none() {
            issues.push(CompatibilityIssue::new(
                Severity::Warning,
                m.required.clone(),
                format!(
                    "No {} connector of opposite gender to {} available",
                    required.connector_type, required.gender
                ),
                "Add a mating connector or an adapter to the circuit",
            ));
        }
    }

    let signal_integrity_score = signal_integrity_score(circuit);
    let signal_integrity_ok = signal_integrity_score > SIGNAL_INTEGRITY_OK_ABOVE;
    if !signal_integrity_ok {
        issues.push(CompatibilityIssue::new(
            Severity::Info,
            "Signal Integrity",
            format!("Signal integrity score {:.2}", signal_integrity_score),
            format!("Shorten connections longer than {:.1}m", LONG_WIRE),
        ));
    }

    let required_pins = required_pins(robot);
    let board_pins = circuit.board_type.available_pins();
    let pin_count_compatible = required_pins <= board_pins;
    if !pin_count_compatible {
        issues.push(CompatibilityIssue::new(
            Severity::Critical,
            "Pin Count",
            format!("Robot needs {} pins but board has only {}", required_pins, board_pins),
            "Use pin multiplexer or upgrade to larger board",
        ));
    }

    issues.extend(wiring_issues(circuit));

    let is_fully_compatible = power_compatible && voltage_compatible && all_connectors_compatible && pin_count_compatible;
    let passed = [
        power_compatible,
        voltage_compatible,
        all_connectors_compatible,
        pin_count_compatible,
        signal_integrity_ok,
    ]
    .iter()
    .filter(|ok| **ok)
    .count();
    let compatibility_score = passed as f64 / 5.0;

    tracing::debug!(
        requirement,
        supply,
        required_pins,
        score = compatibility_score,
        "Compatibility check complete"
    );

    CircuitCompatibilityResult {
        timestamp: Utc::now(),
        robot_power_requirement: requirement,
        power_margin: supply - requirement,
        power_compatible,
        voltage_compatible,
        connector_matches,
        all_connectors_compatible,
        signal_integrity_score,
        signal_integrity_ok,
        required_pins,
        available_pins: board_pins as i64 - required_pins as i64,
        pin_count_compatible,
        is_fully_compatible,
        compatibility_score,
        issues,
    }
}

/// Advisory wiring problems. Never affect the gating flags.
fn wiring_issues(circuit: &CircuitConfiguration) -> Vec<CompatibilityIssue> {
    let mut issues = Vec::new();
    if circuit.components.is_empty() {
        return issues;
    }

    let graph = CircuitGraph::build(circuit);

    for c in graph.floating_components() {
        issues.push(CompatibilityIssue::new(
            Severity::Warning,
            c.name.clone(),
            format!("{} ({}) is not connected to anything", c.name, c.component_type),
            "Connect the component or remove it from the circuit",
        ));
    }

    for conn in graph.dangling_connections() {
        issues.push(CompatibilityIssue::new(
            Severity::Warning,
            format!("{} -> {}", conn.from_component, conn.to_component),
            format!(
                "{} connection references a component that is not in the circuit",
                conn.signal_type
            ),
            "Fix the connection endpoints",
        ));
    }

    if !graph.has_power_reference() {
        issues.push(CompatibilityIssue::new(
            Severity::Warning,
            "Power Net",
            "Circuit has no power connection",
            "Add a Power connection from the supply",
        ));
    }
    if !graph.has_ground_reference() {
        issues.push(CompatibilityIssue::new(
            Severity::Warning,
            "Ground Net",
            "Circuit has no ground connection",
            "Add a Ground connection to establish a reference",
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardType, CircuitComponent, Connection, Connector, Motor, Sensor, Servo};

    fn robot_needing(watts_before_headroom: f64) -> RobotConfiguration {
        let mut robot = RobotConfiguration::new("Bot");
        robot.add_component(Motor {
            name: "Drive".to_string(),
            voltage: watts_before_headroom - BOARD_MARGIN_W,
            current: 1.0,
            ..Default::default()
        });
        robot
    }

    fn bare_circuit(supply_w: f64) -> CircuitConfiguration {
        let mut circuit = CircuitConfiguration::new("Board");
        circuit.total_power_supply = supply_w;
        circuit
    }

    #[test]
    fn test_power_shortfall() {
        // (9 + 1) · 1.2 = 12 W
        let robot = robot_needing(10.0);
        let result = analyze(&robot, &bare_circuit(10.0));

        assert!(!result.power_compatible);
        assert!(!result.is_fully_compatible);
        assert!((result.power_margin + 2.0).abs() < 1e-9);

        let issue = result.issues_with(Severity::Critical).next().unwrap();
        assert_eq!(issue.component, "Power Supply");
        assert!(issue.description.contains("10.0W"));
        assert!(issue.description.contains("12.0W"));
        assert!(issue.recommendation.contains("2.0W"));
    }

    #[test]
    fn test_fully_compatible() {
        let robot = robot_needing(10.0);
        let result = analyze(&robot, &bare_circuit(20.0));

        assert!(result.power_compatible);
        assert!(result.voltage_compatible);
        assert!(result.all_connectors_compatible);
        assert!(result.pin_count_compatible);
        assert!(result.is_fully_compatible);
        assert_eq!(result.compatibility_score, 1.0);
        assert!(result.issues.is_empty());
        assert_eq!(result.available_pins, 12);
    }

    #[test]
    fn test_voltage_tolerance() {
        let mut robot = robot_needing(2.0);
        robot.operating_voltage = 12.5;
        assert!(analyze(&robot, &bare_circuit(20.0)).voltage_compatible);

        robot.operating_voltage = 5.0;
        let result = analyze(&robot, &bare_circuit(20.0));
        assert!(!result.voltage_compatible);
        let issue = result.issues_with(Severity::Warning).next().unwrap();
        assert_eq!(issue.description, "Robot operates at 5.0V but circuit supplies 12.0V");
    }

    #[test]
    fn test_connector_matching() {
        let mut robot = robot_needing(2.0);
        robot.add_required_connector(Connector::new("Battery", "XT60", "Male"));
        robot.add_required_connector(Connector::new("Sonar", "JST", "Male"));

        let mut circuit = bare_circuit(20.0);
        circuit.available_connectors = vec![
            Connector::new("J1", "XT60", "Male"),
            Connector::new("J2", "XT60", "Female"),
        ];

        let result = analyze(&robot, &circuit);
        assert_eq!(result.connector_matches[0].matched.as_deref(), Some("J2"));
        assert_eq!(result.connector_matches[1].display_match(), NO_MATCH);
        assert!(!result.all_connectors_compatible);
        assert!(!result.is_fully_compatible);
        assert!((result.compatibility_score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_no_required_connectors_is_compatible() {
        let result = analyze(&robot_needing(2.0), &bare_circuit(20.0));
        assert!(result.connector_matches.is_empty());
        assert!(result.all_connectors_compatible);
    }

    #[test]
    fn test_signal_integrity_score_clamps() {
        let mut circuit = bare_circuit(20.0);
        circuit.connections = (0..3)
            .map(|i| Connection::new(format!("A{}", i), format!("B{}", i), "Digital").with_length(0.6))
            .collect();
        let score = signal_integrity_score(&circuit);
        assert!((score - 0.7).abs() < 1e-12);

        circuit.connections = (0..15)
            .map(|i| Connection::new(format!("A{}", i), format!("B{}", i), "Digital").with_length(1.0))
            .collect();
        assert_eq!(signal_integrity_score(&circuit), 0.0);

        circuit.connections.clear();
        assert_eq!(signal_integrity_score(&circuit), 1.0);
    }

    #[test]
    fn test_pin_count() {
        let mut robot = RobotConfiguration::new("Many");
        for i in 0..5 {
            robot.add_component(Motor {
                name: format!("M{}", i),
                ..Default::default()
            });
        }
        robot.add_component(Servo {
            name: "Pan".to_string(),
            required_pins: 3,
            ..Default::default()
        });
        robot.add_component(Sensor {
            name: "Line".to_string(),
            required_pins: 5,
            ..Default::default()
        });
        // 5·2 + 1 + 5 = 16
        assert_eq!(required_pins(&robot), 16);

        let result = analyze(&robot, &bare_circuit(100.0));
        assert!(!result.pin_count_compatible);
        assert_eq!(result.available_pins, -2);
        let issue = result.issues.iter().find(|i| i.component == "Pin Count").unwrap();
        assert_eq!(issue.description, "Robot needs 16 pins but board has only 14");

        let mut mega = bare_circuit(100.0);
        mega.board_type = BoardType::ArduinoMega;
        assert!(analyze(&robot, &mega).pin_count_compatible);
    }

    #[test]
    fn test_wiring_issues_are_advisory() {
        let mut circuit = bare_circuit(20.0);
        circuit.components = vec![
            CircuitComponent::new("U1", "IC"),
            CircuitComponent::new("M1", "MotorDriver"),
            CircuitComponent::new("LED1", "LED"),
        ];
        circuit.connections = vec![
            Connection::new("U1", "M1", "Digital"),
            Connection::new("U1", "R9", "Digital"),
        ];

        let result = analyze(&robot_needing(2.0), &circuit);
        assert!(result.is_fully_compatible);
        assert_eq!(result.compatibility_score, 1.0);

        let components: Vec<&str> = result.issues.iter().map(|i| i.component.as_str()).collect();
        assert_eq!(components, vec!["LED1", "U1 -> R9", "Power Net", "Ground Net"]);
        assert!(result.issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_findings_keep_issue_severity() {
        let robot = robot_needing(10.0);
        let result = analyze(&robot, &bare_circuit(10.0));
        let findings = result.findings();
        assert_eq!(findings.len(), result.issues.len());
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].component.as_deref(), Some("Power Supply"));
    }
}
