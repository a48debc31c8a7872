//! Design Configuration Model
//!
//! Plain data describing a robot (mechanical side) and the circuit meant to
//! drive it. Both are produced by an external editor or loaded from JSON and
//! are read-only to the analyzers.

pub mod circuit;
pub mod graph;
pub mod robot;

pub use circuit::{CircuitComponent, CircuitConfiguration, Connection};
pub use graph::{CircuitGraph, CircuitStats};
pub use robot::{
    BoardType, Component, Connector, Joint, JointType, Motor, RobotConfiguration, Sensor, Servo,
    StructuralComponent, VehicleType,
};
