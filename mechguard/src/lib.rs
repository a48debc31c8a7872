//! MechGuard - feasibility analysis for mobile-robot designs
//!
//! This library checks a robot design and the circuit meant to drive it
//! before anything is built: structural stress, heat, joint wear, balance and
//! whether the circuit can power and wire up the robot.
//!
//! # Quick Start
//!
//! ```
//! use mechguard::prelude::*;
//! use mechguard::model::{Motor, StructuralComponent};
//!
//! let mut robot = RobotConfiguration::new("Rover");
//! robot.add_component(Motor {
//!     name: "Drive".to_string(),
//!     mass: 0.3,
//!     voltage: 12.0,
//!     current: 1.0,
//!     ..Default::default()
//! });
//! robot.add_component(StructuralComponent {
//!     name: "Deck".to_string(),
//!     mass: 0.5,
//!     width: 0.2,
//!     height: 0.005,
//!     ..Default::default()
//! });
//!
//! let review = MechGuardCore::review(
//!     &robot,
//!     None,
//!     &AnalysisOptions::default(),
//!     &MaterialCatalog::builtin(),
//! );
//!
//! for finding in &review.findings {
//!     println!("{}: {}", finding.severity, finding.message);
//! }
//! assert!(review.passed());
//! ```
//!
//! # Features
//!
//! - **Stress**: safety factor per structural member, with hole stress concentration
//! - **Thermal**: component temperatures and a 10×10×10 heat map
//! - **Joints**: load safety factor, wear and maintenance interval
//! - **Weight**: center of mass, tip-over margin, wheel loads, inertia
//! - **Compatibility**: power, voltage, connectors, pins and wiring checks

pub mod analysis;
pub mod core;
pub mod materials;
pub mod model;

// Re-export main types
pub use analysis::RobotAnalyzer;
pub use core::{
    AnalysisKind, AnalysisOptions, DesignReview, Finding, MechGuardCore, MechGuardError, ReviewStats,
    Severity,
};
pub use materials::{Material, MaterialCatalog, MaterialType};
pub use model::{CircuitConfiguration, RobotConfiguration};

/// Load a robot configuration from JSON (convenience wrapper).
pub fn load_robot(path: &std::path::Path) -> Result<RobotConfiguration, MechGuardError> {
    RobotConfiguration::from_file(path)
}

/// Load a circuit configuration from JSON (convenience wrapper).
pub fn load_circuit(path: &std::path::Path) -> Result<CircuitConfiguration, MechGuardError> {
    CircuitConfiguration::from_file(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnalysisKind, AnalysisOptions, CircuitConfiguration, DesignReview, Finding, MaterialCatalog,
        MaterialType, MechGuardCore, MechGuardError, RobotAnalyzer, RobotConfiguration, Severity,
    };
}
