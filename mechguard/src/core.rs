//! Core review logic shared by the library API and the CLI.
//! No I/O beyond the explicit `from_file` loaders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::analysis::balance::WeightDistributionResult;
use crate::analysis::compatibility::CircuitCompatibilityResult;
use crate::analysis::joints::JointAnalysisResult;
use crate::analysis::stress::StressAnalysisResult;
use crate::analysis::thermal::ThermalAnalysisResult;
use crate::analysis::RobotAnalyzer;
use crate::materials::MaterialCatalog;
use crate::model::{CircuitConfiguration, RobotConfiguration};

#[derive(Debug, thiserror::Error)]
pub enum MechGuardError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Knobs consumed when the analyzers are constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub enable_stress: bool,
    pub enable_thermal: bool,
    pub enable_joints: bool,
    pub enable_weight: bool,
    pub enable_compatibility: bool,
    /// m, informational only
    pub stress_resolution: f64,
    /// m, informational only; the heat map is always 10×10×10
    pub thermal_resolution: f64,
    /// Minimum acceptable stress safety factor.
    pub safety_factor: f64,
    /// °C
    pub max_operating_temp: f64,
    /// °C
    pub ambient_temperature: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            enable_stress: true,
            enable_thermal: true,
            enable_joints: true,
            enable_weight: true,
            enable_compatibility: true,
            stress_resolution: 0.01,
            thermal_resolution: 0.5,
            safety_factor: 2.0,
            max_operating_temp: 85.0,
            ambient_temperature: 25.0,
        }
    }
}

impl AnalysisOptions {
    /// Load options from JSON. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, MechGuardError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| MechGuardError::Parse(format!("{}: {}", path.display(), e)))
    }

    pub fn is_enabled(&self, kind: AnalysisKind) -> bool {
        match kind {
            AnalysisKind::Stress => self.enable_stress,
            AnalysisKind::Thermal => self.enable_thermal,
            AnalysisKind::Joints => self.enable_joints,
            AnalysisKind::Weight => self.enable_weight,
            AnalysisKind::Compatibility => self.enable_compatibility,
        }
    }

    pub fn set_enabled(&mut self, kind: AnalysisKind, enabled: bool) {
        match kind {
            AnalysisKind::Stress => self.enable_stress = enabled,
            AnalysisKind::Thermal => self.enable_thermal = enabled,
            AnalysisKind::Joints => self.enable_joints = enabled,
            AnalysisKind::Weight => self.enable_weight = enabled,
            AnalysisKind::Compatibility => self.enable_compatibility = enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// The five analysis families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Stress,
    Thermal,
    Joints,
    Weight,
    Compatibility,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::Stress,
        AnalysisKind::Thermal,
        AnalysisKind::Joints,
        AnalysisKind::Weight,
        AnalysisKind::Compatibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Stress => "stress",
            AnalysisKind::Thermal => "thermal",
            AnalysisKind::Joints => "joints",
            AnalysisKind::Weight => "weight",
            AnalysisKind::Compatibility => "compatibility",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reportable problem or hint, flattened out of an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub analysis: AnalysisKind,
    pub severity: Severity,
    pub component: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(analysis: AnalysisKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            analysis,
            severity,
            component: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

/// Every enabled analysis run against one design, plus the flattened findings.
#[derive(Debug, Clone, Serialize)]
pub struct DesignReview {
    pub robot: String,
    pub circuit: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub stress: Option<StressAnalysisResult>,
    pub thermal: Option<ThermalAnalysisResult>,
    pub joints: Option<JointAnalysisResult>,
    pub weight: Option<WeightDistributionResult>,
    pub compatibility: Option<CircuitCompatibilityResult>,
    pub findings: Vec<Finding>,
    pub stats: ReviewStats,
}

impl DesignReview {
    /// No critical findings.
    pub fn passed(&self) -> bool {
        self.stats.critical == 0
    }

    pub fn has_critical(&self) -> bool {
        self.stats.critical > 0
    }

    pub fn has_warnings_or_worse(&self) -> bool {
        self.stats.critical > 0 || self.stats.warning > 0
    }

    pub fn total_findings(&self) -> usize {
        self.stats.critical + self.stats.warning + self.stats.info
    }

    pub fn findings_for(&self, analysis: AnalysisKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.analysis == analysis)
    }
}

pub(crate) fn findings_to_stats(findings: &[Finding]) -> ReviewStats {
    let mut stats = ReviewStats::default();
    for f in findings {
        match f.severity {
            Severity::Critical => stats.critical += 1,
            Severity::Warning => stats.warning += 1,
            Severity::Info => stats.info += 1,
        }
    }
    stats
}

/// Core review API used by the CLI and by embedding callers.
pub struct MechGuardCore;

impl MechGuardCore {
    /// Run every enabled analysis against `robot`.
    ///
    /// Compatibility needs a circuit; without one it is skipped like a
    /// disabled family. Disabled families never influence the others.
    pub fn review(
        robot: &RobotConfiguration,
        circuit: Option<&CircuitConfiguration>,
        options: &AnalysisOptions,
        catalog: &MaterialCatalog,
    ) -> DesignReview {
        let analyzer = RobotAnalyzer::new(options.clone(), catalog.clone());

        for problem in robot.validate() {
            tracing::warn!("{}", problem);
        }

        let stress = options.enable_stress.then(|| analyzer.analyze_stress(robot));
        let thermal = options
            .enable_thermal
            .then(|| analyzer.analyze_thermal(robot, options.ambient_temperature));
        let joints = options.enable_joints.then(|| analyzer.analyze_joints(robot));
        let weight = options
            .enable_weight
            .then(|| analyzer.analyze_weight_distribution(robot));
        let compatibility = match circuit {
            Some(c) if options.enable_compatibility => Some(analyzer.check_circuit_compatibility(robot, c)),
            None if options.enable_compatibility => {
                tracing::debug!("No circuit supplied, skipping compatibility check");
                None
            }
            _ => None,
        };

        let mut findings = Vec::new();
        if let Some(r) = &stress {
            findings.extend(r.findings());
        }
        if let Some(r) = &thermal {
            findings.extend(r.findings());
        }
        if let Some(r) = &joints {
            findings.extend(r.findings());
        }
        if let Some(r) = &weight {
            findings.extend(r.findings());
        }
        if let Some(r) = &compatibility {
            findings.extend(r.findings());
        }

        let stats = findings_to_stats(&findings);
        tracing::info!(
            robot = %robot.name,
            critical = stats.critical,
            warning = stats.warning,
            info = stats.info,
            "Design review complete"
        );

        DesignReview {
            robot: robot.name.clone(),
            circuit: circuit.map(|c| c.name.clone()),
            timestamp: Utc::now(),
            stress,
            thermal,
            joints,
            weight,
            compatibility,
            findings,
            stats,
        }
    }
}
