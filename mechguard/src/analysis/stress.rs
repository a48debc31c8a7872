//! Structural stress analysis.
//!
//! Each structural member is assumed to carry `load_factor` times the weight
//! of the whole robot over its cross-section. Members with a fastener hole get
//! a stress concentration factor `Kt = 1 + 2·sqrt(d / t)`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::GRAVITY;
use crate::core::{AnalysisKind, Finding, Severity};
use crate::materials::{MaterialCatalog, MaterialType};
use crate::model::{RobotConfiguration, StructuralComponent};

/// Members below this safety factor get a material-upgrade suggestion,
/// whatever the configured pass threshold is.
pub const RECOMMEND_BELOW_SAFETY_FACTOR: f64 = 2.0;

/// Stress evaluation of one structural member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStress {
    pub name: String,
    pub material: MaterialType,
    pub material_name: String,
    /// m²
    pub cross_section_area: f64,
    /// N
    pub applied_load: f64,
    /// MPa, before stress concentration
    pub nominal_stress: f64,
    pub stress_concentration_factor: f64,
    /// MPa, after stress concentration
    pub stress: f64,
    /// MPa
    pub yield_strength: f64,
    /// MPa
    pub ultimate_strength: f64,
    pub safety_factor: f64,
    pub is_safe: bool,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressAnalysisResult {
    pub timestamp: DateTime<Utc>,
    pub safety_factor_threshold: f64,
    pub components: Vec<ComponentStress>,
    /// MPa
    pub max_stress: f64,
    pub critical_component: Option<String>,
    pub is_structurally_safe: bool,
    pub recommendations: Vec<String>,
}

impl StressAnalysisResult {
    pub fn component(&self, name: &str) -> Option<&ComponentStress> {
        self.components.iter().find(|c| c.name == name)
    }

    pub(crate) fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        for c in &self.components {
            let severity = if !c.is_safe {
                Severity::Critical
            } else if c.safety_factor < RECOMMEND_BELOW_SAFETY_FACTOR {
                Severity::Warning
            } else {
                continue;
            };

            let mut finding = Finding::new(
                AnalysisKind::Stress,
                severity,
                format!(
                    "Safety factor {:.2} (stress {:.1} MPa, {} yield {:.0} MPa)",
                    c.safety_factor, c.stress, c.material_name, c.yield_strength
                ),
            )
            .with_component(&c.name);
            if let Some(r) = &c.recommendation {
                finding = finding.with_suggestion(r);
            }
            findings.push(finding);
        }
        findings
    }
}

pub fn analyze(robot: &RobotConfiguration, catalog: &MaterialCatalog, threshold: f64) -> StressAnalysisResult {
    let total_mass = robot.component_mass();
    let gravity_force = total_mass * GRAVITY;

    let components: Vec<ComponentStress> = robot
        .structural_components()
        .map(|s| evaluate_member(s, gravity_force, catalog, threshold))
        .collect();

    let mut max_stress = 0.0;
    let mut critical_component = None;
    for c in &components {
        if c.stress > max_stress {
            max_stress = c.stress;
            critical_component = Some(c.name.clone());
        }
    }

    let is_structurally_safe = components.iter().all(|c| c.is_safe);
    let recommendations = components.iter().filter_map(|c| c.recommendation.clone()).collect();

    tracing::debug!(
        members = components.len(),
        max_stress,
        safe = is_structurally_safe,
        "Stress analysis complete"
    );

    StressAnalysisResult {
        timestamp: Utc::now(),
        safety_factor_threshold: threshold,
        components,
        max_stress,
        critical_component,
        is_structurally_safe,
        recommendations,
    }
}

fn evaluate_member(
    member: &StructuralComponent,
    gravity_force: f64,
    catalog: &MaterialCatalog,
    threshold: f64,
) -> ComponentStress {
    let material = catalog.get_material(member.material);
    let area = member.cross_section_area();
    let applied_load = gravity_force * member.load_factor;

    let nominal_stress = if area > 0.0 {
        applied_load / (area * 1e6)
    } else {
        tracing::warn!(member = %member.name, "Zero cross-section area, treating stress as unbounded");
        f64::INFINITY
    };

    let kt = stress_concentration(member);
    let stress = if nominal_stress == 0.0 { 0.0 } else { nominal_stress * kt };

    let safety_factor = if stress > 0.0 {
        material.yield_strength / stress
    } else {
        f64::MAX
    };
    let is_safe = safety_factor >= threshold;

    let recommendation = (safety_factor < RECOMMEND_BELOW_SAFETY_FACTOR).then(|| {
        let better = catalog.get_stronger_material(member.material);
        if better.material_type == material.material_type {
            format!(
                "{}: Already using the strongest material ({}), increase the cross-section",
                member.name, material.name
            )
        } else {
            format!("{}: Upgrade from {} to {}", member.name, material.name, better.name)
        }
    });

    ComponentStress {
        name: member.name.clone(),
        material: material.material_type,
        material_name: material.name.clone(),
        cross_section_area: area,
        applied_load,
        nominal_stress,
        stress_concentration_factor: kt,
        stress,
        yield_strength: material.yield_strength,
        ultimate_strength: material.ultimate_tensile_strength,
        safety_factor,
        is_safe,
        recommendation,
    }
}

/// `1 + 2·sqrt(d / t)` for members with a joint hole, 1 otherwise.
fn stress_concentration(member: &StructuralComponent) -> f64 {
    if !member.has_joints || member.joint_hole_diameter <= 0.0 {
        return 1.0;
    }
    if member.thickness <= 0.0 {
        tracing::warn!(member = %member.name, "Joint hole in a member with no thickness");
        return f64::INFINITY;
    }
    1.0 + 2.0 * (member.joint_hole_diameter / member.thickness).sqrt()
}
