//! Simple review example: analyze a robot (and optionally a circuit) and print findings.

use mechguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), MechGuardError> {
    let mut args = std::env::args().skip(1);
    let robot_path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/rover.json".to_string());
    let robot_path = Path::new(&robot_path);

    if !robot_path.exists() {
        eprintln!("File not found: {}", robot_path.display());
        eprintln!("Usage: cargo run --example simple_review [robot.json] [circuit.json]");
        std::process::exit(1);
    }

    let robot = mechguard::load_robot(robot_path)?;
    let circuit = match args.next() {
        Some(p) => Some(mechguard::load_circuit(Path::new(&p))?),
        None => None,
    };

    let review = MechGuardCore::review(
        &robot,
        circuit.as_ref(),
        &AnalysisOptions::default(),
        &MaterialCatalog::builtin(),
    );

    println!("Review of: {}", review.robot);
    println!("Total findings: {}", review.total_findings());
    println!();

    for severity in [Severity::Critical, Severity::Warning, Severity::Info] {
        let findings: Vec<_> = review.findings.iter().filter(|f| f.severity == severity).collect();
        if findings.is_empty() {
            continue;
        }
        println!("{} findings:", severity.to_string().to_uppercase());
        for f in findings {
            println!("  - [{}] {}", f.analysis, f.message);
            if let Some(ref suggestion) = f.suggestion {
                println!("    Suggestion: {}", suggestion);
            }
        }
    }

    if !review.passed() {
        println!("\nReview failed (critical findings).");
        std::process::exit(1);
    }

    println!("\nReview passed (no critical findings).");
    Ok(())
}
