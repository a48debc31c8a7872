//! MechGuard CLI - robot design feasibility checks from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use mechguard::materials::load_materials_from_file;
use mechguard::{
    AnalysisKind, AnalysisOptions, CircuitConfiguration, DesignReview, Finding, MaterialCatalog, MechGuardCore,
    MechGuardError, RobotConfiguration, Severity,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "mechguard")]
#[command(about = "Robot design stress, thermal, joint, balance and circuit compatibility checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a robot configuration, optionally against a circuit
    Check {
        /// Path to the robot configuration (.json)
        #[arg(value_name = "ROBOT")]
        robot: PathBuf,

        /// Circuit configuration to check compatibility against
        #[arg(short, long, value_name = "CIRCUIT")]
        circuit: Option<PathBuf>,

        /// Analysis options file (.json)
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Extra or replacement material table (.json array)
        #[arg(long, value_name = "FILE")]
        materials: Option<PathBuf>,

        /// Ambient temperature in °C
        #[arg(long)]
        ambient: Option<f64>,

        /// Minimum acceptable stress safety factor
        #[arg(long)]
        safety_factor: Option<f64>,

        /// Maximum operating temperature in °C
        #[arg(long)]
        max_temp: Option<f64>,

        /// Skip an analysis (repeatable)
        #[arg(long, value_enum)]
        skip: Vec<AnalysisArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// List the material catalog
    Materials {
        /// Show thermal and sensor properties too
        #[arg(short, long)]
        verbose: bool,

        /// Extra or replacement material table (.json array)
        #[arg(long, value_name = "FILE")]
        materials: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AnalysisArg {
    Stress,
    Thermal,
    Joints,
    Weight,
    Compatibility,
}

impl From<AnalysisArg> for AnalysisKind {
    fn from(arg: AnalysisArg) -> Self {
        match arg {
            AnalysisArg::Stress => AnalysisKind::Stress,
            AnalysisArg::Thermal => AnalysisKind::Thermal,
            AnalysisArg::Joints => AnalysisKind::Joints,
            AnalysisArg::Weight => AnalysisKind::Weight,
            AnalysisArg::Compatibility => AnalysisKind::Compatibility,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
    /// GitLab CI format
    Gitlab,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Critical,
    Warning,
    Info,
}

/// Everything `check` needs besides output settings.
struct CheckArgs {
    robot: PathBuf,
    circuit: Option<PathBuf>,
    options: Option<PathBuf>,
    materials: Option<PathBuf>,
    ambient: Option<f64>,
    safety_factor: Option<f64>,
    max_temp: Option<f64>,
    skip: Vec<AnalysisArg>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check {
            robot,
            circuit,
            options,
            materials,
            ambient,
            safety_factor,
            max_temp,
            skip,
            format,
            fail_on,
        } => handle_check(
            CheckArgs {
                robot,
                circuit,
                options,
                materials,
                ambient,
                safety_factor,
                max_temp,
                skip,
            },
            format,
            fail_on,
        ),
        Commands::Materials { verbose, materials } => handle_materials(verbose, materials.as_deref()),
    };

    process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(materials: Option<&Path>) -> Result<MaterialCatalog, MechGuardError> {
    match materials {
        Some(path) => Ok(MaterialCatalog::with_overrides(load_materials_from_file(path)?)),
        None => Ok(MaterialCatalog::builtin()),
    }
}

fn run_check(args: &CheckArgs) -> Result<DesignReview, MechGuardError> {
    let mut options = match &args.options {
        Some(path) => AnalysisOptions::from_file(path)?,
        None => AnalysisOptions::default(),
    };
    if let Some(t) = args.ambient {
        options.ambient_temperature = t;
    }
    if let Some(sf) = args.safety_factor {
        options.safety_factor = sf;
    }
    if let Some(t) = args.max_temp {
        options.max_operating_temp = t;
    }
    for skip in &args.skip {
        options.set_enabled((*skip).into(), false);
    }

    let catalog = load_catalog(args.materials.as_deref())?;
    let robot = RobotConfiguration::from_file(&args.robot)?;
    let circuit = match &args.circuit {
        Some(path) => Some(CircuitConfiguration::from_file(path)?),
        None => None,
    };

    Ok(MechGuardCore::review(&robot, circuit.as_ref(), &options, &catalog))
}

fn handle_check(args: CheckArgs, format: OutputFormat, fail_on: Option<FailOnSeverity>) -> i32 {
    match run_check(&args) {
        Ok(review) => {
            output_review(&review, &args.robot, &format);
            if let Some(severity) = fail_on {
                if should_fail(&review, &severity) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(review: &DesignReview, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Critical => review.has_critical(),
        FailOnSeverity::Warning => review.has_warnings_or_worse(),
        FailOnSeverity::Info => review.total_findings() > 0,
    }
}

fn output_review(review: &DesignReview, file: &Path, format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(review, file),
        OutputFormat::Json => output_json(review, file),
        OutputFormat::Github => output_github(review, file),
        OutputFormat::Gitlab => output_gitlab(review, file),
    }
}

fn print_findings(title: &str, findings: &[&Finding]) {
    if findings.is_empty() {
        return;
    }
    println!("\n  {}:", title);
    for f in findings {
        match &f.component {
            Some(comp) => println!("    - [{}] {}: {}", f.analysis, comp, f.message),
            None => println!("    - [{}] {}", f.analysis, f.message),
        }
        if let Some(ref suggestion) = f.suggestion {
            println!("      Suggestion: {}", suggestion);
        }
    }
}

fn output_human(review: &DesignReview, file: &Path) {
    println!("\nRobot: {} ({})", review.robot, file.display());
    if let Some(ref circuit) = review.circuit {
        println!("Circuit: {}", circuit);
    }
    println!("{}", "─".repeat(60));

    if let Some(ref s) = review.stress {
        println!(
            "  Stress:        max {:.2} MPa{}, {}",
            s.max_stress,
            s.critical_component
                .as_ref()
                .map(|c| format!(" in {}", c))
                .unwrap_or_default(),
            pass_label(s.is_structurally_safe)
        );
    }
    if let Some(ref t) = review.thermal {
        println!(
            "  Thermal:       max {:.1}°C, {:.1} W dissipated, {}",
            t.max_temperature,
            t.total_power_dissipation,
            pass_label(t.is_thermal_safe)
        );
    }
    if let Some(ref j) = review.joints {
        println!(
            "  Joints:        {} checked, {} critical, {}",
            j.total_joints,
            j.critical_joints.len(),
            pass_label(j.all_joints_safe)
        );
    }
    if let Some(ref w) = review.weight {
        println!(
            "  Weight:        {:.2} kg, margin {:.3} m, {}",
            w.total_mass,
            w.stability_margin,
            pass_label(w.is_stable && w.is_balanced)
        );
    }
    if let Some(ref c) = review.compatibility {
        println!(
            "  Compatibility: score {:.0}%, {:.1} W needed, {}",
            c.compatibility_score * 100.0,
            c.robot_power_requirement,
            pass_label(c.is_fully_compatible)
        );
    }

    if review.total_findings() == 0 {
        println!("\n  No issues found");
    } else {
        let by_severity = |sev: Severity| -> Vec<&Finding> {
            review.findings.iter().filter(|f| f.severity == sev).collect()
        };
        print_findings("CRITICAL", &by_severity(Severity::Critical));
        print_findings("WARNING", &by_severity(Severity::Warning));
        print_findings("INFO", &by_severity(Severity::Info));
    }

    println!("\n  Summary:");
    println!("    Critical: {}", review.stats.critical);
    println!("    Warning:  {}", review.stats.warning);
    println!("    Info:     {}", review.stats.info);
}

fn pass_label(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

fn output_json(review: &DesignReview, file: &Path) {
    let output = serde_json::json!({
        "file": file.display().to_string(),
        "review": review,
        "summary": {
            "passed": review.passed(),
            "total_findings": review.total_findings(),
            "critical": review.stats.critical,
        }
    });
    print_json(&output);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn severity_to_github(finding: &Finding) -> &'static str {
    match finding.severity {
        Severity::Critical => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(review: &DesignReview, file: &Path) {
    for finding in &review.findings {
        let level = severity_to_github(finding);
        let subject = finding
            .component
            .as_ref()
            .map(|c| format!("{}: ", c))
            .unwrap_or_default();
        println!(
            "::{} file={},title={}::{}{}",
            level,
            file.display(),
            finding.analysis,
            subject,
            finding.message.replace('\n', " ")
        );
    }
}

fn severity_to_gitlab(finding: &Finding) -> &'static str {
    match finding.severity {
        Severity::Critical => "blocker",
        Severity::Warning => "major",
        Severity::Info => "info",
    }
}

fn output_gitlab(review: &DesignReview, file: &Path) {
    let reports: Vec<serde_json::Value> = review
        .findings
        .iter()
        .map(|finding| {
            serde_json::json!({
                "description": finding.message,
                "check_name": finding.analysis.as_str(),
                "fingerprint": finding.id,
                "severity": severity_to_gitlab(finding),
                "location": {
                    "path": file.display().to_string(),
                }
            })
        })
        .collect();
    print_json(&serde_json::Value::Array(reports));
}

fn handle_materials(verbose: bool, materials: Option<&Path>) -> i32 {
    let catalog = match load_catalog(materials) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("Material catalog ({} entries):\n", catalog.len());

    for m in catalog.iter() {
        println!("  {}", m.material_type);
        println!("    {}", m.name);
        println!(
            "    yield {:.0} MPa, UTS {:.0} MPa, density {:.0} kg/m³",
            m.yield_strength, m.ultimate_tensile_strength, m.density
        );
        if verbose {
            println!(
                "    E {:.1} GPa, k {:.2} W/m·K, c {:.0} J/kg·K, α {:.1e} 1/K",
                m.youngs_modulus, m.thermal_conductivity, m.specific_heat, m.thermal_expansion
            );
            let s = &m.sensor;
            println!(
                "    optical {:.2}, IR {:.2}, ultrasonic abs. {:.2}, color err. {:.2}, line det. {:.2}",
                s.optical_reflectivity,
                s.ir_reflectivity,
                s.ultrasonic_absorption,
                s.color_sensor_error,
                s.line_sensor_detectability
            );
        }
        println!();
    }
    0
}
