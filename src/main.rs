use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;

use depscope::analysis::UnusedDetector;
use depscope::checks::{check_duplicates, check_heavy, check_outdated, HeavyConfig};
use depscope::manifest;
use depscope::report::{json, Reporter};
use depscope::scan::LocatorConfig;

#[derive(Parser)]
#[command(name = "depscope")]
#[command(version)]
#[command(about = "Dependency hygiene checker for npm projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find declared dependencies never imported in source
    Unused(ScanArgs),
    /// Find dependencies with newer published versions (uses npm)
    Outdated(ProjectArgs),
    /// Find dependencies installed at multiple resolved versions (uses npm)
    Duplicates(ProjectArgs),
    /// Find dependencies with outsized bundle cost (uses bundlephobia)
    Heavy(HeavyArgs),
    /// Run all four checks
    Check(CheckArgs),
}

#[derive(Args, Clone, Debug, PartialEq)]
struct ProjectArgs {
    /// Project root to analyze (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            format: OutputFormat::Text,
        }
    }
}

#[derive(Args, Clone, Debug, PartialEq, Default)]
struct ScanArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Extra file extensions to scan (repeatable)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Extra directory names to skip (repeatable)
    #[arg(long = "exclude-dir")]
    exclude_dirs: Vec<String>,
}

#[derive(Args, Clone)]
struct HeavyArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Gzipped size in KiB that earns a medium finding
    #[arg(long, default_value_t = 100)]
    warn_kb: u64,

    /// Gzipped size in KiB that earns a high finding
    #[arg(long, default_value_t = 500)]
    high_kb: u64,
}

#[derive(Args, Clone)]
struct CheckArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Gzipped size in KiB that earns a medium finding
    #[arg(long, default_value_t = 100)]
    warn_kb: u64,

    /// Gzipped size in KiB that earns a high finding
    #[arg(long, default_value_t = 500)]
    high_kb: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Styled terminal output
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Unused(args)) => run_unused(&args),
        Some(Commands::Outdated(args)) => run_outdated(&args),
        Some(Commands::Duplicates(args)) => run_duplicates(&args),
        Some(Commands::Heavy(args)) => run_heavy(&args),
        Some(Commands::Check(args)) => run_check(&args),
        // Bare invocation runs the unused-package check on the
        // current directory.
        None => run_unused(&ScanArgs::default()),
    }
}

fn run_unused(args: &ScanArgs) -> Result<()> {
    let mut reporter = Reporter::new();
    let mut detector = UnusedDetector::new();
    detector.run(&locator_config(args), &mut reporter)?;
    finish(&args.project, &reporter)
}

fn run_outdated(args: &ProjectArgs) -> Result<()> {
    let mut reporter = Reporter::new();
    let outcome = check_outdated(Path::new(&args.path))?;
    for warning in &outcome.warnings {
        reporter.warn(warning);
    }
    reporter.add_findings(outcome.findings);
    finish(args, &reporter)
}

fn run_duplicates(args: &ProjectArgs) -> Result<()> {
    let mut reporter = Reporter::new();
    let outcome = check_duplicates(Path::new(&args.path))?;
    for warning in &outcome.warnings {
        reporter.warn(warning);
    }
    reporter.add_findings(outcome.findings);
    finish(args, &reporter)
}

fn run_heavy(args: &HeavyArgs) -> Result<()> {
    let mut reporter = Reporter::new();
    let config = heavy_config(args.warn_kb, args.high_kb);
    let outcome = check_heavy(Path::new(&args.project.path), &config)?;
    for warning in &outcome.warnings {
        reporter.warn(warning);
    }
    reporter.add_findings(outcome.findings);
    finish(&args.project, &reporter)
}

/// Runs all four checks against one reporter.
///
/// A broken manifest is fatal for everything; a failing sibling check
/// (npm missing, service unreachable) degrades to a warning so the rest
/// of the run still reports.
fn run_check(args: &CheckArgs) -> Result<()> {
    let root_path = args.scan.project.path.clone();
    let root = Path::new(&root_path);
    let mut reporter = Reporter::new();

    let mut detector = UnusedDetector::new();
    detector.run(&locator_config(&args.scan), &mut reporter)?;

    for (name, result) in [
        ("outdated", check_outdated(root)),
        ("duplicates", check_duplicates(root)),
        (
            "heavy",
            check_heavy(root, &heavy_config(args.warn_kb, args.high_kb)),
        ),
    ] {
        match result {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    reporter.warn(warning);
                }
                reporter.add_findings(outcome.findings);
            }
            Err(err) => reporter.warn(&format!("{} check skipped: {}", name, err)),
        }
    }

    finish(&args.scan.project, &reporter)
}

fn locator_config(args: &ScanArgs) -> LocatorConfig {
    LocatorConfig::new(&args.project.path)
        .with_extensions(&args.extensions)
        .with_excluded_dirs(&args.exclude_dirs)
}

fn heavy_config(warn_kb: u64, high_kb: u64) -> HeavyConfig {
    HeavyConfig {
        warn_bytes: warn_kb * 1024,
        high_bytes: high_kb * 1024,
        batch_size: 5,
        batch_delay: Duration::from_millis(300),
    }
}

/// Renders the accumulated findings in the requested format.
fn finish(args: &ProjectArgs, reporter: &Reporter) -> Result<()> {
    match args.format {
        OutputFormat::Text => reporter.render(),
        OutputFormat::Json => write_json(args, reporter, &mut io::stdout())?,
    }
    Ok(())
}

/// Writes the findings report as JSON. stdout carries only this payload;
/// all progress and warning lines go to stderr.
fn write_json<W: io::Write>(
    args: &ProjectArgs,
    reporter: &Reporter,
    writer: &mut W,
) -> Result<()> {
    let (name, version) = project_identity(Path::new(&args.path));
    json::export(&name, &version, reporter.findings(), writer)?;
    Ok(())
}

/// Best-effort project name/version for report headers.
fn project_identity(root: &Path) -> (String, String) {
    match manifest::load(root) {
        Ok(pkg) => (
            pkg.name.unwrap_or_else(|| "unknown".to_string()),
            pkg.version.unwrap_or_else(|| "0.0.0".to_string()),
        ),
        Err(_) => ("unknown".to_string(), "0.0.0".to_string()),
    }
}
