use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ttlgen_core::{Config, Diagnostic, Outcome, Report, Severity, CONFIG_FILE_NAME};
use ttlgen_incremental::{queries, PipelineOutput, TtlgenDatabase};

mod discovery;
mod sink;

use discovery::{discover, ProjectFiles};
use sink::DirectorySink;

/// ttlgen - Rust constants generated from Turtle schemas
#[derive(Parser)]
#[command(name = "ttlgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ttlgen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sources for every schema binding
    Generate {
        /// Directory for generated sources (overrides the config)
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,

        /// Output file for report.json
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Run the pipeline without writing any sources
    Check {
        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,
    },

    /// List the schema bindings found in the sources
    Bindings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Config::from_file(Path::new(CONFIG_FILE_NAME))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!("{} {}", "Binding annotation:".cyan(), config.binding.annotation);
    }

    let has_errors = match cli.command {
        Commands::Generate { out_dir, report } => generate_command(&config, out_dir, report.as_deref(), cli.verbose)?,
        Commands::Check { output } => check_command(&config, &output, cli.verbose)?,
        Commands::Bindings => bindings_command(&config, cli.verbose)?,
    };

    // Exit with error code if there are errors
    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

/// Read the project and evaluate the pipeline once
fn evaluate(config: &Config, verbose: bool) -> Result<PipelineOutput> {
    let ProjectFiles { sources, schemas } = discover(config)?;

    if verbose {
        eprintln!(
            "{} {} source files, {} schema documents",
            "Found".cyan(),
            sources.len(),
            schemas.len()
        );
    }

    let db = TtlgenDatabase::default();
    let workspace = queries::new_workspace(&db, sources, schemas);
    let config_input = queries::ConfigInput::new(&db, config.clone());

    Ok(queries::pipeline(&db, workspace, config_input))
}

/// Generate command - write every artifact and report diagnostics
fn generate_command(config: &Config, out_dir: Option<PathBuf>, report_path: Option<&Path>, verbose: bool) -> Result<bool> {
    if verbose {
        eprintln!("{}", "Generating sources (with incremental computation)...".cyan());
    }

    let output = evaluate(config, verbose)?;

    let out_dir = out_dir.unwrap_or_else(|| config.resolve(&config.output.directory));
    let mut sink = DirectorySink::new(out_dir);
    let emitted = output.emit(&mut sink);
    if emitted.is_err() {
        print_diagnostics(sink.diagnostics());
    }
    emitted?;

    if verbose {
        for path in sink.written() {
            eprintln!("  {} {}", "Wrote".green(), path.display());
        }
        eprintln!(
            "{} {} written, {} unchanged in {}",
            "Artifacts:".cyan(),
            sink.written().len(),
            sink.unchanged(),
            sink.root().display()
        );
    }

    let report = output.report();
    if let Some(path) = report_path {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    print_diagnostics(sink.diagnostics());
    print_report_summary(&report);

    Ok(report.has_errors())
}

/// Check command - evaluate without touching generated sources
fn check_command(config: &Config, output_path: &Path, verbose: bool) -> Result<bool> {
    if verbose {
        eprintln!("{}", "Checking schema bindings...".cyan());
    }

    let output = evaluate(config, verbose)?;
    let report = output.report();

    report.save_to_file(output_path)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output_path.display());
    }

    print_diagnostics(&report.diagnostics);
    print_report_summary(&report);

    Ok(report.has_errors())
}

/// Bindings command - list what the scanner finds, without generating
fn bindings_command(config: &Config, verbose: bool) -> Result<bool> {
    let ProjectFiles { sources, schemas } = discover(config)?;

    let db = TtlgenDatabase::default();
    let workspace = queries::new_workspace(&db, sources, schemas);
    let config_input = queries::ConfigInput::new(&db, config.clone());

    let mut bindings = Vec::new();
    let mut diagnostics = Vec::new();
    for file in workspace.sources(&db) {
        for outcome in queries::scan_source(&db, *file, config_input) {
            match outcome {
                Outcome::Ok(scanned) => bindings.push(scanned),
                Outcome::Err(failed) => diagnostics.extend(failed.into_iter().map(|d| config.severity.apply(d))),
            }
        }
    }
    diagnostics.sort_by(|a: &Diagnostic, b: &Diagnostic| a.sort_key().cmp(&b.sort_key()));

    println!("{}", "Schema Bindings".bold().bright_blue());
    println!();

    if bindings.is_empty() {
        println!("{}", "No bindings found".yellow());
    }

    for scanned in &bindings {
        let binding = &scanned.binding;
        println!("  {} {}", binding.qualified_name().to_string().green(), format!("<- {}", binding.document_key()).bold());
        println!("    prefix {} = <{}>", binding.preferred_prefix(), binding.prefix_uri());
        if let Some(location) = &scanned.location {
            if verbose {
                println!("    at {}", location);
            }
        }
    }
    println!();

    print_diagnostics(&diagnostics);

    Ok(diagnostics.iter().any(|d| d.severity == Severity::Error))
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warn => "warning".yellow().bold(),
            Severity::Info => "info".cyan(),
        };

        println!("{}[{}]: {}", severity_str, diag.code.id(), diag.message);
        if let Some(location) = &diag.location {
            println!("  {} {}", "-->".bright_blue(), location);
        }
    }
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "ttlgen Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Artifacts: {}", report.summary.artifacts);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.summary.total == 0 {
        println!("{}", "✓ No issues found!".green().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluates_project_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("schemas")).unwrap();
        fs::write(
            dir.path().join("src/lib.rs"),
            "#[ttlgen::from_ttl(\"person.ttl\", \"ex\", \"http://example.org/\")]\npub struct Person;\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("schemas/person.ttl"),
            "@prefix ex: <http://example.org/> .\nex:Person ex:name \"Person\" .\n",
        )
        .unwrap();

        let config = Config {
            project_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        let output = evaluate(&config, false).unwrap();
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

        let out_dir = config.resolve(&config.output.directory);
        let mut sink = DirectorySink::new(&out_dir);
        output.emit(&mut sink).unwrap();

        let text = fs::read_to_string(out_dir.join("Person.g.rs")).unwrap();
        assert!(text.contains("pub const NAME: &'static str = \"http://example.org/name\";"));
    }
}
