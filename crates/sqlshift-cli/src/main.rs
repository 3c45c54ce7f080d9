use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use sqlshift_core::{
    fingerprint, Config, Diagnostic, DiagnosticCode, Location, Report, Severity,
};
use sqlshift_rewrite::{LandingTarget, RuleRegistry, TableDefinition, Translation, Translator};

const DEFAULT_CONFIG: &str = "sqlshift.toml";

/// sqlshift - Redshift to Snowflake SQL translation
#[derive(Parser)]
#[command(name = "sqlshift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sqlshift.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one SQL file (stdin when no path is given)
    Translate {
        /// SQL file to translate
        path: Option<PathBuf>,

        /// Write the translation here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate every .sql file under a directory
    Batch {
        /// Directory to scan recursively
        dir: PathBuf,

        /// Directory receiving the translated files, mirroring the input layout
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the JSON report
        #[arg(short, long, default_value = "translate-report.json")]
        report: PathBuf,
    },

    /// List rewrite rules in pipeline order
    Rules,

    /// Build a Snowflake landing-table DDL from Redshift table_definition lines
    TableDdl {
        /// File holding the table definition, one DDL line per line
        path: PathBuf,

        /// Redshift schema of the source table
        #[arg(long)]
        schema: String,

        /// Redshift source table
        #[arg(long)]
        table: String,

        /// Snowflake database of the landing table
        #[arg(long)]
        database: String,

        /// Snowflake schema of the landing table
        #[arg(long)]
        dest_schema: String,

        /// Always strip quotes from the CREATE TABLE line
        #[arg(long)]
        remove_quotes: bool,

        /// Write the DDL here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env may carry RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    if cli.verbose {
        eprintln!(
            "{} {} -> {}",
            "Translating".cyan(),
            config.source_dialect,
            config.target_dialect
        );
    }

    match cli.command {
        Commands::Translate { path, output } => {
            translate_command(&config, path.as_deref(), output.as_deref())
        }
        Commands::Batch { dir, output, report } => {
            batch_command(&config, &dir, &output, &report, cli.verbose)
        }
        Commands::Rules => rules_command(&config),
        Commands::TableDdl {
            path,
            schema,
            table,
            database,
            dest_schema,
            remove_quotes,
            output,
        } => {
            let target = LandingTarget::new(schema, table, database, dest_schema);
            table_ddl_command(&config, &path, &target, remove_quotes, output.as_deref())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    Ok(config)
}

/// Translate command - one file or stdin
fn translate_command(config: &Config, path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let sql = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let registry = RuleRegistry::from_config(config)?;
    let translation = registry.translator().translate_detailed(&sql);
    print_failures(&translation);
    write_output(&translation.sql, output)
}

/// Batch command - translate a directory tree
fn batch_command(
    config: &Config,
    dir: &Path,
    output: &Path,
    report_path: &Path,
    verbose: bool,
) -> Result<()> {
    if !dir.is_dir() {
        return Err(anyhow::anyhow!("{} is not a directory", dir.display()));
    }

    let registry = RuleRegistry::from_config(config)?;
    let report = translate_tree(registry.translator(), dir, output, verbose)?.with_metadata(
        serde_json::json!({
            "source_dialect": config.source_dialect.to_string(),
            "target_dialect": config.target_dialect.to_string(),
            "input": dir.display().to_string(),
            "output": output.display().to_string(),
        }),
    );

    report.save_to_file(report_path)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), report_path.display());
    }

    print_report_summary(&report);

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Every `.sql` file under `dir`, sorted
fn sql_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
        })
        .collect();
    files.sort();
    files
}

/// Translate every `.sql` file under `input` into the same relative path under `output`
fn translate_tree(
    translator: Translator<'_>,
    input: &Path,
    output: &Path,
    verbose: bool,
) -> Result<Report> {
    let mut report = Report::new();

    for path in sql_files(input) {
        let relative = path.strip_prefix(input).unwrap_or(&path);
        let location = Location::new(relative.display().to_string());

        if verbose {
            eprintln!("  {} {}...", "Translating".cyan(), relative.display());
        }

        let sql = match std::fs::read_to_string(&path) {
            Ok(sql) => sql,
            Err(e) => {
                report.add_diagnostic(
                    Diagnostic::new(
                        DiagnosticCode::SourceFetchFailed,
                        Severity::Error,
                        format!("Failed to read {}: {}", path.display(), e),
                    )
                    .with_location(location),
                );
                continue;
            }
        };

        let translation = translator.translate_detailed(&sql);
        for failure in &translation.failures {
            report.add_diagnostic(
                Diagnostic::rule_failure(failure.rule, failure.message.clone())
                    .with_location(location.clone()),
            );
        }

        let target = output.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &translation.sql)
            .with_context(|| format!("Failed to write {}", target.display()))?;

        report.add_diagnostic(
            Diagnostic::new(
                DiagnosticCode::QueryTranslated,
                Severity::Info,
                format!("Translated to {}", target.display()),
            )
            .with_location(location)
            .with_fingerprint(fingerprint(&translation.sql)),
        );
    }

    Ok(report)
}

/// Rules command - list the pipeline
fn rules_command(config: &Config) -> Result<()> {
    // Validate the config the same way translation would
    RuleRegistry::from_config(config)?;

    let registry = RuleRegistry::standard();
    println!("{}", "Rewrite rules (pipeline order):".bold());
    for (i, rule) in registry.iter().enumerate() {
        let name = if config.is_rule_disabled(rule.name()) {
            format!("{} (disabled)", rule.name()).dimmed()
        } else {
            rule.name().green()
        };
        println!("  {:>2}. {:<28} {}", i + 1, name, rule.description());
    }

    if !config.fixups.is_empty() {
        println!();
        println!("{}", "Configured identifier fixups:".bold());
        for fixup in &config.fixups {
            println!("  {} -> {}", fixup.from, fixup.to);
        }
    }

    Ok(())
}

/// Table DDL command - landing table for a Redshift table
fn table_ddl_command(
    config: &Config,
    path: &Path,
    target: &LandingTarget,
    remove_quotes: bool,
    output: Option<&Path>,
) -> Result<()> {
    let ddl = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut options = config.ddl.clone();
    options.remove_quotes_from_create_table |= remove_quotes;

    let registry = RuleRegistry::from_config(config)?;
    let translation =
        TableDefinition::parse(&ddl).prepare(target, &options, registry.translator());

    eprintln!(
        "{} {}",
        "Landing table:".cyan(),
        target.landing_table(&options.landing_prefix)
    );
    print_failures(&translation);
    write_output(&translation.sql, output)
}

fn write_output(sql: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{sql}\n"))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{sql}");
            Ok(())
        }
    }
}

fn print_failures(translation: &Translation) {
    for failure in &translation.failures {
        eprintln!(
            "{} {} skipped: {}",
            "WARN".yellow().bold(),
            failure.rule,
            failure.message
        );
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Translation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Files translated: {}", report.summary.queries_translated);

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
    println!();

    let problems: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|diag| diag.severity > Severity::Info)
        .collect();

    if problems.is_empty() {
        println!("{}", "✓ Every rule applied cleanly".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in problems {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(rule) = &diag.rule {
                println!("    rule: {}", rule);
            }
            if let Some(loc) = &diag.location {
                println!("    at {}", loc.file);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
