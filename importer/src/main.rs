//! strapi-import CLI - migrate CSV exports into Strapi
//!
//! ```bash
//! strapi-import import                       # Import every configured file
//! strapi-import import --only Blog.csv       # Import a single file
//! strapi-import import --dry-run             # Map rows, print payloads, create nothing
//! strapi-import plan                         # Print the active mapping plan as JSON
//! strapi-import parse "csv-imports/Blog.csv" # Parse a CSV file and print its rows
//! ```
//!
//! Connection settings fall back to `CSV_DIR`, `STRAPI_URL` and
//! `STRAPI_TOKEN` (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use strapi_import::{
    builtin_plan, parse_file, FileOutcome, ImportConfig, ImportError, ImportPlan, Importer, RunSummary,
    StrapiClient, DEFAULT_CSV_DIR, DEFAULT_STRAPI_URL,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "strapi-import")]
#[command(about = "Import CSV exports into Strapi", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the configured CSV files into Strapi
    Import {
        /// Directory holding the CSV files
        #[arg(long, env = "CSV_DIR", default_value = DEFAULT_CSV_DIR)]
        csv_dir: PathBuf,

        /// Strapi base URL
        #[arg(long, env = "STRAPI_URL", default_value = DEFAULT_STRAPI_URL)]
        strapi_url: String,

        /// Strapi API token
        #[arg(long, env = "STRAPI_TOKEN", hide_env_values = true)]
        strapi_token: Option<String>,

        /// Mapping plan JSON file (default: built-in plan)
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Only import this file
        #[arg(long)]
        only: Option<String>,

        /// Map rows and log payloads without creating entries
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the mapping plan as JSON
    Plan {
        /// Mapping plan JSON file (default: built-in plan)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Parse a CSV file and print its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,
    },
}

fn setup_logging(level: &str) {
    let level = match level.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        other => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Import {
            csv_dir,
            strapi_url,
            strapi_token,
            plan,
            only,
            dry_run,
        } => {
            let config = ImportConfig::new(csv_dir, &strapi_url)
                .with_token(strapi_token)
                .with_dry_run(dry_run);
            cmd_import(&config, plan.as_deref(), only.as_deref()).await
        }

        Commands::Plan { plan } => cmd_plan(plan.as_deref()),

        Commands::Parse { input } => cmd_parse(&input),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_plan(path: Option<&Path>) -> Result<ImportPlan, ImportError> {
    match path {
        Some(p) => Ok(ImportPlan::from_file(p)?),
        None => Ok(builtin_plan()),
    }
}

async fn cmd_import(
    config: &ImportConfig,
    plan_path: Option<&Path>,
    only: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(plan_path)?;
    let client = StrapiClient::from_config(config).map_err(ImportError::Backend)?;
    let importer = Importer::new(config, &client);

    let run = match only {
        Some(file) => importer.run_file(&plan, file).await?,
        None => importer.run_all(&plan).await?,
    };

    print_summary(&run, config.dry_run);
    Ok(())
}

fn print_summary(run: &RunSummary, dry_run: bool) {
    eprintln!("\n📊 Import summary{}:", if dry_run { " (dry run)" } else { "" });
    for report in &run.files {
        match &report.outcome {
            FileOutcome::Imported(s) => {
                let mark = if s.failed() == 0 && !dry_run { "✅" } else { "⚠️ " };
                eprintln!(
                    "   {} {}: {}/{} records into {}",
                    mark, report.file, s.succeeded, s.attempted, s.content_type
                );
            }
            FileOutcome::Missing => eprintln!("   ⏭️  {}: file not found", report.file),
            FileOutcome::Empty => eprintln!("   ⏭️  {}: no records", report.file),
            FileOutcome::Unreadable { reason } => eprintln!("   ❌ {}: {}", report.file, reason),
            FileOutcome::Unconfigured => eprintln!("   ⏭️  {}: no import configuration", report.file),
        }
    }
    eprintln!(
        "\n✨ Done: {}/{} records imported",
        run.total_succeeded(),
        run.total_attempted()
    );
}

fn cmd_plan(plan_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(plan_path)?;
    println!("{}", plan.to_json()?);
    Ok(())
}

fn cmd_parse(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_file(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match result.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.rows.len());

    println!("{}", serde_json::to_string_pretty(&result.rows)?);
    Ok(())
}
