//! Monthly Precipitation Pivot
//!
//! Reads daily per-station precipitation observations and writes
//! station x month tables of precipitation totals and observation counts:
//! 1. Load configuration (precip_months.toml, optional)
//! 2. Read the observation CSV
//! 3. Pivot into totals and counts
//! 4. Write totals.csv, counts.csv and the monthdata.npz bundle
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- --input data/precipitation.csv --strategy indexed
//!   cargo run --release -- --config other.toml --output-dir out/
//!
//! Environment:
//!   PRECIP_MONTHS_CONFIG - config file path when --config is not given

use precip_months::analysis::pivot::{run_pivot, Strategy};
use precip_months::config::{load_config_or_default, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use precip_months::ingest::csv_source::{load_records, LoadOutcome};
use precip_months::logging::{Reporter, Stage};
use precip_months::output::{write_all, BundleSink, CsvTableSink, JsonBundleSink, MatrixSink};
use std::env;
use std::path::PathBuf;

/// Command-line overrides, applied on top of the config file.
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    strategy: Option<Strategy>,
    help: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config PATH] [--input PATH] [--output-dir DIR] [--strategy group-by|indexed] [--help]",
        program
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--help" || flag == "-h" {
            cli.help = true;
            i += 1;
            continue;
        }
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} requires a value", flag))?;

        match flag {
            "--config" => cli.config = Some(PathBuf::from(value)),
            "--input" => cli.input = Some(PathBuf::from(value)),
            "--output-dir" => cli.output_dir = Some(PathBuf::from(value)),
            "--strategy" => cli.strategy = Some(value.parse()?),
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
        i += 2;
    }

    Ok(cli)
}

fn main() {
    println!("🌧  Monthly Precipitation Pivot");
    println!("===============================\n");

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("precip_months");
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", usage(program));
            std::process::exit(1);
        }
    };
    if cli.help {
        println!("{}", usage(program));
        return;
    }

    // Load .env file if present
    dotenv::dotenv().ok();

    let config_path = cli
        .config
        .clone()
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = match load_config_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    };

    if let Some(input) = cli.input {
        config.input.path = input;
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    if let Some(strategy) = cli.strategy {
        config.pivot.strategy = strategy;
    }

    let logger = config.logging.build_logger();

    logger.info(Stage::System, "📊 Starting the processing of precipitation data...");
    let records = match load_records(&config.input.path) {
        Ok(LoadOutcome::Loaded(records)) if !records.is_empty() => {
            logger.info(
                Stage::Load,
                &format!("✓ Loaded {} records from {}", records.len(), config.input.path.display()),
            );
            records
        }
        Ok(LoadOutcome::Loaded(_)) => {
            logger.warn(Stage::Load, &format!("{} contains no records", config.input.path.display()));
            println!("\nNo data available to process.");
            return;
        }
        Ok(LoadOutcome::Missing(path)) => {
            logger.error(Stage::Load, &format!("'{}' file not found.", path.display()));
            println!("\nNo data available to process.");
            return;
        }
        Err(e) => {
            logger.error(Stage::Load, &e.to_string());
            eprintln!("\n❌ Failed to load {}\n", config.input.path.display());
            std::process::exit(1);
        }
    };

    let tables = run_pivot(
        &records,
        config.pivot.strategy,
        config.logging.preview_rows,
        &logger,
    );

    if let Err(e) = std::fs::create_dir_all(&config.output.directory) {
        eprintln!(
            "\n❌ Cannot create output directory {}: {}\n",
            config.output.directory.display(),
            e
        );
        std::process::exit(1);
    }

    let mut sinks: Vec<Box<dyn MatrixSink>> = vec![Box::new(CsvTableSink::new(
        config.output.totals_path(),
        config.output.counts_path(),
    ))];
    if config.output.write_bundle {
        sinks.push(Box::new(BundleSink::new(config.output.bundle_path())));
    }
    if config.output.write_json {
        sinks.push(Box::new(JsonBundleSink::new(config.output.json_path())));
    }

    println!("\n💾 Writing results...");
    match write_all(&sinks, &tables, &logger) {
        Ok(paths) => {
            let names: Vec<String> = paths.iter().map(|p| format!("'{}'", p.display())).collect();
            println!("\n✓ Processing complete. Files {} have been saved.", names.join(", "));
        }
        Err(e) => {
            eprintln!("\n❌ Output failed: {}\n", e);
            std::process::exit(1);
        }
    }
}
