//! Grid Generator CLI
//!
//! Compiles grid files and reports errors with source snippets. Nothing is
//! rendered; use `--dump` to inspect the resolved scene.
//!
//! Usage:
//!   grid-generator [OPTIONS] [FILES]...

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{error, info, LevelFilter};

use grid_generator::{compile_source, CompileConfig, ErrorMode};

#[derive(Parser, Debug)]
#[command(name = "grid-generator")]
#[command(about = "Compile grid-cell shape notation into a resolved scene")]
struct Cli {
    /// Input files (reads from stdin if none are given)
    inputs: Vec<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Report every failing cell instead of stopping at the first
    #[arg(long)]
    collect_all: bool,

    /// Print the resolved scene of each input
    #[arg(long)]
    dump: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting grid-generator");

    let mut config = match &cli.config {
        Some(path) => match CompileConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = path.display().to_string(), err:err; "Failed to load config");
                eprintln!("Error loading config '{}': {}", path.display(), err);
                process::exit(1);
            }
        },
        None => CompileConfig::default(),
    };
    if cli.collect_all {
        config = config.with_error_mode(ErrorMode::CollectAll);
    }

    let inputs = read_inputs(&cli.inputs).unwrap_or_else(|(name, err)| {
        eprintln!("Error reading '{}': {}", name, err);
        process::exit(1);
    });

    let mut failed = 0;
    for (name, source) in &inputs {
        info!(file_name = name.as_str(); "Compiling");
        match compile_source(source, &config) {
            Ok(doc) => {
                let (rows, columns) = doc.dimensions();
                let (width, height) = doc.canvas_size();
                println!(
                    "{}: {} rows x {} columns, {} shapes, {}x{} px",
                    name,
                    rows,
                    columns,
                    doc.shape_count(),
                    width,
                    height
                );
                if cli.dump {
                    println!("{:#?}", doc);
                }
            }
            Err(err) => {
                failed += 1;
                eprint!("{}", err.report(source, name));
            }
        }
    }

    if failed > 0 {
        error!(failed, total = inputs.len(); "Compilation failed");
        process::exit(1);
    }
}

/// Read every input as `(display name, text)`
fn read_inputs(paths: &[PathBuf]) -> Result<Vec<(String, String)>, (String, io::Error)> {
    if paths.is_empty() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| ("<stdin>".to_string(), e))?;
        return Ok(vec![("<stdin>".to_string(), buffer)]);
    }

    paths
        .iter()
        .map(|path| {
            let name = path.display().to_string();
            fs::read_to_string(path)
                .map(|text| (name.clone(), text))
                .map_err(|e| (name, e))
        })
        .collect()
}
