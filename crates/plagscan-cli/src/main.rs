//! PlagScan — check a submission against other submissions for copied text.

use std::path::{Path, PathBuf};

use anyhow::Context;
use plagscan_core::{Document, Error, PlagScanConfig};
use plagscan_runtime::{Algorithm, Orchestrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parsed `plagscan check` arguments.
#[derive(Debug, PartialEq)]
struct CheckArgs {
    target: PathBuf,
    population: Vec<PathBuf>,
    algorithm: Algorithm,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_check_args(args: &[String]) -> Result<CheckArgs, String> {
    let mut files = Vec::new();
    let mut algorithm = Algorithm::default();
    let mut out = None;
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--algorithm" | "-a" => {
                let value = iter.next().ok_or("--algorithm needs a value")?;
                algorithm = value.parse().map_err(|e: Error| e.to_string())?;
            }
            "--out" | "-o" => {
                out = Some(PathBuf::from(iter.next().ok_or("--out needs a file")?));
            }
            "--config" | "-c" => {
                config = Some(PathBuf::from(iter.next().ok_or("--config needs a file")?));
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option: {}", flag));
            }
            path => files.push(PathBuf::from(path)),
        }
    }

    if files.is_empty() {
        return Err("check needs a target file".to_string());
    }
    let target = files.remove(0);
    Ok(CheckArgs {
        target,
        population: files,
        algorithm,
        out,
        config,
    })
}

fn document_for(path: &Path) -> Document {
    Document::from_path(path.display().to_string(), path)
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => PlagScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlagScanConfig::from_env(),
    };

    let target = document_for(&args.target);
    let population: Vec<Document> = args.population.iter().map(|p| document_for(p)).collect();

    let orchestrator = Orchestrator::new(config);
    let result = orchestrator.run_check(&target, &population, args.algorithm)?;
    let json = serde_json::to_string_pretty(&result)?;

    if let Some(out) = &args.out {
        std::fs::write(out, &json)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Result written to {}", out.display());
    }
    println!("{}", json);
    Ok(())
}

fn print_help() {
    println!("PlagScan — plagiarism similarity checks");
    println!();
    println!("Usage: plagscan <command>");
    println!();
    println!("Commands:");
    println!("  check <target> [<other>...]   Compare target against the other files");
    println!("      --algorithm lexical|semantic   Scoring algorithm (default: lexical)");
    println!("      --out <file>                   Also write the JSON result to a file");
    println!("      --config <file>                JSON configuration file");
    println!("  extract <file>                Print the extracted text of a file");
    println!("  help                          Show this help message");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("check") => {
            let check_args = match parse_check_args(&args[2..]) {
                Ok(parsed) => parsed,
                Err(msg) => {
                    eprintln!("{}", msg);
                    eprintln!("Usage: plagscan check <target> [<other>...] [--algorithm lexical|semantic] [--out <file>] [--config <file>]");
                    std::process::exit(1);
                }
            };
            if let Err(e) = run_check(check_args) {
                match e.downcast_ref::<Error>() {
                    Some(Error::NotFound(what)) => eprintln!("Not found: {}", what),
                    _ => eprintln!("Error: {:#}", e),
                }
                std::process::exit(1);
            }
        }
        Some("extract") => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: plagscan extract <file>");
                std::process::exit(1);
            };
            println!("{}", plagscan_ingest::extract_path(Path::new(path)));
        }
        Some("--help") | Some("-h") | Some("help") | None => print_help(),
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'plagscan help' for usage.", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
