mod analyzer;
mod classifier;
mod config;
mod error;
mod parser;
mod report;

use clap::Parser;
use config::DetectionConfig;
use error::AppError;
use report::Report;
use std::path::PathBuf;

/// Flags requests with several suspicious traits in a web server access log
#[derive(Parser, Debug)]
#[command(
    name = "suspicious_requests",
    author,
    version,
    about = "Scans an access log and reports the most repeated suspicious requests"
)]
struct Args {
    /// Path to the access log to analyze
    #[arg(value_name = "LOG_FILE")]
    file: PathBuf,

    /// File that receives the plain-text report
    #[arg(
        short = 'o',
        long = "output",
        default_value = "suspicious_requests.log",
        value_name = "REPORT_FILE"
    )]
    output: PathBuf,

    /// TOML file with detection rules (keywords, methods, user agents, thresholds)
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Number of suspicious requests to report
    #[arg(short = 'n', long = "top", value_name = "N")]
    top_n: Option<usize>,

    /// Minimum number of reasons before a request is reported
    #[arg(short = 'm', long = "min-reasons", value_name = "COUNT")]
    min_reasons: Option<usize>,

    /// Query parameters longer than this are considered suspicious
    #[arg(short = 't', long = "param-threshold", value_name = "CHARS")]
    param_threshold: Option<usize>,

    /// Export results as JSON to the specified file path
    #[arg(short = 'j', long = "json-output", value_name = "OUTPUT_FILE")]
    json_output: Option<PathBuf>,

    /// Do not print the summary to stdout
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Log skipped lines and other diagnostics
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    /// Start from the config file (or the built-in rules) and apply CLI overrides
    fn detection_config(&self) -> Result<DetectionConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => DetectionConfig::from_file(path)?,
            None => DetectionConfig::default(),
        };
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(m) = self.min_reasons {
            config.min_reasons = m;
        }
        if let Some(t) = self.param_threshold {
            config.long_param_threshold = t;
        }
        Ok(config)
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = args.detection_config()?;
    log::debug!("detection config: {:?}", config);

    let analysis = analyzer::analyze_file(&args.file, &config)?;
    let report = Report::build(&analysis, config.top_n, &args.file);

    report::write_report_file(&report, &args.output)?;
    log::info!("report written to '{}'", args.output.display());

    if !args.quiet {
        report::print_summary(&report);
        println!("✓ Report saved to '{}'", args.output.display());
    }

    if let Some(json_path) = &args.json_output {
        report::export_json(&report, json_path)?;
        if !args.quiet {
            println!("✓ JSON report saved to '{}'", json_path.display());
        }
    }

    Ok(())
}
