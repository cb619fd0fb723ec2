use std::path::{Path, PathBuf};
use std::sync::Arc;
use structopt::StructOpt;

use logsentry::config::Config;
use logsentry::input::{load_access_folder, load_auth_folder, load_message_folder, parse_file};
use logsentry::output::{OutputFormat, OutputHandler};
use logsentry::parser::{parse_access_line, parse_auth_line};
use logsentry::{DetectionEngine, DetectionInput, SentryError};

/// Security log threat detection
#[derive(StructOpt, Debug)]
#[structopt(name = "logsentry", about = "Detect attacks in SSH auth and HTTP access logs")]
pub enum Cli {
    /// Run every detector over the configured log folders
    Scan {
        /// Path to configuration file
        #[structopt(short, long)]
        config: Option<PathBuf>,
        /// Folder of sshd auth logs
        #[structopt(long)]
        auth_dir: Option<PathBuf>,
        /// Folder of HTTP access logs
        #[structopt(long)]
        access_dir: Option<PathBuf>,
        /// Output format: json, jsonl, csv or console
        #[structopt(short, long)]
        format: Option<String>,
        /// Write findings to this file instead of stdout
        #[structopt(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "logsentry.toml")]
        output: PathBuf,
    },
    /// Parse a single log file and display its records
    Parse {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Log kind: auth or access
        #[structopt(short, long, default_value = "auth")]
        kind: String,
        /// Number of records to show
        #[structopt(short, long, default_value = "10")]
        lines: usize,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::from_args()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SentryError> {
    match cli {
        Cli::Scan {
            config,
            auth_dir,
            access_dir,
            format,
            output,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };
            if auth_dir.is_some() {
                config.input.auth_dir = auth_dir;
            }
            if access_dir.is_some() {
                config.input.access_dir = access_dir;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if output.is_some() {
                config.output.file_path = output;
            }
            scan(config).await
        }
        Cli::Config { output } => {
            Config::default().to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
            Ok(())
        }
        Cli::Parse { file, kind, lines } => match kind.as_str() {
            "auth" => show_records(&file, parse_auth_line, lines),
            "access" => show_records(&file, parse_access_line, lines),
            other => Err(SentryError::Configuration(format!(
                "unknown log kind '{}', expected auth or access",
                other
            ))),
        },
    }
}

async fn scan(config: Config) -> Result<(), SentryError> {
    let mut input = DetectionInput::default();
    if let Some(ref dir) = config.input.auth_dir {
        input.auth = Some(load_auth_folder(dir)?);
        input.messages = Some(load_message_folder(dir)?);
    }
    if let Some(ref dir) = config.input.access_dir {
        input.access = Some(load_access_folder(dir)?);
    }

    let engine = Arc::new(DetectionEngine::new(config.detection.clone())?);
    let outputs = engine.run_concurrent(Arc::new(input)).await?;

    for (name, count) in outputs.summary() {
        log::info!("{}: {} finding(s)", name, count);
    }

    let findings = outputs.into_findings();
    for finding in &findings {
        log::warn!("THREAT DETECTED: [{}] {}", finding.detector_name(), finding);
    }

    let mut handler = OutputHandler::new(
        OutputFormat::from_str(&config.output.format),
        config.output.file_path.clone(),
    )?;
    handler.write_findings(&findings)?;
    Ok(())
}

fn show_records<T, P>(file: &Path, parser: P, lines: usize) -> Result<(), SentryError>
where
    T: std::fmt::Debug,
    P: Fn(&str) -> Option<T>,
{
    let parsed = parse_file(file, parser)?;
    let display_count = std::cmp::min(lines, parsed.records.len());

    println!(
        "Parsed {} of {} line(s) (showing {}):\n",
        parsed.records.len(),
        parsed.total_lines,
        display_count
    );
    for record in parsed.records.iter().take(display_count) {
        println!("  {:?}", record);
    }
    Ok(())
}
