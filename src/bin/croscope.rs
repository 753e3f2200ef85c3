//! Croscope CLI - Command-line interface for the croscope pipeline
//!
//! Commands:
//! - suggest: Generate suggestions for a single submission JSON
//! - run: Ingest NDJSON submissions from stdin through a stateful pipeline
//! - validate: Validate submission JSON bodies
//! - gen: Emit a synthetic submission for smoke-testing the ingest path
//! - doctor: Diagnose pipeline health and configuration

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use croscope::engine::SuggestionEngine;
use croscope::pipeline::{parse_submission, IngestPipeline};
use croscope::recorder::SessionHandle;
use croscope::summarizer::BehaviorSummarizer;
use croscope::types::{InteractionEvent, PageContext, PageType, Submission};
use croscope::{CROSCOPE_VERSION, PRODUCER_NAME};

/// Croscope - behavioral telemetry batching and CRO suggestion engine
#[derive(Parser)]
#[command(name = "croscope")]
#[command(version = CROSCOPE_VERSION)]
#[command(about = "Derive CRO suggestions from behavioral telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate suggestions for a single submission JSON
    Suggest {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Ingest NDJSON submissions from stdin (streaming mode)
    Run {
        /// Output format for responses
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Validate submission JSON bodies
    Validate {
        /// Input file path (use - for stdin), NDJSON one submission per line
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit a synthetic submission for smoke-testing the ingest path
    Gen {
        /// Number of test events in the batch
        #[arg(long, default_value = "3")]
        count: u32,

        /// URL to stamp on the submission
        #[arg(long, default_value = "https://example.com/")]
        url: String,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Diagnose pipeline health and configuration
    Doctor {
        /// Check that a sample submission file parses
        #[arg(long)]
        sample: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CroscopeCliError> {
    match cli.command {
        Commands::Suggest {
            input,
            output_format,
        } => cmd_suggest(&input, output_format),
        Commands::Run {
            output_format,
            flush,
        } => cmd_run(output_format, flush),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Gen {
            count,
            url,
            output_format,
        } => cmd_gen(count, &url, output_format),
        Commands::Doctor { sample, json } => cmd_doctor(sample.as_deref(), json),
    }
}

fn read_input(input: &PathBuf) -> Result<String, CroscopeCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn cmd_suggest(input: &PathBuf, output_format: OutputFormat) -> Result<(), CroscopeCliError> {
    let body = read_input(input)?;
    let submission = parse_submission(&body)?;
    let suggestions =
        SuggestionEngine::generate(&submission.page_context, &submission.behavior_profile);

    let output = match output_format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for suggestion in &suggestions {
                lines.push(serde_json::to_string(suggestion)?);
            }
            lines.join("\n") + "\n"
        }
        OutputFormat::Json => serde_json::to_string(&suggestions)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&suggestions)?,
    };

    print!("{}", output);
    Ok(())
}

fn cmd_run(output_format: OutputFormat, flush: bool) -> Result<(), CroscopeCliError> {
    let pipeline = IngestPipeline::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let response = pipeline.process(trimmed)?;

        let record = match output_format {
            OutputFormat::Ndjson | OutputFormat::Json => serde_json::to_string(&response)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&response)?,
        };
        writeln!(stdout, "{}", record)?;
        if flush {
            stdout.flush()?;
        }
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), CroscopeCliError> {
    let body = read_input(input)?;

    let mut report = ValidationReport {
        total_submissions: 0,
        valid_submissions: 0,
        invalid_submissions: 0,
        errors: Vec::new(),
    };

    for (index, line) in body.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.total_submissions += 1;

        match parse_submission(trimmed) {
            Ok(_) => report.valid_submissions += 1,
            Err(e) => {
                report.invalid_submissions += 1;
                report.errors.push(ValidationErrorDetail {
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total submissions:   {}", report.total_submissions);
        println!("Valid submissions:   {}", report.valid_submissions);
        println!("Invalid submissions: {}", report.invalid_submissions);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Line {}: {}", err.index + 1, err.error);
            }
        }
    }

    if report.invalid_submissions > 0 {
        Err(CroscopeCliError::ValidationFailed(report.invalid_submissions))
    } else {
        Ok(())
    }
}

fn cmd_gen(count: u32, url: &str, output_format: OutputFormat) -> Result<(), CroscopeCliError> {
    let session = SessionHandle::new(Utc::now());
    let events: Vec<InteractionEvent> = (1..=count)
        .map(|number| InteractionEvent::test(Utc::now(), number))
        .collect();

    let now = Utc::now();
    let behavior_profile = BehaviorSummarizer::summarize(&events, session.started_at, now);
    let submission = Submission {
        session_id: session.id,
        timestamp: now,
        url: url.to_string(),
        events,
        page_context: PageContext {
            title: "Synthetic test page".to_string(),
            url: url.to_string(),
            page_type: PageType::detect("/"),
            ..PageContext::default()
        },
        behavior_profile,
        is_final: false,
    };

    let output = match output_format {
        OutputFormat::Ndjson | OutputFormat::Json => serde_json::to_string(&submission)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&submission)?,
    };
    println!("{}", output);
    Ok(())
}

fn cmd_doctor(sample: Option<&std::path::Path>, json: bool) -> Result<(), CroscopeCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "croscope_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Croscope version {}", CROSCOPE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "batch_size".to_string(),
        status: CheckStatus::Ok,
        message: format!("Default batch size: {}", croscope::DEFAULT_BATCH_SIZE),
    });

    match sample {
        Some(path) => match fs::read_to_string(path) {
            Ok(body) => match parse_submission(&body) {
                Ok(submission) => {
                    checks.push(DoctorCheck {
                        name: "sample_submission".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Sample parses: session {} with {} events",
                            submission.session_id,
                            submission.events.len()
                        ),
                    });
                }
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "sample_submission".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Sample does not parse: {}", e),
                    });
                }
            },
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "sample_submission".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read sample file: {}", e),
                });
            }
        },
        None => {
            checks.push(DoctorCheck {
                name: "sample_submission".to_string(),
                status: CheckStatus::Warning,
                message: "No sample submission provided (use --sample)".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: CROSCOPE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Croscope Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CroscopeCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum CroscopeCliError {
    Io(io::Error),
    Telemetry(croscope::TelemetryError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for CroscopeCliError {
    fn from(e: io::Error) -> Self {
        CroscopeCliError::Io(e)
    }
}

impl From<croscope::TelemetryError> for CroscopeCliError {
    fn from(e: croscope::TelemetryError) -> Self {
        CroscopeCliError::Telemetry(e)
    }
}

impl From<serde_json::Error> for CroscopeCliError {
    fn from(e: serde_json::Error) -> Self {
        CroscopeCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CroscopeCliError> for CliError {
    fn from(e: CroscopeCliError) -> Self {
        match e {
            CroscopeCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CroscopeCliError::Telemetry(e) => CliError {
                code: "SUBMISSION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input is a valid submission body".to_string()),
            },
            CroscopeCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CroscopeCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} submissions failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CroscopeCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more doctor checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_submissions: usize,
    valid_submissions: usize,
    invalid_submissions: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
