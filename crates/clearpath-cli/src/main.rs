//! ClearPath CLI - vehicle safety recall check
//!
//! The `clearpath` command looks up recalls for a vehicle and prints a
//! plain-language RED/YELLOW verdict.
//!
//! ## Commands
//!
//! - `check`: look up recalls and classify the combined risk
//! - `config`: show the effective configuration (API key redacted)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn, Level};

use clearpath_core::{
    ClearPathConfig, LogFormat, PipelineResult, RecallExplanation, RecallTable, RiskLevel,
    RiskPipeline, VehicleIdentifier, METRICS,
};

#[derive(Parser)]
#[command(name = "clearpath")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vehicle safety recall check with a plain-language risk verdict", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up recalls for a vehicle and classify the combined risk
    Check {
        /// Model year
        #[arg(long, default_value = "2018")]
        year: String,

        /// Manufacturer
        #[arg(long, default_value = "Tesla")]
        make: String,

        /// Model name
        #[arg(long, default_value = "Model 3")]
        model: String,

        /// Print the result as a JSON report instead of text
        #[arg(long)]
        report_json: bool,

        /// Write the recall table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also explain the first N recalls one by one
        #[arg(long, num_args = 0..=1, default_missing_value = "3")]
        explain: Option<usize>,

        /// Recall registry endpoint
        #[arg(long, env = "CLEARPATH_REGISTRY_URL")]
        registry_url: Option<String>,

        /// Gemini model name
        #[arg(long = "gemini-model", env = "CLEARPATH_MODEL")]
        gemini_model: Option<String>,

        /// Token preceding RED/YELLOW in the generator's reply
        #[arg(long, env = "CLEARPATH_VERDICT_TOKEN")]
        verdict_token: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Options for one `check` invocation
struct CheckOptions {
    report_json: bool,
    csv: Option<PathBuf>,
    explain: Option<usize>,
}

/// Machine-readable result of `check --report-json`
#[derive(Serialize)]
struct CheckReport<'a> {
    vehicle: &'a VehicleIdentifier,
    checked_at: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a PipelineResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    explanations: Vec<RecallExplanation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation_error: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    clearpath_core::init_tracing(LogFormat::from_json_flag(cli.json), level);

    let outcome = match cli.command {
        Commands::Check {
            year,
            make,
            model,
            report_json,
            csv,
            explain,
            registry_url,
            gemini_model,
            verdict_token,
        } => {
            let vehicle = VehicleIdentifier::new(year, make, model);
            let options = CheckOptions {
                report_json,
                csv,
                explain,
            };
            match build_pipeline(registry_url, gemini_model, verdict_token) {
                Ok(pipeline) => cmd_check(&pipeline, &vehicle, &options).await,
                Err(e) => Err(e),
            }
        }
        Commands::Config => cmd_config(),
    };

    METRICS.flush();

    match outcome {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Recall check failed: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Assemble the HTTP-backed pipeline from the environment plus flag overrides.
fn build_pipeline(
    registry_url: Option<String>,
    gemini_model: Option<String>,
    verdict_token: Option<String>,
) -> Result<RiskPipeline> {
    let mut config = ClearPathConfig::from_env().context("Failed to read configuration")?;
    if let Some(url) = registry_url {
        config.registry.endpoint = url;
    }
    if let Some(model) = gemini_model {
        config.gemini.model = model;
    }
    if verdict_token.is_some() {
        config.verdict_token = verdict_token;
    }

    RiskPipeline::from_config(&config).context("Failed to set up the recall check")
}

/// Run one lookup and render it. Returns the text destined for stdout.
async fn cmd_check(
    pipeline: &RiskPipeline,
    vehicle: &VehicleIdentifier,
    options: &CheckOptions,
) -> Result<String> {
    let result = pipeline
        .run(vehicle)
        .await
        .with_context(|| format!("Lookup for {vehicle} failed"))?;

    if let Some(path) = &options.csv {
        export_csv(&result, path)?;
    }

    // Explanations are extra detail; the verdict stands without them.
    let (explanations, explanation_error) = match options.explain {
        Some(limit) if !result.records().is_empty() => {
            match pipeline.explain(result.records(), limit).await {
                Ok(explanations) => (explanations, None),
                Err(e) => {
                    warn!(error = %e, "recall explanations unavailable");
                    (Vec::new(), Some(e.to_string()))
                }
            }
        }
        _ => (Vec::new(), None),
    };

    if options.report_json {
        let report = CheckReport {
            vehicle,
            checked_at: Utc::now(),
            result: &result,
            explanations,
            explanation_error,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = render_result_text(vehicle, &result);
    if !explanations.is_empty() {
        out.push_str("\n\n");
        out.push_str(&render_explanations_text(&explanations));
    }
    if let Some(error) = explanation_error {
        out.push_str(&format!("\n\nExplanations unavailable: {error}"));
    }
    Ok(out)
}

fn export_csv(result: &PipelineResult, path: &Path) -> Result<()> {
    let table = RecallTable::from_records(result.records());
    table
        .write_csv_file(path)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    info!(path = %path.display(), rows = table.rows.len(), "recall table exported");
    Ok(())
}

fn cmd_config() -> Result<String> {
    let config = ClearPathConfig::from_env().context("Failed to read configuration")?;
    let mut out = String::new();
    out.push_str("ClearPath Configuration\n");
    out.push_str("=======================\n");
    out.push_str(&format!("Registry:        {}\n", config.registry.endpoint));
    out.push_str(&format!(
        "Registry timeout: {}s\n",
        config.registry.timeout.as_secs()
    ));
    out.push_str(&format!("Gemini URL:      {}\n", config.gemini.base_url));
    out.push_str(&format!("Model:           {}\n", config.gemini.model));
    out.push_str(&format!(
        "Gemini timeout:  {}s\n",
        config.gemini.timeout.as_secs()
    ));
    out.push_str(&format!(
        "API key:         {}\n",
        if config.gemini.require_api_key().is_ok() {
            "set"
        } else {
            "missing"
        }
    ));
    out.push_str(&format!("Verdict token:   {}", config.verdict_token()));
    Ok(out)
}

fn render_result_text(vehicle: &VehicleIdentifier, result: &PipelineResult) -> String {
    let (records, verdict) = match result {
        PipelineResult::NoRecalls => {
            return format!("No active recalls found for {vehicle}.");
        }
        PipelineResult::RecallsFound { records, verdict } => (records, verdict),
    };

    let mut out = String::new();
    out.push_str(&format!("Recalls for {vehicle}: {}\n\n", records.len()));
    out.push_str(&render_table_text(&RecallTable::from_records(records)));
    out.push_str("\n\n");

    let banner = match verdict.level {
        RiskLevel::Red => "RED - stop or limit driving until repaired",
        RiskLevel::Yellow => "YELLOW - schedule a repair",
    };
    out.push_str(&format!("Verdict: {banner}\n"));
    out.push_str(&verdict.summary);
    out
}

/// Aligned text table of the four essential columns.
fn render_table_text(table: &RecallTable) -> String {
    const SHOWN: usize = 4;
    const MAX_WIDTH: usize = 60;

    let cell = |s: &str| -> String {
        let flat = s.replace(['\n', '\r'], " ");
        if flat.chars().count() > MAX_WIDTH {
            let cut: String = flat.chars().take(MAX_WIDTH - 3).collect();
            format!("{cut}...")
        } else {
            flat
        }
    };

    let header: Vec<String> = table.headers.iter().take(SHOWN).map(|h| cell(h)).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| r.iter().take(SHOWN).map(|c| cell(c)).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|r| r[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&header)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.iter().map(|r| line(r)));
    out.join("\n")
}

fn render_explanations_text(explanations: &[RecallExplanation]) -> String {
    let mut out = String::new();
    for (i, e) in explanations.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        if e.action_number.is_empty() {
            out.push_str(&format!("Component: {}\n", e.component));
        } else {
            out.push_str(&format!("Component: {} ({})\n", e.component, e.action_number));
        }
        out.push_str(&e.explanation);
    }
    out
}
