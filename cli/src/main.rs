//! CLI entrypoint for Forecast Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use forecast_application::{
    ForecastBatchInput, ForecastBatchUseCase, ForecastParams, ForecastQuestionUseCase, NoProgress,
    ProgressNotifier,
};
use forecast_domain::{ConfigIssue, OutputFormat};
use forecast_infrastructure::{
    ConfigLoader, DryRunSubmitter, FileConfig, JsonlOutcomeLog, QuestionLoader, ReplayLlmGateway,
    StaticResearch,
};
use forecast_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Forecast Quorum");

    if cli.show_config {
        println!("{}", "Configuration sources (highest priority first):".bold());
        if let Some(path) = &cli.config {
            println!("  Explicit: {}", path.display());
        }
        for (name, path) in ConfigLoader::config_sources() {
            match path {
                Some(path) => println!("  {}: {}", name, path.display()),
                None => println!("  {}: {}", name, "(not found)".dimmed()),
            }
        }
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_overrides(&mut config, &cli);
    report_issues(&config.validate())?;
    let params = config.forecast.to_params();

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = config.output.resolve_format(cli.output);

    // === Inputs ===
    let questions = QuestionLoader::load_all(&cli.questions)?;
    let Some(responses) = &cli.responses else {
        bail!("--responses is required");
    };
    let gateway = ReplayLlmGateway::from_file(responses)?;
    for question in &questions {
        let recorded = gateway.recorded_runs(question.id);
        if recorded < params.runs_per_question {
            warn!(
                "Question {} has {} recorded responses for {} runs",
                question.id, recorded, params.runs_per_question
            );
        }
    }
    let research = cli
        .research
        .as_deref()
        .map(StaticResearch::new)
        .unwrap_or_default();

    // === Dependency Injection ===
    let token = CancellationToken::new();
    let forecaster = ForecastQuestionUseCase::new(Arc::new(gateway), Arc::new(research))
        .with_behavior(config.forecast.to_behavior());
    let use_case = ForecastBatchUseCase::new(forecaster, Arc::new(DryRunSubmitter))
        .with_cancellation(token.clone());

    let cancel_on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining runs");
            cancel_on_interrupt.cancel();
        }
    });

    let input = ForecastBatchInput::new(questions, params).with_submit(cli.submit);
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if format == OutputFormat::Summary {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let reports = use_case.execute_with_progress(input, progress.as_ref()).await;

    if let Some(path) = &cli.log_file {
        match JsonlOutcomeLog::open(path) {
            Some(log) => reports.iter().for_each(|r| log.record_report(r)),
            None => warn!("Outcome log {} not written", path.display()),
        }
    }

    // Output results
    println!("{}", ConsoleFormatter.render(format, &reports));

    let failed: Vec<_> = reports.iter().filter(|r| !r.is_success()).collect();
    if !failed.is_empty() {
        for report in &failed {
            eprintln!(
                "{} question {} ({})",
                "Failed:".red().bold(),
                report.question_id,
                report.title
            );
        }
        bail!("{} of {} questions failed", failed.len(), reports.len());
    }

    Ok(())
}

/// Print configuration issues; error-level issues abort the run
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        if issue.is_error() {
            eprintln!("{} {}", "Config error:".red().bold(), issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    if ForecastParams::has_errors(issues) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// CLI flags win over every config file
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.forecast.model = Some(model.clone());
    }
    if let Some(runs) = cli.runs {
        config.forecast.runs_per_question = runs;
    }
}
