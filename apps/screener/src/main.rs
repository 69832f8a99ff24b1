mod config;
mod errors;
mod extraction;
mod routes;
mod scoring;
mod screening;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::CandidateDocument;
use crate::routes::build_router;
use crate::scoring::{RuleBasedScreener, Screener, ScoringTables};
use crate::screening::decision::DecisionPolicy;
use crate::screening::batch::scan_directory;
use crate::screening::report::{render, ReportFormat};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Rule-based resume screening", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Score every pdf, docx and txt file in a directory and print a ranked report
    Scan {
        #[arg(long, default_value = "./resumes")]
        dir: PathBuf,

        /// Position profile; defaults to SCREENER_DEFAULT_PROFILE
        #[arg(long)]
        position: Option<String>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a single document and print the result as JSON
    Score {
        file: PathBuf,

        #[arg(long)]
        position: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let screener = build_screener(&config)?;
    config.decision_policy = calibrate_policy(&config, screener.as_ref())?;

    match cli.command {
        Commands::Serve { port } => serve(config, screener, port).await,
        Commands::Scan {
            dir,
            position,
            format,
            output,
        } => scan(config, screener, dir, position, format, output).await,
        Commands::Score { file, position } => score_file(config, screener, file, position).await,
    }
}

/// Loads the scoring tables (built-in or from SCREENER_PROFILES_PATH) once,
/// validates them, and wraps them in the default screener.
fn build_screener(config: &Config) -> Result<Arc<dyn Screener>> {
    let tables = match &config.profiles_path {
        Some(path) => {
            info!("Loading scoring configuration from {}", path.display());
            ScoringTables::from_json_file(path)
        }
        None => ScoringTables::builtin(),
    }
    .context("scoring configuration failed validation")?;
    tables.profile(&config.default_profile).with_context(|| {
        format!(
            "SCREENER_DEFAULT_PROFILE '{}' is not a configured profile",
            config.default_profile
        )
    })?;

    info!(
        profiles = ?tables.profile_names(),
        evaluation_date = %config.evaluation_date,
        "Scoring tables loaded"
    );
    Ok(Arc::new(RuleBasedScreener::new(
        Arc::new(tables),
        config.evaluation_date,
    )))
}

/// Maps the configured 0-100 thresholds onto the composite range the
/// screener can reach. An accept threshold nothing can exceed fails startup.
fn calibrate_policy(config: &Config, screener: &dyn Screener) -> Result<DecisionPolicy> {
    let ceiling = screener.composite_ceiling();
    let policy = config.decision_policy.scaled_to(ceiling).with_context(|| {
        format!("SCREENER_ACCEPT_ABOVE cannot be met by composites capped at {ceiling}")
    })?;
    info!(
        composite_ceiling = ceiling,
        accept_above = policy.accept_above,
        review_from = policy.review_from,
        "Decision policy calibrated"
    );
    Ok(policy)
}

async fn serve(config: Config, screener: Arc<dyn Screener>, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.port);
    let state = AppState { config, screener };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn scan(
    config: Config,
    screener: Arc<dyn Screener>,
    dir: PathBuf,
    position: Option<String>,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let position = position.unwrap_or(config.default_profile);
    let report = scan_directory(screener, config.decision_policy, &dir, &position).await?;
    let rendered = render(&report, format)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("cannot write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn score_file(
    config: Config,
    screener: Arc<dyn Screener>,
    file: PathBuf,
    position: Option<String>,
) -> Result<()> {
    let position = position.unwrap_or(config.default_profile);
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = CandidateDocument::new(file_name.clone(), bytes)?;

    let worker = Arc::clone(&screener);
    let result = tokio::task::spawn_blocking(move || worker.score_document(&document, &position))
        .await
        .context("scoring task failed")??;

    let decision = config.decision_policy.decide(result.composite());
    let body = json!({
        "file": file_name,
        "backend": screener.backend(),
        "decision": decision,
        "result": result,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
