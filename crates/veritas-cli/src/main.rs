//! Command-line runner for a single verification session.
//!
//! Usage: `veritas <observation.json> [answer]`
//!
//! Loads an observation, runs it, and prints the response as JSON on stdout.
//! When the engine asks a question, the answer comes from the second argument
//! or, failing that, one line of stdin.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use veritas_engine::{EngineConfig, VerificationEngine};
use veritas_models::{AnalysisResponse, Observation};
use veritas_signatures::{InMemorySignatureStore, SignatureStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: veritas <observation.json> [answer]");
    };
    let preset_answer = args.next();

    let config = EngineConfig::from_env();
    info!("Engine config: {:?}", config);

    let store = Arc::new(InMemorySignatureStore::with_known_signatures());
    let engine = VerificationEngine::new(store.clone(), config);

    let observation = load_observation(Path::new(&path)).await?;
    let (mut session, mut response) = engine.analyze(observation)?;

    if let AnalysisResponse::InterrogationRequired { question_text, .. } = &response {
        let answer = match preset_answer {
            Some(answer) => answer,
            None => prompt(question_text).await?,
        };
        response = engine.clarify(&mut session, &answer)?;
    }

    println!("{}", serde_json::to_string_pretty(&response)?);

    let stats = store.stats()?;
    let events = session.drain_events().len();
    info!(
        session_id = %session.id(),
        events = events,
        recorded_signatures = stats.recorded_signatures,
        "Session finished"
    );
    Ok(())
}

/// Colored output for dev, JSON when `LOG_FORMAT=json`. Logs go to stderr.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("veritas=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn load_observation(path: &Path) -> anyhow::Result<Observation> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid observation in {}", path.display()))
}

async fn prompt(question: &str) -> anyhow::Result<String> {
    eprintln!("{}", question);
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read answer from stdin")?;
    Ok(line.trim().to_string())
}
