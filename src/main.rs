use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use histitem::application::{LoadScenarioUseCase, ScenarioDto, SendPipeline};
use histitem::domain::entities::{PeerCache, TimeId};
use histitem::domain::{DrawInDialog, History};
use histitem::infrastructure::config::StateConfig;
use histitem::infrastructure::{AppConfig, CliArgs, Command, ScenarioLoader, StorageManager};
use histitem::presentation::{ReportRenderer, render_events};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn resolve_scenario(command: &Command, state: &StateConfig) -> Result<PathBuf> {
    command
        .scenario()
        .or(state.last_scenario.as_ref())
        .cloned()
        .ok_or_else(|| eyre!("no scenario given and none remembered from a previous run"))
}

fn peers_of(scenario: &ScenarioDto) -> PeerCache {
    let peers = PeerCache::new();
    peers.insert(scenario.peer.clone());
    peers.extend(scenario.peers.iter().cloned());
    peers
}

fn build_history(scenario: &ScenarioDto, peers: &PeerCache, config: &AppConfig) -> Result<History> {
    LoadScenarioUseCase::new(Arc::new(peers.clone()), config.history.clone())
        .execute(scenario)
        .wrap_err("Failed to build history from scenario")
}

fn print_report(history: &History, peers: &PeerCache, config: &AppConfig, now: TimeId, draw: DrawInDialog) {
    let renderer = ReportRenderer::new(peers, &config.history, now, &config.report.timestamp_format)
        .with_draw(draw);
    for line in renderer.render(history) {
        println!("{line}");
    }
}

async fn replay(scenario: ScenarioDto, peers: &PeerCache, config: &AppConfig) -> Result<()> {
    let mut history = build_history(&scenario, peers, config)?;
    history.take_events();

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let pipeline = tokio::spawn(SendPipeline::new(history, outcome_rx, event_tx).run());

    for outcome in scenario.send_outcomes {
        outcome_tx
            .send(outcome)
            .map_err(|_| eyre!("send pipeline stopped early"))?;
    }
    drop(outcome_tx);

    let history = pipeline.await.wrap_err("Send pipeline task failed")?;
    let mut events = Vec::new();
    while let Some(event) = event_rx.recv().await {
        events.push(event);
    }
    for line in render_events(&events) {
        println!("{line}");
    }

    let now = scenario.now.unwrap_or_else(|| Utc::now().timestamp());
    let draw = if config.report.without_sender {
        DrawInDialog::WithoutSender
    } else {
        DrawInDialog::Normal
    };
    print_report(&history, peers, config, now, draw);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = histitem::VERSION, "Starting {}", histitem::NAME);

    let mut state = storage.load_state()?;
    let path = resolve_scenario(&args.command, &state)?;
    let scenario = ScenarioLoader::load(&path).await?;
    state.last_scenario = Some(path);
    storage.save_state(&state)?;

    let peers = peers_of(&scenario);
    match args.command {
        Command::Inspect {
            now,
            without_sender,
            ..
        } => {
            let history = build_history(&scenario, &peers, &config)?;
            let now = now
                .or(scenario.now)
                .unwrap_or_else(|| Utc::now().timestamp());
            let draw = if without_sender || config.report.without_sender {
                DrawInDialog::WithoutSender
            } else {
                DrawInDialog::Normal
            };
            print_report(&history, &peers, &config, now, draw);
        }
        Command::Replay { .. } => replay(scenario, &peers, &config).await?,
    }

    Ok(())
}
