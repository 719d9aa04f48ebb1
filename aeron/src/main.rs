#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod commands;

use std::sync::Arc;

use aeron_config::Config;
use aeron_llm::ModelRouter;
use aeron_recovery::RecoveryOrchestrator;
use aeron_templates::TemplateRecoveryEngine;
use aeron_usage::UsageLog;
use anyhow::Context;
use args::{Args, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::from_env()
    };

    // Initialize telemetry
    let _telemetry_guard = aeron_telemetry::init(config.telemetry.as_ref(), "info")?;

    tracing::debug!(
        config_path = %args.config.display(),
        from_file = args.config.exists(),
        "configuration loaded"
    );

    let usage = Arc::new(UsageLog::new(config.usage.log_dir.clone()));
    let router = Arc::new(
        ModelRouter::initialize(&config.llm, usage).with_health_timeout(config.generation.health_check_timeout()),
    );

    match args.command {
        Command::Generate(generate) => {
            let templates = Arc::new(TemplateRecoveryEngine::new().context("template catalog is invalid")?);
            let orchestrator = RecoveryOrchestrator::new(router, templates);
            commands::generate(&orchestrator, &config.generation, &generate).await
        }
        Command::Classify {
            disruption_type,
            reason,
        } => commands::classify(&disruption_type, &reason),
        Command::Providers => commands::print(&router.list_providers().await),
        Command::Health => commands::print(&router.health_check().await),
        Command::Stats { provider, limit } => commands::stats(&router, provider.as_deref(), limit).await,
        Command::Switch { name } => {
            router.switch_provider(&name).await?;
            commands::print(&router.list_providers().await)
        }
    }
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received, abandoning model generation");
}
