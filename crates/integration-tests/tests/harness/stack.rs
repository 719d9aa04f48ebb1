//! Router, template engine and orchestrator wired the way the binary wires them

use std::sync::Arc;

use aeron_config::Config;
use aeron_llm::ModelRouter;
use aeron_recovery::RecoveryOrchestrator;
use aeron_templates::TemplateRecoveryEngine;
use aeron_usage::UsageLog;
use tempfile::TempDir;

/// Fully wired generation stack writing usage logs to a temporary directory
pub struct TestStack {
    pub config: Config,
    pub orchestrator: RecoveryOrchestrator,
    log_dir: TempDir,
}

impl TestStack {
    pub fn start(config: Config) -> anyhow::Result<Self> {
        let log_dir = tempfile::tempdir()?;
        let usage = Arc::new(UsageLog::new(log_dir.path()));
        let router = Arc::new(
            ModelRouter::initialize(&config.llm, usage).with_health_timeout(config.generation.health_check_timeout()),
        );
        let templates = Arc::new(TemplateRecoveryEngine::new()?);

        Ok(Self {
            config,
            orchestrator: RecoveryOrchestrator::new(router, templates),
            log_dir,
        })
    }

    pub fn router(&self) -> &ModelRouter {
        self.orchestrator.router()
    }

    pub fn usage_log(&self) -> &UsageLog {
        self.router().usage_log()
    }

    /// Directory holding the per-provider JSONL logs
    pub fn log_dir(&self) -> &std::path::Path {
        self.log_dir.path()
    }
}
