use std::path::Path;

use aeron_config::GenerationConfig;
use aeron_core::{CategoryInfo, Disruption, GenerationContext};
use aeron_llm::ModelRouter;
use aeron_recovery::RecoveryOrchestrator;
use aeron_templates::classifier::{category_from_label, map_disruption_type_to_category};
use anyhow::Context;
use serde::Serialize;

use crate::args::GenerateArgs;

/// Write `value` to stdout as pretty JSON
pub fn print(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_disruption(path: &Path) -> anyhow::Result<Disruption> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a disruption record", path.display()))
}

/// Category requested on the command line; unknown codes pass through as-is
fn category_arg(label: &str) -> CategoryInfo {
    category_from_label(label).map_or_else(
        || CategoryInfo {
            category_code: label.trim().to_owned(),
            category_name: label.trim().to_owned(),
        },
        CategoryInfo::from,
    )
}

pub async fn generate(
    orchestrator: &RecoveryOrchestrator,
    defaults: &GenerationConfig,
    args: &GenerateArgs,
) -> anyhow::Result<()> {
    let disruption = read_disruption(&args.disruption)?;

    if let Some(provider) = args.provider.as_deref() {
        let switch = orchestrator.router().switch_provider(provider).await?;
        tracing::info!(old = ?switch.old, new = %switch.new, "switched provider");
    }

    let mut config = defaults.clone();
    if let Some(count) = args.count {
        config.count = count;
    }
    config.incremental |= args.incremental;

    let context = config
        .timeout()
        .map_or_else(GenerationContext::new, GenerationContext::with_timeout);

    let token = context.cancellation_token().clone();
    let signal = tokio::spawn(async move {
        crate::shutdown_signal().await;
        token.cancel();
    });

    let category = args.category.as_deref().map(category_arg);
    let plan = orchestrator.generate(&disruption, category, &config, &context).await;
    signal.abort();

    if plan.is_empty() {
        tracing::warn!(path = %args.disruption.display(), "no recovery options produced");
    }

    print(&plan)
}

pub fn classify(disruption_type: &str, reason: &str) -> anyhow::Result<()> {
    print(&map_disruption_type_to_category(disruption_type, reason).info())
}

pub async fn stats(router: &ModelRouter, provider: Option<&str>, limit: usize) -> anyhow::Result<()> {
    match provider {
        Some(name) => print(&router.provider_logs(name, limit).await?),
        None => print(&router.all_provider_stats().await?),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use aeron_core::CategoryCode;

    use super::*;

    #[test]
    fn category_arg_accepts_codes_and_names() {
        assert_eq!(category_arg("CREW_ISSUE"), CategoryCode::CrewIssue.info());
        assert_eq!(category_arg("ATC/weather delay"), CategoryCode::AtcWeather.info());

        let unknown = category_arg(" VOLCANIC_ASH ");
        assert_eq!(unknown.category_code, "VOLCANIC_ASH");
        assert!(unknown.code().is_none());
    }

    #[test]
    fn reads_disruption_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"flight_number": "FZ181", "passengers": 175}}"#).unwrap();

        let disruption = read_disruption(file.path()).unwrap();
        assert_eq!(disruption.flight_number(), Some("FZ181"));
        assert_eq!(disruption.passengers, Some(175));
    }

    #[test]
    fn rejects_non_disruption_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "flight FZ181 delayed").unwrap();

        assert!(read_disruption(file.path()).is_err());
    }
}
