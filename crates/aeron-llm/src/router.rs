//! Provider registry and current-provider selection

use std::sync::Arc;
use std::time::{Duration, Instant};

use aeron_config::LlmConfig;
use aeron_core::GenerationContext;
use aeron_usage::{ProviderStats, UsageError, UsageLog, UsageLogEntry};
use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::LlmError;
use crate::instrumented::InstrumentedProvider;
use crate::provider::{Provider, build_provider};
use crate::types::{CompletionRequest, CompletionResponse, Message};

/// Health check budget when none is configured
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Prompt sent by [`ModelRouter::health_check`]
const HEALTH_PROMPT: &str = "Hello";

/// Registered provider as reported by introspection calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub status: String,
}

/// Snapshot of the registry returned by [`ModelRouter::list_providers`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderListing {
    pub current: Option<String>,
    pub available: Vec<ProviderInfo>,
}

/// Names before and after a successful [`ModelRouter::switch_provider`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSwitch {
    pub old: Option<String>,
    pub new: String,
}

/// Outcome of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Result of [`ModelRouter::health_check`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    fn error(provider: Option<&dyn Provider>, error: impl ToString, latency_ms: Option<u64>) -> Self {
        Self {
            status: HealthStatus::Error,
            provider: provider.map(|p| p.name().to_owned()),
            model: provider.map(|p| p.model().to_owned()),
            latency_ms,
            error: Some(error.to_string()),
        }
    }
}

/// Owns the provider registry and the process-wide current selection
///
/// Every registered provider is wrapped in an [`InstrumentedProvider`], so
/// all calls routed through here land in the usage log.
pub struct ModelRouter {
    providers: IndexMap<String, Arc<dyn Provider>>,
    current: RwLock<Option<String>>,
    usage: Arc<UsageLog>,
    health_timeout: Duration,
}

impl ModelRouter {
    /// Build clients for every usable provider and select the default
    ///
    /// Providers that fail construction are logged and skipped. When the
    /// configured default is not registered the first initialized provider is
    /// selected; with no providers at all the router starts empty.
    pub fn initialize(config: &LlmConfig, usage: Arc<UsageLog>) -> Self {
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        for (name, provider_config) in &config.providers {
            if !provider_config.is_usable() {
                tracing::debug!(provider = %name, "provider disabled or missing credentials");
                continue;
            }

            match build_provider(name, provider_config) {
                Ok(provider) => {
                    tracing::info!(provider = %name, model = %provider_config.model, "initialized LLM provider");
                    providers.push(provider);
                }
                Err(e) => tracing::warn!(provider = %name, error = %e, "failed to initialize LLM provider"),
            }
        }

        Self::from_providers(providers, Some(config.default_provider.as_str()), usage)
    }

    /// Register already-constructed providers, wrapping each for usage logging
    pub fn from_providers(providers: Vec<Arc<dyn Provider>>, default: Option<&str>, usage: Arc<UsageLog>) -> Self {
        let providers: IndexMap<String, Arc<dyn Provider>> = providers
            .into_iter()
            .map(|provider| {
                let name = provider.name().to_owned();
                let wrapped: Arc<dyn Provider> = Arc::new(InstrumentedProvider::new(provider, Arc::clone(&usage)));
                (name, wrapped)
            })
            .collect();

        let current = default
            .filter(|name| providers.contains_key(*name))
            .map(ToOwned::to_owned)
            .or_else(|| {
                let first = providers.keys().next().cloned();
                if let (Some(wanted), Some(fallback)) = (default, &first) {
                    tracing::warn!(wanted, fallback = %fallback, "default provider not available, using first initialized");
                }
                first
            });

        if current.is_none() {
            tracing::warn!("no LLM providers initialized");
        }

        Self {
            providers,
            current: RwLock::new(current),
            usage,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Override the health check budget
    #[must_use]
    pub const fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Whether no provider could be initialized
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Usage log shared by every registered provider
    pub fn usage_log(&self) -> &Arc<UsageLog> {
        &self.usage
    }

    /// The named provider, or the current one when `name` is `None`
    ///
    /// # Errors
    ///
    /// [`LlmError::InvalidProviderName`] for an unregistered name and
    /// [`LlmError::ProviderUnavailable`] when no provider is selected.
    pub async fn get_provider(&self, name: Option<&str>) -> Result<Arc<dyn Provider>, LlmError> {
        match name {
            Some(name) => self
                .providers
                .get(name)
                .cloned()
                .ok_or_else(|| LlmError::InvalidProviderName {
                    provider: name.to_owned(),
                }),
            None => {
                let current = self.current.read().await;
                current
                    .as_deref()
                    .and_then(|name| self.providers.get(name))
                    .cloned()
                    .ok_or(LlmError::ProviderUnavailable)
            }
        }
    }

    /// Send `messages` to the current provider
    pub async fn invoke(
        &self,
        messages: Vec<Message>,
        context: &GenerationContext,
    ) -> Result<CompletionResponse, LlmError> {
        let provider = self.get_provider(None).await?;
        provider.complete(&CompletionRequest::new(messages), context).await
    }

    /// Make `name` the current provider
    ///
    /// # Errors
    ///
    /// [`LlmError::InvalidProviderName`] when `name` is not registered; the
    /// current selection is left unchanged.
    pub async fn switch_provider(&self, name: &str) -> Result<ProviderSwitch, LlmError> {
        if !self.providers.contains_key(name) {
            return Err(LlmError::InvalidProviderName {
                provider: name.to_owned(),
            });
        }

        let old = self.current.write().await.replace(name.to_owned());
        tracing::info!(old = ?old, new = name, "switched LLM provider");

        Ok(ProviderSwitch {
            old,
            new: name.to_owned(),
        })
    }

    /// Registered providers in registration order
    pub async fn list_providers(&self) -> ProviderListing {
        ProviderListing {
            current: self.current.read().await.clone(),
            available: self.providers.values().map(|p| info(p.as_ref())).collect(),
        }
    }

    /// The current provider, or `none`/`none` when nothing is selected
    pub async fn current_provider_info(&self) -> ProviderInfo {
        match self.get_provider(None).await {
            Ok(provider) => info(provider.as_ref()),
            Err(_) => ProviderInfo {
                name: "none".to_owned(),
                model: "none".to_owned(),
                status: "unavailable".to_owned(),
            },
        }
    }

    /// Send a minimal prompt through the current provider
    ///
    /// Failures and timeouts are reported in the returned value, never as an
    /// error.
    pub async fn health_check(&self) -> HealthReport {
        let Ok(provider) = self.get_provider(None).await else {
            return HealthReport::error(None, "No provider available", None);
        };

        let context = GenerationContext::with_timeout(self.health_timeout);
        let request = CompletionRequest::new(vec![Message::user(HEALTH_PROMPT)]);

        let start = Instant::now();
        let result = provider.complete(&request, &context).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthReport {
                status: HealthStatus::Healthy,
                provider: Some(provider.name().to_owned()),
                model: Some(provider.model().to_owned()),
                latency_ms: Some(latency_ms),
                error: None,
            },
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "health check failed");
                HealthReport::error(Some(provider.as_ref()), e, Some(latency_ms))
            }
        }
    }

    /// The last `limit` usage entries recorded for `name`
    pub async fn provider_logs(&self, name: &str, limit: usize) -> Result<Vec<UsageLogEntry>, UsageError> {
        self.usage.tail(name, limit).await
    }

    /// Usage statistics for every registered provider
    pub async fn all_provider_stats(&self) -> Result<Vec<ProviderStats>, UsageError> {
        let mut stats = Vec::with_capacity(self.providers.len());
        for name in self.providers.keys() {
            stats.push(self.usage.stats(name).await?);
        }
        Ok(stats)
    }
}

fn info(provider: &dyn Provider) -> ProviderInfo {
    ProviderInfo {
        name: provider.name().to_owned(),
        model: provider.model().to_owned(),
        status: "ready".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use aeron_config::LlmConfig;
    use async_trait::async_trait;

    use super::*;
    use crate::types::{Choice, ChoiceMessage};

    struct Stub {
        name: &'static str,
        healthy: bool,
        latency: Duration,
    }

    #[async_trait]
    impl Provider for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
            context: &GenerationContext,
        ) -> Result<CompletionResponse, LlmError> {
            if !context.sleep(self.latency).await {
                return Err(LlmError::Cancelled);
            }
            if !self.healthy {
                return Err(LlmError::Upstream("provider returned 401 Unauthorized: ".to_owned()));
            }
            Ok(CompletionResponse {
                id: "stub-1".to_owned(),
                model: "stub-model".to_owned(),
                choices: vec![Choice {
                    index: 0,
                    message: ChoiceMessage::text("Hi".to_owned()),
                    finish_reason: None,
                }],
                usage: None,
            })
        }
    }

    fn stub(name: &'static str, healthy: bool) -> Arc<dyn Provider> {
        Arc::new(Stub {
            name,
            healthy,
            latency: Duration::ZERO,
        })
    }

    fn router(providers: Vec<Arc<dyn Provider>>, default: Option<&str>) -> (ModelRouter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let usage = Arc::new(UsageLog::new(dir.path()));
        (ModelRouter::from_providers(providers, default, usage), dir)
    }

    #[tokio::test]
    async fn default_provider_is_selected() {
        let (router, _dir) = router(vec![stub("openai", true), stub("anthropic", true)], Some("anthropic"));
        assert_eq!(router.current_provider_info().await.name, "anthropic");
    }

    #[tokio::test]
    async fn missing_default_falls_back_to_first() {
        let (router, _dir) = router(vec![stub("gemini", true), stub("grok", true)], Some("openai"));
        assert_eq!(router.list_providers().await.current.as_deref(), Some("gemini"));
    }

    #[tokio::test]
    async fn empty_router_reports_unavailable() {
        let (router, _dir) = router(Vec::new(), Some("openai"));

        assert!(router.is_empty());
        let err = router.get_provider(None).await.err().unwrap();
        assert!(matches!(err, LlmError::ProviderUnavailable));

        let info = router.current_provider_info().await;
        assert_eq!((info.name.as_str(), info.model.as_str()), ("none", "none"));

        let health = router.health_check().await;
        assert_eq!(health.status, HealthStatus::Error);
        assert_eq!(health.error.as_deref(), Some("No provider available"));
    }

    #[tokio::test]
    async fn initialize_skips_providers_without_keys() {
        let config = LlmConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("g-key".to_owned()),
            _ => None,
        });
        let dir = tempfile::tempdir().unwrap();

        let router = ModelRouter::initialize(&config, Arc::new(UsageLog::new(dir.path())));

        let listing = router.list_providers().await;
        assert_eq!(listing.available.len(), 1);
        assert_eq!(listing.available[0].name, "gemini");
        assert_eq!(listing.available[0].model, "gemini-pro");
        assert_eq!(listing.current.as_deref(), Some("gemini"));
    }

    #[tokio::test]
    async fn switch_to_unknown_provider_keeps_current() {
        let (router, _dir) = router(vec![stub("openai", true)], None);

        let err = router.switch_provider("nonexistent").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidProviderName { .. }));
        assert_eq!(router.current_provider_info().await.name, "openai");
    }

    #[tokio::test]
    async fn switch_reports_old_and_new() {
        let (router, _dir) = router(vec![stub("openai", true), stub("grok", true)], Some("openai"));

        let switch = router.switch_provider("grok").await.unwrap();

        assert_eq!(switch.old.as_deref(), Some("openai"));
        assert_eq!(switch.new, "grok");
        assert_eq!(router.get_provider(None).await.unwrap().name(), "grok");
    }

    #[tokio::test]
    async fn health_check_reports_failures() {
        let (router, _dir) = router(vec![stub("anthropic", false)], None);

        let health = router.health_check().await;

        assert_eq!(health.status, HealthStatus::Error);
        assert_eq!(health.provider.as_deref(), Some("anthropic"));
        assert!(health.error.unwrap().contains("401"));
    }

    #[tokio::test(start_paused = true)]
    async fn health_check_times_out() {
        let slow: Arc<dyn Provider> = Arc::new(Stub {
            name: "openai",
            healthy: true,
            latency: Duration::from_secs(60),
        });
        let (router, _dir) = router(vec![slow], None);
        let router = router.with_health_timeout(Duration::from_secs(10));

        let health = router.health_check().await;

        assert_eq!(health.status, HealthStatus::Error);
        assert_eq!(health.error.as_deref(), Some(LlmError::Cancelled.to_string().as_str()));
    }

    #[tokio::test]
    async fn routed_calls_are_logged() {
        let (router, _dir) = router(vec![stub("openai", true), stub("grok", false)], None);

        router.invoke(vec![Message::user("ping")], &GenerationContext::new()).await.unwrap();
        router.switch_provider("grok").await.unwrap();
        router
            .invoke(vec![Message::user("ping")], &GenerationContext::new())
            .await
            .unwrap_err();

        let logs = router.provider_logs("grok", 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert!(!logs[0].success);

        let stats = router.all_provider_stats().await.unwrap();
        assert_eq!(stats.len(), 2);
        assert!((stats[0].success_rate - 100.0).abs() < 1e-9);
        assert_eq!(stats[1].failed_requests, 1);
    }
}
