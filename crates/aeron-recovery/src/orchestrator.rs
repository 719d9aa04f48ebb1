use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use aeron_config::GenerationConfig;
use aeron_core::{
    CategoryInfo, Disruption, GenerationContext, GeneratorKind, PlanMetadata, RecoveryOption, RecoveryPlan,
    now_rfc3339,
};
use aeron_llm::{CompletionRequest, Message, ModelRouter, Provider};
use aeron_telemetry::metrics::{self, RECOVERY_GENERATION_DURATION, RECOVERY_OPTIONS_GENERATED};
use aeron_telemetry::{Counter, Histogram, KeyValue};
use aeron_templates::{TemplateRecoveryEngine, categorize};
use dashmap::DashMap;

use crate::merge::merge_steps;
use crate::normalize::{normalize_option, normalize_steps};
use crate::parse::{parse_batch, parse_single};
use crate::prompt::{PromptVars, batch_prompt, single_option_prompt};
use crate::RecoveryError;

/// How long a derived category is reused for the same disruption id
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Counts above this always use one call per option
const BATCH_LIMIT: usize = 2;

struct CachedCategory {
    category: CategoryInfo,
    stored_at: tokio::time::Instant,
}

/// Drives model generation and falls back to the template catalog
///
/// [`generate`](Self::generate) never fails: when no provider is available,
/// every attempt fails or the context is cancelled, the result comes from
/// the template engine instead.
pub struct RecoveryOrchestrator {
    router: Arc<ModelRouter>,
    templates: Arc<TemplateRecoveryEngine>,
    categories: DashMap<String, CachedCategory>,
    cache_ttl: Duration,
    duration: Histogram<f64>,
    options_generated: Counter<u64>,
}

impl RecoveryOrchestrator {
    pub fn new(router: Arc<ModelRouter>, templates: Arc<TemplateRecoveryEngine>) -> Self {
        let meter = metrics::meter();
        Self {
            router,
            templates,
            categories: DashMap::new(),
            cache_ttl: DEFAULT_CACHE_TTL,
            duration: meter.f64_histogram(RECOVERY_GENERATION_DURATION).with_unit("s").build(),
            options_generated: meter.u64_counter(RECOVERY_OPTIONS_GENERATED).build(),
        }
    }

    /// Override how long derived categories are cached
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn router(&self) -> &Arc<ModelRouter> {
        &self.router
    }

    pub fn templates(&self) -> &Arc<TemplateRecoveryEngine> {
        &self.templates
    }

    /// Forget every cached category
    pub fn clear_cache(&self) {
        self.categories.clear();
    }

    /// The category to generate for
    ///
    /// An explicit category wins and is remembered for the disruption id.
    /// Otherwise a cached entry younger than the TTL is reused, and failing
    /// that the category is derived from the disruption.
    pub fn resolve_category(&self, disruption: &Disruption, category: Option<CategoryInfo>) -> CategoryInfo {
        let id = disruption.id.as_deref();

        if let Some(category) = category {
            if let Some(id) = id {
                self.remember(id, &category);
            }
            return category;
        }

        if let Some(id) = id {
            self.categories.remove_if(id, |_, cached| cached.stored_at.elapsed() >= self.cache_ttl);
            if let Some(cached) = self.categories.get(id) {
                return cached.category.clone();
            }
        }

        let derived = categorize(disruption);
        if let Some(id) = id {
            self.remember(id, &derived);
        }
        derived
    }

    fn remember(&self, id: &str, category: &CategoryInfo) {
        self.categories.retain(|_, cached| cached.stored_at.elapsed() < self.cache_ttl);
        self.categories.insert(
            id.to_owned(),
            CachedCategory {
                category: category.clone(),
                stored_at: tokio::time::Instant::now(),
            },
        );
    }

    /// Recovery plan for `disruption`
    ///
    /// A well-formed disruption always yields at least `config.count`
    /// options; one without a flight number yields an empty plan.
    pub async fn generate(
        &self,
        disruption: &Disruption,
        category: Option<CategoryInfo>,
        config: &GenerationConfig,
        context: &GenerationContext,
    ) -> RecoveryPlan {
        let start = Instant::now();
        let category = self.resolve_category(disruption, category);
        let count = config.count.max(1);

        let plan = match self.generate_with_model(disruption, &category, config, context).await {
            Ok(plan) => plan,
            Err(RecoveryError::MalformedDisruption) => {
                tracing::warn!(disruption_id = ?disruption.id, "disruption has no flight number, returning empty plan");
                RecoveryPlan::empty()
            }
            Err(e) => {
                tracing::warn!(
                    flight_number = disruption.flight_number(),
                    category = %category.category_code,
                    error = %e,
                    "model generation failed, using template recovery"
                );
                self.templates.generate_with_count(disruption, Some(&category), count)
            }
        };

        self.record(&plan, start);
        plan
    }

    /// Model-backed generation without the template fallback for total failure
    ///
    /// Incremental runs still top up a short result from the catalog.
    ///
    /// # Errors
    ///
    /// [`RecoveryError::MalformedDisruption`] without a flight number,
    /// [`RecoveryError::ProviderUnavailable`] when no provider is selected,
    /// and for batch runs [`RecoveryError::TotalGenerationFailure`] or
    /// [`RecoveryError::Cancelled`].
    pub async fn generate_with_model(
        &self,
        disruption: &Disruption,
        category: &CategoryInfo,
        config: &GenerationConfig,
        context: &GenerationContext,
    ) -> Result<RecoveryPlan, RecoveryError> {
        if !disruption.is_well_formed() {
            return Err(RecoveryError::MalformedDisruption);
        }

        let provider = self.router.get_provider(None).await?;
        let disruption = disruption.normalized();
        let count = config.count.max(1);

        if count > BATCH_LIMIT || config.incremental {
            Ok(self
                .generate_incremental(provider.as_ref(), &disruption, category, count, config, context)
                .await)
        } else {
            generate_batch(provider.as_ref(), &disruption, category, count, config, context).await
        }
    }

    /// One call per option, topped up from the catalog
    async fn generate_incremental(
        &self,
        provider: &dyn Provider,
        disruption: &Disruption,
        category: &CategoryInfo,
        count: usize,
        config: &GenerationConfig,
        context: &GenerationContext,
    ) -> RecoveryPlan {
        let vars = PromptVars::new(disruption, category);
        let mut steps = self.templates.process_skeleton(disruption);
        let mut options: Vec<RecoveryOption> = Vec::with_capacity(count);

        tracing::info!(
            flight_number = disruption.flight_number(),
            provider = provider.name(),
            count,
            "generating recovery options incrementally"
        );

        for option_number in 1..=count {
            if context.is_done() {
                tracing::info!(option_number, "generation cancelled, stopping model calls");
                break;
            }

            let position = options.len() + 1;
            let prompt = single_option_prompt(&vars, option_number, options.len(), &now_rfc3339());
            let prompt = prompt.as_str();

            let result = with_retries(config, context, "option", move || async move {
                let text = complete(provider, prompt, context).await?;
                let payload = parse_single(&text)?;
                let option = normalize_option(payload.option, position)?;
                Ok((option, normalize_steps(payload.steps)))
            })
            .await;

            match result {
                Ok((mut option, new_steps)) => {
                    option.priority = priority(position);
                    options.push(option);
                    merge_steps(&mut steps, new_steps);

                    if option_number < count && !context.sleep(config.pacing()).await {
                        tracing::info!(option_number, "generation cancelled during pacing");
                        break;
                    }
                }
                Err(RecoveryError::Cancelled) => break,
                Err(e @ RecoveryError::ProviderUnavailable(_)) => {
                    tracing::warn!(error = %e, "provider became unavailable, stopping model calls");
                    break;
                }
                Err(e) => {
                    tracing::warn!(option_number, error = %e, "skipping option after exhausting retries");
                }
            }
        }

        let model_options = options.len();
        let shortfall = count.saturating_sub(model_options);
        if shortfall > 0 {
            tracing::info!(model_options, shortfall, "filling remaining options from templates");
            options.extend(
                self.templates
                    .fill(disruption, category, shortfall, priority(model_options + 1)),
            );
        }

        let metadata = plan_metadata(
            disruption,
            category,
            GeneratorKind::LlmIncremental,
            provider,
            model_options,
            shortfall,
        );
        RecoveryPlan {
            options,
            steps,
            metadata: Some(metadata),
        }
    }

    fn record(&self, plan: &RecoveryPlan, start: Instant) {
        let generator = plan
            .metadata
            .as_ref()
            .map_or("none", |metadata| metadata.generator.as_ref());
        metrics::record_duration(&self.duration, start, &[KeyValue::new("generator", generator.to_owned())]);

        let (model, template) = plan.provenance_counts();
        for (source, count) in [("model", model), ("template", template)] {
            self.options_generated.add(
                u64::try_from(count).unwrap_or(u64::MAX),
                &[KeyValue::new("source", source)],
            );
        }
    }
}

/// One call for every option
async fn generate_batch(
    provider: &dyn Provider,
    disruption: &Disruption,
    category: &CategoryInfo,
    count: usize,
    config: &GenerationConfig,
    context: &GenerationContext,
) -> Result<RecoveryPlan, RecoveryError> {
    let prompt = batch_prompt(&PromptVars::new(disruption, category), count);
    let prompt = prompt.as_str();

    tracing::info!(
        flight_number = disruption.flight_number(),
        provider = provider.name(),
        count,
        "generating recovery options in one batch"
    );

    let (options, steps) = with_retries(config, context, "batch", move || async move {
        let text = complete(provider, prompt, context).await?;
        let payload = parse_batch(&text)?;
        let mut options = payload
            .options
            .into_iter()
            .enumerate()
            .map(|(index, raw)| normalize_option(raw, index + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if options.is_empty() {
            return Err(RecoveryError::Transient("response holds no options".to_owned()));
        }
        rank(&mut options);

        let mut steps = Vec::new();
        merge_steps(&mut steps, normalize_steps(payload.steps));
        Ok((options, steps))
    })
    .await?;

    let metadata = plan_metadata(disruption, category, GeneratorKind::LlmBatch, provider, options.len(), 0);
    Ok(RecoveryPlan {
        options,
        steps,
        metadata: Some(metadata),
    })
}

/// Send `prompt` as a single user message and return the reply text
async fn complete(provider: &dyn Provider, prompt: &str, context: &GenerationContext) -> Result<String, RecoveryError> {
    let request = CompletionRequest::new(vec![Message::user(prompt)]);
    let response = provider.complete(&request, context).await?;

    let text = response.text();
    if text.trim().is_empty() {
        return Err(RecoveryError::Transient("model returned an empty response".to_owned()));
    }
    Ok(text.to_owned())
}

/// Run `call` until it succeeds, fails permanently or runs out of attempts
///
/// Attempt `n` that fails transiently is followed by a wait of `n` backoff
/// units. The wait is cut short when the context ends.
async fn with_retries<T, F, Fut>(
    config: &GenerationConfig,
    context: &GenerationContext,
    label: &str,
    call: F,
) -> Result<T, RecoveryError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RecoveryError>>,
{
    let attempts = config.max_retries.saturating_add(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        if context.is_done() {
            return Err(RecoveryError::Cancelled);
        }

        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                tracing::warn!(label, attempt, attempts, error = %e, "generation attempt failed");
                last_error = e.to_string();

                if attempt < attempts && !context.sleep(config.backoff_base() * attempt).await {
                    return Err(RecoveryError::Cancelled);
                }
            }
        }
    }

    Err(RecoveryError::TotalGenerationFailure { attempts, last_error })
}

/// Order by the model's priority, keeping reply order for ties, then
/// number 1..N
fn rank(options: &mut [RecoveryOption]) {
    options.sort_by_key(|option| option.priority);
    for (index, option) in options.iter_mut().enumerate() {
        option.priority = priority(index + 1);
    }
}

fn priority(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

fn plan_metadata(
    disruption: &Disruption,
    category: &CategoryInfo,
    generator: GeneratorKind,
    provider: &dyn Provider,
    model_options: usize,
    fallback_options: usize,
) -> PlanMetadata {
    PlanMetadata {
        category_code: category.category_code.clone(),
        disruption_id: disruption.id.clone(),
        flight_number: disruption.flight_number().map(str::to_owned),
        generation_time: now_rfc3339(),
        generator,
        provider: Some(provider.name().to_owned()),
        model_options,
        fallback_options,
    }
}
