//! Provider calls, selection and usage logging over HTTP

mod harness;

use aeron_core::GenerationContext;
use aeron_llm::types::Message;
use aeron_llm::{HealthStatus, LlmError};
use harness::config::ConfigBuilder;
use harness::mock_llm::MockLlm;
use harness::stack::TestStack;

fn ping() -> Vec<Message> {
    vec![Message::user("ping")]
}

#[tokio::test]
async fn openai_provider_completes_through_router() {
    let mock = MockLlm::start_with_replies(["pong"]).await.unwrap();
    let stack = TestStack::start(ConfigBuilder::new().with_openai_provider("mock", &mock.base_url()).build()).unwrap();

    let response = stack.router().invoke(ping(), &GenerationContext::new()).await.unwrap();

    assert_eq!(response.text(), "pong");
    assert_eq!(mock.prompts(), ["ping"]);
}

#[tokio::test]
async fn anthropic_provider_completes_through_router() {
    let mock = MockLlm::start_with_replies(["pong"]).await.unwrap();
    let stack = TestStack::start(
        ConfigBuilder::new()
            .with_anthropic_provider("anthropic", &mock.base_url())
            .build(),
    )
    .unwrap();

    let response = stack.router().invoke(ping(), &GenerationContext::new()).await.unwrap();

    assert_eq!(response.text(), "pong");
    assert_eq!(mock.completion_count(), 1);
}

#[tokio::test]
async fn every_call_lands_in_usage_log() {
    let mock = MockLlm::start_failing(1).await.unwrap();
    let stack = TestStack::start(ConfigBuilder::new().with_openai_provider("mock", &mock.base_url()).build()).unwrap();
    let context = GenerationContext::new();

    let failed = stack.router().invoke(ping(), &context).await;
    assert!(matches!(failed, Err(LlmError::Upstream(_))));
    stack.router().invoke(ping(), &context).await.unwrap();

    let entries = stack.usage_log().entries("mock").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(!entries[0].success);
    assert!(entries[0].error.as_deref().unwrap().contains("500"));
    assert!(entries[1].success);
    assert_eq!(entries[1].model, "mock-model-1");
    assert!(stack.usage_log().path_for("mock").starts_with(stack.log_dir()));
    assert!(stack.usage_log().path_for("mock").exists());

    let stats = stack.router().all_provider_stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_requests, 2);
    assert_eq!(stats[0].successful_requests, 1);
    assert_eq!(stats[0].failed_requests, 1);

    let tail = stack.router().provider_logs("mock", 1).await.unwrap();
    assert_eq!(tail.len(), 1);
    assert!(tail[0].success);
}

#[tokio::test]
async fn keyless_providers_are_not_registered() {
    let mock = MockLlm::start().await.unwrap();
    let stack = TestStack::start(
        ConfigBuilder::new()
            .with_keyless_provider("openai")
            .with_openai_provider("mock", &mock.base_url())
            .with_default_provider("openai")
            .build(),
    )
    .unwrap();

    let listing = stack.router().list_providers().await;

    assert_eq!(listing.available.len(), 1);
    assert_eq!(listing.available[0].name, "mock");
    assert_eq!(listing.current.as_deref(), Some("mock"));
}

#[tokio::test]
async fn switching_routes_calls_to_the_new_provider() {
    let primary = MockLlm::start().await.unwrap();
    let backup = MockLlm::start_with_replies(["backup response"]).await.unwrap();
    let stack = TestStack::start(
        ConfigBuilder::new()
            .with_openai_provider("primary", &primary.base_url())
            .with_openai_provider("backup", &backup.base_url())
            .build(),
    )
    .unwrap();

    let switch = stack.router().switch_provider("backup").await.unwrap();
    assert_eq!(switch.old.as_deref(), Some("primary"));
    assert_eq!(switch.new, "backup");

    let response = stack.router().invoke(ping(), &GenerationContext::new()).await.unwrap();
    assert_eq!(response.text(), "backup response");
    assert_eq!(primary.completion_count(), 0);
    assert_eq!(backup.completion_count(), 1);

    let err = stack.router().switch_provider("grok").await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidProviderName { .. }));
    assert_eq!(stack.router().current_provider_info().await.name, "backup");
}

#[tokio::test]
async fn health_check_reports_latency() {
    let mock = MockLlm::start().await.unwrap();
    let stack = TestStack::start(ConfigBuilder::new().with_openai_provider("mock", &mock.base_url()).build()).unwrap();

    let report = stack.router().health_check().await;

    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.provider.as_deref(), Some("mock"));
    assert_eq!(report.model.as_deref(), Some("mock-model-1"));
    assert!(report.latency_ms.is_some());
    assert_eq!(mock.prompts(), ["Hello"]);
}

#[tokio::test]
async fn health_check_reports_upstream_failure() {
    let mock = MockLlm::start_failing(u32::MAX).await.unwrap();
    let stack = TestStack::start(ConfigBuilder::new().with_openai_provider("mock", &mock.base_url()).build()).unwrap();

    let report = stack.router().health_check().await;

    assert_eq!(report.status, HealthStatus::Error);
    assert!(report.error.is_some());
}

#[tokio::test]
async fn empty_router_is_unavailable() {
    let stack = TestStack::start(ConfigBuilder::new().with_keyless_provider("openai").build()).unwrap();

    assert!(stack.router().is_empty());
    assert_eq!(stack.router().current_provider_info().await.name, "none");

    let report = stack.router().health_check().await;
    assert_eq!(report.status, HealthStatus::Error);
    assert_eq!(report.error.as_deref(), Some("No provider available"));

    let err = stack.router().invoke(ping(), &GenerationContext::new()).await.unwrap_err();
    assert!(matches!(err, LlmError::ProviderUnavailable));
}
