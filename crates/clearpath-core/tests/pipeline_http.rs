//! Full pipeline built from configuration, with both upstreams mocked.

use clearpath_core::{
    ClearPathConfig, ClearPathError, PipelineResult, RiskLevel, RiskPipeline, VehicleIdentifier,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(registry: &MockServer, gemini: &MockServer) -> ClearPathConfig {
    let registry_url = format!("{}/recalls/recallsByVehicle", registry.uri());
    let gemini_url = gemini.uri();
    ClearPathConfig::from_lookup(|key| match key {
        "CLEARPATH_REGISTRY_URL" => Some(registry_url.clone()),
        "CLEARPATH_GEMINI_URL" => Some(gemini_url.clone()),
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_recalls_found_over_http() {
    let registry = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recalls/recallsByVehicle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"Component": "AIRBAG", "Summary": "Airbag may deploy with excess force."}]
        })))
        .expect(1)
        .mount(&registry)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "VERDICT: RED\nSUMMARY: Airbag force risk."}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let pipeline = RiskPipeline::from_config(&config_for(&registry, &gemini)).unwrap();
    let result = pipeline
        .run(&VehicleIdentifier::new("2018", "Tesla", "Model 3"))
        .await
        .unwrap();

    let verdict = result.verdict().unwrap();
    assert_eq!(verdict.level, RiskLevel::Red);
    assert_eq!(verdict.summary, "Airbag force risk.");
    assert_eq!(result.records()[0].component, "AIRBAG");

    let requests = gemini.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("- AIRBAG: Airbag may deploy with excess force."));
}

#[tokio::test]
async fn test_no_recalls_over_http_never_calls_gemini() {
    let registry = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Count": 0, "results": []})))
        .mount(&registry)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&gemini)
        .await;

    let pipeline = RiskPipeline::from_config(&config_for(&registry, &gemini)).unwrap();
    let result = pipeline
        .run(&VehicleIdentifier::new("2018", "Tesla", "Model 3"))
        .await
        .unwrap();

    assert_eq!(result, PipelineResult::NoRecalls);
}

#[test]
fn test_missing_api_key_fails_at_construction() {
    let config = ClearPathConfig::from_lookup(|_| None).unwrap();
    let err = RiskPipeline::from_config(&config).err().unwrap();
    assert!(matches!(err, ClearPathError::Config(_)));
}
