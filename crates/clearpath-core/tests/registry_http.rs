//! Recall registry client against a mock HTTP server.

use std::time::Duration;

use clearpath_core::{ClearPathError, RecallClient, RecallFetcher, RegistryConfig, VehicleIdentifier};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECALLS_PATH: &str = "/recalls/recallsByVehicle";

fn client_for(server: &MockServer) -> RecallClient {
    let endpoint = format!("{}{}", server.uri(), RECALLS_PATH);
    RecallClient::new(RegistryConfig::new(&endpoint)).unwrap()
}

fn tesla() -> VehicleIdentifier {
    VehicleIdentifier::new("2018", "Tesla", "Model 3")
}

#[tokio::test]
async fn test_fetch_sends_vehicle_query_and_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECALLS_PATH))
        .and(query_param("make", "Tesla"))
        .and(query_param("model", "Model 3"))
        .and(query_param("modelYear", "2018"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Count": 1,
            "Message": "Results returned successfully",
            "results": [{
                "Manufacturer": "Tesla, Inc.",
                "NHTSACampaignNumber": "20V001000",
                "ReportReceivedDate": "07/01/2020",
                "Component": "AIR BAGS",
                "Summary": "The airbag may deploy with excess force.",
                "Consequence": "Increased risk of injury.",
                "parkIt": false
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server).fetch(&tesla()).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.component, "AIR BAGS");
    assert_eq!(record.action_number, "20V001000");
    assert_eq!(record.report_date, "07/01/2020");
    assert_eq!(record.extra["Consequence"], json!("Increased risk of injury."));
    assert_eq!(record.extra["parkIt"], json!(false));
}

#[tokio::test]
async fn test_special_characters_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECALLS_PATH))
        .and(query_param("make", "Mercedes-Benz"))
        .and(query_param("model", "C300 & AMG"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let vehicle = VehicleIdentifier::new("2020", "Mercedes-Benz", "C300 & AMG");
    let records = client_for(&server).fetch(&vehicle).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_missing_results_key_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Count": 0})))
        .mount(&server)
        .await;

    let records = client_for(&server).fetch(&tesla()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_non_2xx_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&tesla()).await.unwrap_err();
    assert!(matches!(err, ClearPathError::RegistryUnavailable(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&tesla()).await.unwrap_err();
    assert!(matches!(err, ClearPathError::RegistryMalformedResponse(_)));
}

#[tokio::test]
async fn test_results_of_non_objects_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": ["AIR BAGS", "STEERING"]})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&tesla()).await.unwrap_err();
    assert!(matches!(err, ClearPathError::RegistryMalformedResponse(msg) if msg.contains("results[0]")));
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), RECALLS_PATH);
    let client = RecallClient::new(
        RegistryConfig::new(&endpoint).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client.fetch(&tesla()).await.unwrap_err();
    assert!(matches!(err, ClearPathError::RegistryUnavailable(msg) if msg.contains("timed out")));
}

#[tokio::test]
async fn test_unreachable_registry_is_unavailable() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = RecallClient::new(
        RegistryConfig::new("http://127.0.0.1:9/recalls").with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = client.fetch(&tesla()).await.unwrap_err();
    assert!(matches!(err, ClearPathError::RegistryUnavailable(_)));
}
