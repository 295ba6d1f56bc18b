//! Health endpoint integration tests.

mod common;

use common::{test_config, ProbeBehavior, TestApp};

#[tokio::test]
async fn basic_status_reports_ok_with_monotonic_uptime() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let first: serde_json::Value = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first["status"], "ok");
    assert_eq!(first["environment"], "development");
    assert!(first["timestamp"].is_string());

    let first_uptime = first["uptimeSeconds"].as_u64().expect("uptime missing");

    let second: serde_json::Value = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    let second_uptime = second["uptimeSeconds"].as_u64().expect("uptime missing");
    assert!(second_uptime >= first_uptime);
}

#[tokio::test]
async fn app_identity_is_static() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health/app", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "PetStore Monolith");
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn database_status_reports_resolved_tables_when_healthy() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health/database", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "DynamoDB");
    assert_eq!(body["region"], "us-east-1");
    assert_eq!(body["endpoint"], "AWS");
    assert_eq!(body["tables"]["franchise"], "petstoreFranchise");
    assert_eq!(body["tables"]["tenants"], "petstoreTenants");
}

#[tokio::test]
async fn database_status_appends_environment_suffix_to_tables() {
    let mut config = test_config();
    config.datastore.table_suffix = Some("staging".to_string());
    let app = TestApp::spawn_with(ProbeBehavior::Healthy, config).await;

    let body: serde_json::Value = app
        .client()
        .get(format!("{}/health/database", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["tables"]["franchise"], "petstoreFranchise-staging");
    assert_eq!(body["tables"]["tenants"], "petstoreTenants-staging");
}

#[tokio::test]
async fn database_status_reports_error_when_probe_says_unhealthy() {
    let app = TestApp::spawn_with(ProbeBehavior::Unhealthy, test_config()).await;

    let response = app
        .client()
        .get(format!("{}/health/database", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Probe results are advisory: still HTTP 200, the body carries the error.
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"], "DynamoDB");
    assert_eq!(body["error"], "Database is not responding");
}

#[tokio::test]
async fn database_status_surfaces_probe_failure_message() {
    let app = TestApp::spawn_with(ProbeBehavior::Fails("timeout"), test_config()).await;

    let response = app
        .client()
        .get(format!("{}/health/database", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "timeout");
}

#[tokio::test]
async fn memory_status_reports_consistent_counters() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health/memory", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");

    let memory = &body["memory"];
    let rss = memory["rss"].as_u64().expect("rss missing");
    let heap_total = memory["heapTotal"].as_u64().expect("heapTotal missing");
    let heap_used = memory["heapUsed"].as_u64().expect("heapUsed missing");
    let external = memory["external"].as_u64().expect("external missing");

    // A running process occupies at least some resident memory.
    assert!(rss > 0);
    assert!(heap_used <= heap_total);
    assert!(external <= heap_total);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.headers().contains_key("x-request-id"));

    // Caller-supplied ids are echoed back.
    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        &"req-42".parse::<reqwest::header::HeaderValue>().unwrap()
    );
}
