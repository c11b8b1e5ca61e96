//! Smoke tests against a running server.
//!
//! These tests require:
//! - The web server running (cargo run -p sales-pulse-web)
//! - Optionally a migrated `PostgreSQL` database (cargo run -p sales-pulse-cli -- migrate)
//!
//! Run with: cargo test -p sales-pulse-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Base URL of the server (configurable via environment).
fn base_url() -> String {
    std::env::var("PULSE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that keeps the session cookie between requests.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_wizard_page_renders() {
    let resp = client()
        .get(base_url())
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Sales Weekly Pulse"));
    assert!(body.contains("Commencer l'audit"));
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_rep_lifecycle() {
    let client = client();
    let base_url = base_url();
    let name = format!("Smoke {}", std::process::id());

    let resp = client
        .post(format!("{base_url}/reps"))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to create rep");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let reps: Value = client
        .get(format!("{base_url}/api/reps"))
        .send()
        .await
        .expect("Failed to list reps")
        .json()
        .await
        .expect("Invalid JSON");
    let id = reps["items"]
        .as_array()
        .expect("items array")
        .iter()
        .find(|rep| rep["name"] == name.as_str())
        .and_then(|rep| rep["id"].as_str())
        .expect("created rep listed")
        .to_string();

    let resp = client
        .post(format!("{base_url}/reps/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete rep");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_dashboard_renders() {
    let resp = client()
        .get(format!("{}/dashboard", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Tableau de Bord"));
}
