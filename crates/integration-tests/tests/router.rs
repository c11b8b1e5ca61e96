//! Router tests: the full application driven in-process.
//!
//! Requests go through every middleware layer (sessions included), with the
//! session cookie carried from one request to the next.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use std::sync::Arc;

use serde_json::Value;
use tower::ServiceExt;

use sales_pulse_integration_tests::{FaultyStore, Op, state_with, test_config};
use sales_pulse_web::db::MemoryPulseStore;
use sales_pulse_web::state::AppState;

/// Minimal browser: one router, one cookie jar entry.
struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    fn memory() -> Self {
        Self::new(sales_pulse_web::app(state_with(MemoryPulseStore::new())))
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }
        response
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn get(&mut self, uri: &str) -> Response {
        let request = self
            .request("GET", uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(fields).expect("encodable form");
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    async fn get_text(&mut self, uri: &str) -> String {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_text(response).await
    }

    async fn get_json(&mut self, uri: &str) -> Value {
        let text = self.get_text(uri).await;
        serde_json::from_str(&text).expect("JSON body")
    }
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

fn assert_redirect_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

fn rep_id(reps: &Value, name: &str) -> String {
    reps["items"]
        .as_array()
        .expect("items array")
        .iter()
        .find(|rep| rep["name"] == name)
        .and_then(|rep| rep["id"].as_str())
        .expect("rep listed")
        .to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let mut browser = Browser::memory();
    assert_eq!(browser.get_text("/health").await, "ok");
    assert_eq!(browser.get("/health/ready").await.status(), StatusCode::OK);

    let mut down = Browser::new(sales_pulse_web::app(state_with(FaultyStore::down())));
    assert_eq!(down.get("/health").await.status(), StatusCode::OK);
    assert_eq!(
        down.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_security_headers() {
    let mut browser = Browser::memory();
    let response = browser.get("/").await;
    let headers = response.headers();

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let mut browser = Browser::memory();
    let response = browser.get("/static/pulse.css").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Wizard
// ============================================================================

#[tokio::test]
async fn test_first_visit_lists_default_reps() {
    let mut browser = Browser::memory();
    let page = browser.get_text("/").await;

    assert!(page.contains("Qui auditez-vous cette semaine ?"));
    assert!(page.contains("Commencer l'audit"));
    assert!(page.contains("Thomas"));
    assert!(page.contains("Julie"));
    assert!(browser.cookie.is_some());
}

#[tokio::test]
async fn test_full_wizard_flow() {
    let mut browser = Browser::memory();
    browser.get_text("/").await;
    let reps = browser.get_json("/api/reps").await;
    let thomas = rep_id(&reps, "Thomas");

    let response = browser
        .post_form(
            "/wizard/next",
            &[
                ("manager_email", "manager@corp.com"),
                ("sales_rep_id", thomas.as_str()),
            ],
        )
        .await;
    assert_redirect_home(&response);
    assert!(
        browser
            .get_text("/")
            .await
            .contains("Mesurez l'intensité d'activité de Thomas")
    );

    let response = browser
        .post_form(
            "/wizard/next",
            &[
                ("prospecting_actions", "30"),
                ("discovery_meetings", "0"),
                ("proposals_sent", "0"),
                ("signed_proposals", ""),
                ("revenue", ""),
            ],
        )
        .await;
    assert_redirect_home(&response);
    assert!(browser.get_text("/").await.contains("Test Flash"));

    let response = browser
        .post_form("/wizard/next", &[("flash_test_response", "Trop court")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("10 caractères"));

    let response = browser
        .post_form(
            "/wizard/next",
            &[
                ("flash_test_response", "Je comprends, regardons le retour sur investissement"),
                ("flash_test_passed", "on"),
            ],
        )
        .await;
    assert_redirect_home(&response);

    let response = browser
        .post_form(
            "/wizard/next",
            &[("recognition_note", "Excellent closing sur le dossier XYZ")],
        )
        .await;
    assert_redirect_home(&response);

    let results = browser.get_text("/").await;
    assert!(results.contains("Performance de Thomas"));
    assert!(results.contains("70 <small>/ 100</small>"));
    assert!(results.contains("Nouvel audit"));
    assert!(!results.contains("Réserver un Audit Stratégique"));

    let dashboard = browser.get_text("/dashboard").await;
    assert!(dashboard.contains("Thomas"));
    assert!(dashboard.contains("manager@corp.com"));
    assert!(!dashboard.contains("Aucun audit trouvé"));

    let audits = browser.get_json("/api/audits/recent").await;
    assert_eq!(audits["degraded"], false);
    assert_eq!(audits["items"][0]["total_score"], 70);

    let response = browser.post_form("/wizard/reset", &[]).await;
    assert_redirect_home(&response);
    assert!(browser.get_text("/").await.contains("Commencer l'audit"));
}

#[tokio::test]
async fn test_identification_requires_valid_email() {
    let mut browser = Browser::memory();
    browser.get_text("/").await;
    let thomas = rep_id(&browser.get_json("/api/reps").await, "Thomas");

    let response = browser
        .post_form(
            "/wizard/next",
            &[("manager_email", "nope"), ("sales_rep_id", thomas.as_str())],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("email valide"));
}

#[tokio::test]
async fn test_rejected_identification_loads_reps_once() {
    let store = Arc::new(FaultyStore::new());
    let state = AppState::new(test_config(), store.clone());
    let mut browser = Browser::new(sales_pulse_web::app(state));
    browser.get_text("/").await;
    let before = store.calls(Op::ListReps);

    let response = browser
        .post_form("/wizard/next", &[("manager_email", "nope")])
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Thomas"));
    assert_eq!(store.calls(Op::ListReps), before + 1);
}

#[tokio::test]
async fn test_back_keeps_entered_values() {
    let mut browser = Browser::memory();
    browser.get_text("/").await;
    let julie = rep_id(&browser.get_json("/api/reps").await, "Julie");

    browser
        .post_form(
            "/wizard/next",
            &[
                ("manager_email", "boss@corp.com"),
                ("sales_rep_id", julie.as_str()),
            ],
        )
        .await;
    let response = browser
        .post_form("/wizard/back", &[("prospecting_actions", "12")])
        .await;
    assert_redirect_home(&response);

    let page = browser.get_text("/").await;
    assert!(page.contains("value=\"boss@corp.com\""));

    browser
        .post_form(
            "/wizard/next",
            &[
                ("manager_email", "boss@corp.com"),
                ("sales_rep_id", julie.as_str()),
            ],
        )
        .await;
    assert!(browser.get_text("/").await.contains("value=\"12\""));
}

// ============================================================================
// Reps
// ============================================================================

#[tokio::test]
async fn test_add_and_delete_rep() {
    let mut browser = Browser::memory();
    browser.get_text("/").await;

    let response = browser
        .post_form("/reps", &[("name", "  Camille "), ("email", "")])
        .await;
    assert_redirect_home(&response);

    let reps = browser.get_json("/api/reps").await;
    let camille = rep_id(&reps, "Camille");
    assert_eq!(reps["items"].as_array().map(Vec::len), Some(3));

    let response = browser
        .post_form(&format!("/reps/{camille}/delete"), &[])
        .await;
    assert_redirect_home(&response);

    let reps = browser.get_json("/api/reps").await;
    assert_eq!(reps["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_blank_rep_name_is_rejected() {
    let mut browser = Browser::memory();
    let response = browser.post_form("/reps", &[("name", "   ")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_rep_is_not_found() {
    let mut browser = Browser::memory();
    let response = browser
        .post_form(
            "/reps/00000000-0000-4000-8000-000000000000/delete",
            &[],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Degraded mode
// ============================================================================

#[tokio::test]
async fn test_pages_work_with_store_down() {
    let mut browser = Browser::new(sales_pulse_web::app(state_with(FaultyStore::down())));

    let page = browser.get_text("/").await;
    assert!(page.contains("Base de données indisponible"));
    assert!(page.contains("Thomas"));

    let dashboard = browser.get_text("/dashboard").await;
    assert!(dashboard.contains("Aucun audit trouvé"));
    assert!(dashboard.contains("Base de données indisponible"));

    let reps = browser.get_json("/api/reps").await;
    assert_eq!(reps["degraded"], true);
    assert!(reps["reason"].is_string());
}

#[tokio::test]
async fn test_audit_submitted_while_down_shows_on_dashboard() {
    let mut browser = Browser::new(sales_pulse_web::app(state_with(FaultyStore::down())));
    browser.get_text("/").await;
    let thomas = rep_id(&browser.get_json("/api/reps").await, "Thomas");

    for fields in [
        vec![
            ("manager_email", "manager@corp.com"),
            ("sales_rep_id", thomas.as_str()),
        ],
        vec![
            ("prospecting_actions", "30"),
            ("discovery_meetings", "0"),
            ("proposals_sent", "0"),
        ],
        vec![("flash_test_response", "Une réponse suffisamment longue")],
        vec![("recognition_note", "Belle semaine de prospection")],
    ] {
        let response = browser.post_form("/wizard/next", &fields).await;
        assert_redirect_home(&response);
    }

    let results = browser.get_text("/").await;
    assert!(results.contains("Performance de Thomas"));
    assert!(results.contains("conservé localement"));

    let audits = browser.get_json("/api/audits/recent").await;
    assert_eq!(audits["degraded"], true);
    assert_eq!(audits["items"][0]["sales_rep_name"], "Thomas");
    assert_eq!(audits["items"][0]["total_score"], 40);
}
