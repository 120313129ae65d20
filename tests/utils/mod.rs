#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use mid_client::config::{Config, ConnectorConfig};
use mid_client::telemetry;
use serde_json::{Value, json};
use uuid::Uuid;

pub const DEMO_RP_UUID: &str = "00000000-0000-0000-0000-000000000002";
pub const DEMO_RP_NAME: &str = "DEMO";
pub const UNKNOWN_RP_UUID: &str = "96be3df7-4c2a-4366-a0ce-62dfb93c6cf2";

pub const VALID_PHONE: &str = "+37260000007";
pub const VALID_NIN: &str = "60001019906";
/// Reserved test number the service always rejects as malformed.
pub const WRONG_PHONE: &str = "+37200000766";

struct SessionRecord {
    operation: String,
    /// RUNNING responses still to serve before COMPLETE.
    remaining: u32,
}

pub struct MockState {
    running_polls: u32,
    sessions: DashMap<String, SessionRecord>,
    status_requests: DashMap<String, u32>,
}

/// In-process stand-in for the Mobile-ID REST service.
pub struct MockServer {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    /// Number of status requests seen for one session identifier,
    /// including requests answered with 404.
    pub fn status_requests(&self, session_id: &str) -> u32 {
        self.state
            .status_requests
            .get(session_id)
            .map(|c| *c)
            .unwrap_or(0)
    }
}

/// Spawns the mock server on a random port. Each created session serves
/// `running_polls` RUNNING responses before turning COMPLETE, and is
/// forgotten once its COMPLETE status has been delivered.
pub async fn spawn_mock_server(running_polls: u32) -> MockServer {
    telemetry::init_tracing();

    let state = Arc::new(MockState {
        running_polls,
        sessions: DashMap::new(),
        status_requests: DashMap::new(),
    });

    let app = Router::new()
        .route("/certificate", post(start_certificate))
        .route("/authentication", post(start_authentication))
        .route("/signature", post(start_signature))
        .route("/{operation}/session/{session_id}", get(session_status))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server died");
    });

    MockServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Connector configuration pointing at the mock server, built through
/// the regular configuration loader.
pub fn test_config(base_url: &str, poll_interval_ms: u64, poll_timeout_ms: u64) -> ConnectorConfig {
    let mut env_vars = HashMap::new();
    env_vars.insert("connector.base_url".to_string(), base_url.to_string());
    env_vars.insert(
        "connector.relying_party_uuid".to_string(),
        DEMO_RP_UUID.to_string(),
    );
    env_vars.insert(
        "connector.relying_party_name".to_string(),
        DEMO_RP_NAME.to_string(),
    );
    env_vars.insert(
        "connector.poll_interval_ms".to_string(),
        poll_interval_ms.to_string(),
    );
    env_vars.insert(
        "connector.poll_timeout_ms".to_string(),
        poll_timeout_ms.to_string(),
    );
    Config::load_with_sources(Some(env_vars))
        .expect("Failed to load config")
        .connector
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn check_relying_party(body: &Value) -> Option<Response> {
    let uuid = body["relyingPartyUUID"].as_str().unwrap_or_default();
    let name = body["relyingPartyName"].as_str().unwrap_or_default();
    if uuid != DEMO_RP_UUID || name != DEMO_RP_NAME {
        return Some(error_body(
            StatusCode::UNAUTHORIZED,
            "Failed to authorize user",
        ));
    }
    None
}

fn check_identity_fields(body: &Value) -> Option<Response> {
    let phone = body["phoneNumber"].as_str().unwrap_or_default();
    if phone == WRONG_PHONE || !phone.starts_with('+') || phone.len() < 8 {
        return Some(error_body(
            StatusCode::BAD_REQUEST,
            "phoneNumber must contain of + and numbers(8-30)",
        ));
    }
    let nin = body["nationalIdentityNumber"].as_str().unwrap_or_default();
    if nin.len() != 11 || !nin.chars().all(|c| c.is_ascii_digit()) {
        return Some(error_body(
            StatusCode::BAD_REQUEST,
            "nationalIdentityNumber must contain of 11 digits",
        ));
    }
    None
}

fn start_session(state: &MockState, operation: &str, body: &Value) -> Response {
    if let Some(rejection) = check_relying_party(body) {
        return rejection;
    }
    if let Some(rejection) = check_identity_fields(body) {
        return rejection;
    }

    let session_id = Uuid::new_v4().to_string();
    state.sessions.insert(
        session_id.clone(),
        SessionRecord {
            operation: operation.to_string(),
            remaining: state.running_polls,
        },
    );
    (StatusCode::OK, Json(json!({ "sessionID": session_id }))).into_response()
}

async fn start_certificate(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    start_session(&state, "certificate", &body)
}

async fn start_authentication(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    start_session(&state, "authentication", &body)
}

async fn start_signature(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    start_session(&state, "signature", &body)
}

fn complete_body(operation: &str) -> Value {
    match operation {
        "certificate" => json!({
            "state": "COMPLETE",
            "result": "OK",
            "cert": "bW9jay1jZXJ0aWZpY2F0ZQ==",
            "time": "2026-08-30T11:30:00",
        }),
        "authentication" => json!({
            "state": "COMPLETE",
            "result": "OK",
            "signature": {
                "value": "c2lnbmF0dXJlLXZhbHVl",
                "algorithm": "SHA256WithECEncryption",
            },
            "cert": "bW9jay1jZXJ0aWZpY2F0ZQ==",
            "time": "2026-08-30T11:30:00",
        }),
        _ => json!({
            "state": "COMPLETE",
            "result": "OK",
            "signature": {
                "value": "c2lnbmF0dXJlLXZhbHVl",
                "algorithm": "SHA256WithECEncryption",
            },
            "time": "2026-08-30T11:30:00",
        }),
    }
}

async fn session_status(
    State(state): State<Arc<MockState>>,
    Path((operation, session_id)): Path<(String, String)>,
) -> Response {
    *state.status_requests.entry(session_id.clone()).or_insert(0) += 1;

    let Some(mut record) = state.sessions.get_mut(&session_id) else {
        return error_body(StatusCode::NOT_FOUND, "Session does not exist");
    };
    if record.operation != operation {
        return error_body(StatusCode::NOT_FOUND, "Session does not exist");
    }

    if record.remaining > 0 {
        record.remaining -= 1;
        return (StatusCode::OK, Json(json!({ "state": "RUNNING" }))).into_response();
    }

    let body = complete_body(&operation);
    drop(record);
    // A delivered COMPLETE status consumes the session.
    state.sessions.remove(&session_id);
    (StatusCode::OK, Json(body)).into_response()
}
