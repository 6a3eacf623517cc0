//! In-process stand-in for the rewards admin API, used by client and hook tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

pub const CREATED_AT: &str = "2025-03-01T10:00:00Z";
pub const UPDATED_AT: &str = "2025-03-02T18:30:00Z";

/// One request as the mock saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    rules: Vec<Value>,
    timer: Value,
    requests: Vec<RecordedRequest>,
    next_id: u32,
    fail_with: Option<u16>,
    list_delay: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct MockRewardsApi {
    state: Arc<Mutex<MockState>>,
}

impl MockRewardsApi {
    pub fn with_rules(rules: Vec<Value>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().rules = rules;
        mock
    }

    pub fn set_timer(&self, timer: Value) {
        self.state.lock().unwrap().timer = timer;
    }

    /// Every subsequent request answers with this status
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_with = Some(status);
    }

    pub fn clear_failure(&self) {
        self.state.lock().unwrap().fail_with = None;
    }

    /// Delay the rule list response; the list is captured before sleeping
    pub fn delay_list(&self, delay: Duration) {
        self.state.lock().unwrap().list_delay = Some(delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn rules(&self) -> Vec<Value> {
        self.state.lock().unwrap().rules.clone()
    }

    /// Serve on an ephemeral localhost port and return the base URL
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route(
                "/api/admin/game-offers/display-rules",
                get(list_rules).post(create_rule),
            )
            .route(
                "/api/admin/game-offers/display-rules/:id",
                put(update_rule).delete(delete_rule),
            )
            .route(
                "/api/admin/game-offers/welcome-bonus-timer",
                get(get_timer).put(update_timer),
            )
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn record(&self, method: &str, path: String, headers: &HeaderMap, body: Value) -> Option<Response> {
        let header_value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            path,
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            body,
        });

        state.fail_with.map(|status| {
            let status = StatusCode::from_u16(status).unwrap();
            (status, "mock failure").into_response()
        })
    }
}

async fn list_rules(State(mock): State<MockRewardsApi>, headers: HeaderMap) -> Response {
    if let Some(failure) = mock.record("GET", "/display-rules".into(), &headers, Value::Null) {
        return failure;
    }
    let (rules, delay) = {
        let state = mock.state.lock().unwrap();
        (state.rules.clone(), state.list_delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(Value::Array(rules)).into_response()
}

async fn create_rule(
    State(mock): State<MockRewardsApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = mock.record("POST", "/display-rules".into(), &headers, body.clone()) {
        return failure;
    }
    let mut state = mock.state.lock().unwrap();
    state.next_id += 1;

    let mut rule = body;
    rule["_id"] = json!(format!("rule-{}", state.next_id));
    rule["createdAt"] = json!(CREATED_AT);
    rule["updatedAt"] = json!(CREATED_AT);
    rule["createdBy"] = json!("admin@example.com");
    state.rules.push(rule.clone());

    (StatusCode::CREATED, Json(rule)).into_response()
}

async fn update_rule(
    State(mock): State<MockRewardsApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = mock.record("PUT", format!("/display-rules/{id}"), &headers, body.clone()) {
        return failure;
    }
    let mut state = mock.state.lock().unwrap();
    let Some(rule) = state.rules.iter_mut().find(|rule| rule["_id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, "Rule not found").into_response();
    };

    if let (Some(target), Value::Object(patch)) = (rule.as_object_mut(), body) {
        for (key, value) in patch {
            if key == "metadata" {
                if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                    (target.get_mut("metadata"), &value)
                {
                    existing.extend(incoming.clone());
                    continue;
                }
            }
            target.insert(key, value);
        }
        target.insert("updatedAt".into(), json!(UPDATED_AT));
    }

    Json(rule.clone()).into_response()
}

async fn delete_rule(
    State(mock): State<MockRewardsApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(failure) = mock.record("DELETE", format!("/display-rules/{id}"), &headers, Value::Null) {
        return failure;
    }
    let mut state = mock.state.lock().unwrap();
    let before = state.rules.len();
    state.rules.retain(|rule| rule["_id"] != json!(id));
    if state.rules.len() == before {
        return (StatusCode::NOT_FOUND, "Rule not found").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn get_timer(State(mock): State<MockRewardsApi>, headers: HeaderMap) -> Response {
    if let Some(failure) = mock.record("GET", "/welcome-bonus-timer".into(), &headers, Value::Null) {
        return failure;
    }
    let timer = mock.state.lock().unwrap().timer.clone();
    Json(timer).into_response()
}

async fn update_timer(
    State(mock): State<MockRewardsApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = mock.record("PUT", "/welcome-bonus-timer".into(), &headers, body.clone()) {
        return failure;
    }
    let mut timer = body;
    timer["_id"] = json!("timer-1");
    timer["updatedAt"] = json!(UPDATED_AT);
    timer["updatedBy"] = json!("admin@example.com");
    mock.state.lock().unwrap().timer = timer.clone();
    Json(timer).into_response()
}
