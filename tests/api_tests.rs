use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use lavajato_backend::config::{EnvironmentConfig, StoreBackend};
use lavajato_backend::models::auth::UserRole;
use lavajato_backend::repositories::MemoryOrderStore;
use lavajato_backend::routes::create_app_router;
use lavajato_backend::services::TransitionPolicy;
use lavajato_backend::state::AppState;
use lavajato_backend::utils::jwt::generate_token;

struct TestApp {
    router: Router,
    state: AppState,
    company_id: Uuid,
}

impl TestApp {
    fn new(policy: TransitionPolicy) -> Self {
        Self::with_config(EnvironmentConfig {
            order_store: StoreBackend::Memory,
            transition_policy: policy,
            ..EnvironmentConfig::default()
        })
    }

    fn with_config(config: EnvironmentConfig) -> Self {
        let state = AppState::new(Arc::new(MemoryOrderStore::new()), config);

        Self {
            router: create_app_router(state.clone()),
            state,
            company_id: Uuid::new_v4(),
        }
    }

    fn token(&self, role: UserRole) -> String {
        generate_token(Uuid::new_v4(), self.company_id, role, &self.state.jwt).unwrap()
    }

    async fn send(&self, method: &str, uri: &str, role: Option<UserRole>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(role)));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_order(&self) -> Value {
        let (status, body) = self
            .send("POST", "/api/orders", Some(UserRole::Attendant), Some(order_payload()))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"].clone()
    }
}

fn order_payload() -> Value {
    json!({
        "customer": { "name": "Maria Oliveira", "phone": "(11) 91234-5678" },
        "vehicle": { "plate": "BRA2E19", "model": "HB20", "color": "Branco" },
        "items": [
            { "service_name": "Lavagem simples", "price": 30.0 },
            { "service_name": "Aspiração", "price": 15.0 }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "ok");
    assert_eq!(body["transition_policy"], "sequential");
}

#[tokio::test]
async fn test_requires_token() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let (status, body) = app.send("GET", "/api/orders", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rejects_token_signed_with_other_secret() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let other = lavajato_backend::utils::jwt::JwtConfig {
        secret: "otro-secreto".to_string(),
        expiration: 3600,
    };
    let token = generate_token(Uuid::new_v4(), app.company_id, UserRole::Owner, &other).unwrap();

    let request = Request::builder()
        .uri("/api/orders")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_assigns_code_and_total() {
    let app = TestApp::new(TransitionPolicy::Sequential);

    let first = app.create_order().await;
    let second = app.create_order().await;

    assert_eq!(first["code"], 1);
    assert_eq!(second["code"], 2);
    assert_eq!(first["status"], "AWAITING");
    assert_eq!(first["version"], 1);
    assert_eq!(first["total"], 45.0);
    assert_eq!(first["vehicle"]["plate"], "BRA2E19");

    let (status, list) = app.send("GET", "/api/orders", Some(UserRole::Washer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_validation_error() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let mut payload = order_payload();
    payload["items"] = json!([]);

    let (status, body) = app
        .send("POST", "/api/orders", Some(UserRole::Owner), Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_washer_cannot_create() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let (status, body) = app
        .send("POST", "/api/orders", Some(UserRole::Washer), Some(order_payload()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_patch_status_returns_full_order() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Washer), Some(json!({ "status": "WASHING", "version": 1 })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WASHING");
    assert_eq!(body["version"], 2);
    assert_eq!(body["total"], order["total"]);
    assert_eq!(body["customer"], order["customer"]);
    assert_eq!(body["items"], order["items"]);

    let history_uri = format!("/api/orders/{}/history", order["id"].as_str().unwrap());
    let (status, history) = app.send("GET", &history_uri, Some(UserRole::Manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["data"]["events"][0]["from_status"], "AWAITING");
    assert_eq!(history["data"]["events"][0]["to_status"], "WASHING");
}

#[tokio::test]
async fn test_patch_status_without_version() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Attendant), Some(json!({ "status": "WASHING" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WASHING");
}

#[tokio::test]
async fn test_patch_unknown_status_is_bad_request() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "status": "CANCELLED" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "state": "WASHING" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_malformed_id_is_json_bad_request() {
    let app = TestApp::new(TransitionPolicy::Sequential);

    let (status, body) = app
        .send(
            "PATCH",
            "/api/orders/not-a-uuid/status",
            Some(UserRole::Owner),
            Some(json!({ "status": "WASHING" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "Bad Request");

    let (status, body) = app.send("GET", "/api/orders/123/history", Some(UserRole::Owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_rate_limit_buckets_per_peer() {
    let app = TestApp::with_config(EnvironmentConfig {
        order_store: StoreBackend::Memory,
        rate_limit_requests: 1,
        ..EnvironmentConfig::default()
    });

    let health_from = |peer: &str| {
        let addr: SocketAddr = peer.parse().unwrap();
        let mut request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    };

    let first = app.router.clone().oneshot(health_from("10.1.0.1:4000")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let other_peer = app.router.clone().oneshot(health_from("10.1.0.2:4000")).await.unwrap();
    assert_eq!(other_peer.status(), StatusCode::OK);

    let repeated = app.router.clone().oneshot(health_from("10.1.0.1:4001")).await.unwrap();
    assert_eq!(repeated.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_patch_missing_order_is_not_found() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let uri = format!("/api/orders/{}/status", Uuid::new_v4());

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "status": "WASHING" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_sequential_policy_rejects_skip() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "status": "READY" })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
    assert_eq!(body["details"]["from"], "AWAITING");
    assert_eq!(body["details"]["to"], "READY");
}

#[tokio::test]
async fn test_stale_version_conflicts() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let (status, _) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "status": "WASHING", "version": 1 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send("PATCH", &uri, Some(UserRole::Owner), Some(json!({ "status": "FINISHING", "version": 1 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "VERSION_CONFLICT");
    assert_eq!(body["details"]["current"], 2);
}

#[tokio::test]
async fn test_board_and_other_company_isolation() {
    let app = TestApp::new(TransitionPolicy::Forward);
    let order = app.create_order().await;
    app.create_order().await;
    let id = order["id"].as_str().unwrap();

    let (status, _) = app
        .send("PATCH", &format!("/api/orders/{}/status", id), Some(UserRole::Owner), Some(json!({ "status": "DELIVERED" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, board) = app.send("GET", "/api/orders/board", Some(UserRole::Washer), None).await;
    assert_eq!(status, StatusCode::OK);
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0]["status"], "AWAITING");
    assert_eq!(columns[0]["orders"].as_array().unwrap().len(), 1);
    assert!(columns.iter().all(|c| c["status"] != "DELIVERED"));

    let other = TestApp {
        router: app.router.clone(),
        state: app.state.clone(),
        company_id: Uuid::new_v4(),
    };
    let (status, _) = other.send("GET", &format!("/api/orders/{}", id), Some(UserRole::Owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_allowed_transitions() {
    let app = TestApp::new(TransitionPolicy::Sequential);
    let order = app.create_order().await;
    let uri = format!("/api/orders/{}/transitions", order["id"].as_str().unwrap());

    let (status, body) = app.send("GET", &uri, Some(UserRole::Washer), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "sequential");
    assert_eq!(body["from"], "AWAITING");
    assert_eq!(body["targets"], json!(["WASHING"]));
}
