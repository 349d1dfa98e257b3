//! Session handling around unauthorized responses, failures and login

use serde_json::json;
use shop_core::{
    KeyValueStore, LOGIN_PATH, MemoryStore, RecordingNavigator, Role, Session, SessionStore,
    StorageKeys,
};
use shop_http::client::error::ClientError;
use shop_http::types::Credentials;
use shop_http::{AuthService, ShopClient};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    storage: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
    session: Arc<SessionStore>,
}

impl Harness {
    fn new() -> Self {
        let storage = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(SessionStore::initialize(storage.clone(), navigator.clone()));
        Self {
            storage,
            navigator,
            session,
        }
    }

    fn logged_in() -> Self {
        let harness = Self::new();
        harness
            .session
            .login("stale-token", Role::Admin, "root")
            .unwrap();
        harness
    }

    fn client(&self, base_url: String) -> ShopClient {
        ShopClient::new(base_url, self.session.clone()).unwrap()
    }
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::logged_in();
    let client = harness.client(mock_server.uri());

    let result = client.get_cart().await;

    // The caller still sees the rejection
    assert!(matches!(result, Err(ClientError::Unauthorized(ref m)) if m == "Token expired"));

    assert_eq!(harness.session.snapshot(), Session::anonymous());
    for key in StorageKeys::ALL {
        assert_eq!(harness.storage.get(key).unwrap(), None);
    }
    assert_eq!(harness.navigator.visits(), vec![LOGIN_PATH]);
}

#[tokio::test]
async fn test_request_after_unauthorized_carries_no_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let harness = Harness::logged_in();
    let client = harness.client(mock_server.uri());

    assert!(client.list_orders().await.unwrap_err().is_unauthorized());
    client.list_products().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.contains_key("authorization"));
    assert!(!requests[1].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_concurrent_unauthorized_responses_each_clear() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let harness = Harness::logged_in();
    let client = harness.client(mock_server.uri());

    let (cart, orders) = tokio::join!(client.get_cart(), client.list_orders());
    assert!(cart.unwrap_err().is_unauthorized());
    assert!(orders.unwrap_err().is_unauthorized());

    assert!(!harness.session.is_logged_in());
    assert_eq!(harness.navigator.count(LOGIN_PATH), 2);
}

#[tokio::test]
async fn test_other_failures_leave_session_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let harness = Harness::logged_in();
    let client = harness.client(mock_server.uri());

    let err = client.list_orders().await.unwrap_err();
    assert!(matches!(err, ClientError::ServerError { status: 500, .. }));
    let err = client.admin_list_users().await.unwrap_err();
    assert_eq!(err.status(), Some(403));

    assert!(harness.session.is_logged_in());
    assert_eq!(harness.storage.len(), 3);
    assert!(harness.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_timeout_is_a_plain_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(
            ResponseTemplate::new(401).set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let harness = Harness::logged_in();
    let client = ShopClient::builder()
        .base_url(mock_server.uri())
        .session(harness.session.clone())
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = client.get_cart().await.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.status().is_none());

    assert!(harness.session.is_logged_in());
    assert!(harness.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_sign_in_records_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": { "token": "fresh", "role": "ADMIN", "user": { "id": 1, "username": "root" } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harness = Harness::new();
    let auth = AuthService::connect(mock_server.uri(), harness.session.clone()).unwrap();

    let session = auth
        .sign_in(&Credentials::new("root", "secret"))
        .await
        .unwrap();

    assert_eq!(session, Session::authenticated("fresh", Role::Admin, "root"));
    assert!(harness.session.is_admin());
    assert!(harness.session.is_root());
    assert_eq!(
        harness.storage.get(StorageKeys::TOKEN).unwrap().as_deref(),
        Some("fresh")
    );

    // A restarted process sees the same session
    let restarted = SessionStore::initialize(harness.storage.clone(), harness.navigator.clone());
    assert_eq!(restarted.snapshot(), session);

    auth.sign_out();
    assert!(!harness.session.is_logged_in());
    assert!(harness.storage.is_empty());
    assert_eq!(harness.navigator.count(LOGIN_PATH), 1);
}

#[tokio::test]
async fn test_sign_in_refused_by_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "message": "Wrong username or password",
            "data": null
        })))
        .mount(&mock_server)
        .await;

    let harness = Harness::new();
    let auth = AuthService::connect(mock_server.uri(), harness.session.clone()).unwrap();

    let err = auth
        .sign_in(&Credentials::new("root", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message("Login failed"), "Wrong username or password");
    assert!(!harness.session.is_logged_in());
    assert!(harness.storage.is_empty());
}

#[tokio::test]
async fn test_sign_in_with_malformed_grant_is_not_a_refusal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "success",
            "data": { "token": "fresh", "role": "OWNER" }
        })))
        .mount(&mock_server)
        .await;

    let harness = Harness::new();
    let auth = AuthService::connect(mock_server.uri(), harness.session.clone()).unwrap();

    let err = auth
        .sign_in(&Credentials::new("alice", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
    assert_ne!(err.user_message("Login failed"), "success");
    assert!(!harness.session.is_logged_in());
    assert!(harness.storage.is_empty());
}

#[tokio::test]
async fn test_sign_in_accepts_lowercase_role() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "success",
            "data": { "token": "fresh", "role": "admin" }
        })))
        .mount(&mock_server)
        .await;

    let harness = Harness::new();
    let auth = AuthService::connect(mock_server.uri(), harness.session.clone()).unwrap();

    let session = auth.sign_in(&Credentials::new("root", "pw")).await.unwrap();
    assert_eq!(session.role(), Some(Role::Admin));
    assert!(session.is_root());
}

#[tokio::test]
async fn test_sign_in_with_empty_token_is_a_validation_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "", "role": "USER" })),
        )
        .mount(&mock_server)
        .await;

    let harness = Harness::new();
    let auth = AuthService::connect(mock_server.uri(), harness.session.clone()).unwrap();

    let err = auth
        .sign_in(&Credentials::new("alice", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(!harness.session.is_logged_in());
}
