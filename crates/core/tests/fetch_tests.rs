use citywatch_core::{ApiBase, ApiClient, ApiError, Role, Session, Sessions, User};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, sessions: Sessions) -> ApiClient {
    ApiClient::new(
        ApiBase::parse(&server.uri()).unwrap(),
        reqwest::Client::new(),
        sessions,
    )
}

#[tokio::test]
async fn test_bearer_token_attached_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(query_param("limit", "50"))
        .and(header("Authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "notifications": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = Sessions::in_memory();
    sessions
        .save(&Session::new(
            "stored-token",
            User {
                role: Role::User,
                ..User::default()
            },
        ))
        .unwrap();

    let client = client_for(&server, sessions);
    let response = client
        .get("/api/notifications")
        .unwrap()
        .query("limit", 50)
        .execute()
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data, Some(json!({ "notifications": [] })));
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Sessions::in_memory());
    client
        .post("/api/auth/login")
        .unwrap()
        .json(&json!({ "email": "a@b.co", "password": "secret" }))
        .unwrap()
        .execute()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0]
        .headers
        .keys()
        .any(|name| name.as_str().eq_ignore_ascii_case("authorization")));
}

#[tokio::test]
async fn test_failure_status_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already in use" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Sessions::in_memory());
    let err = client
        .post("/api/auth/signup")
        .unwrap()
        .execute()
        .await
        .unwrap_err();

    match err {
        ApiError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 409);
            assert_eq!(message.as_deref(), Some("Email already in use"));
        }
        other => panic!("Expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Sessions::in_memory());
    let response = client
        .get("/api/admin/notifications")
        .unwrap()
        .send()
        .await
        .unwrap();

    assert_eq!(response.status, 500);
    assert!(response.data.is_none());
    assert_eq!(response.text, "<html>Bad Gateway</html>");

    let err = response.error_for_status().unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Nothing listens on port 9 of the loopback interface
    let client = ApiClient::new(
        ApiBase::parse("http://127.0.0.1:9").unwrap(),
        reqwest::Client::new(),
        Sessions::in_memory(),
    );

    let err = client
        .get("/api/notifications")
        .unwrap()
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(err.status().is_none());
}
