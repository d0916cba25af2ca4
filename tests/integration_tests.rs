use std::time::Duration;

use citywatch_client::config::ClientOptions;
use citywatch_client::prelude::*;
use citywatch_core::LOCAL_FALLBACK;
use citywatch_reports::{NoPrompt, ReportError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CityWatch {
    CityWatch::new_with_options(ClientOptions::default().with_api_base(&server.uri())).unwrap()
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": format!("{}-token", role),
            "user": { "_id": "u1", "name": "Kim", "email": "kim@city.gov", "role": role }
        })))
        .mount(server)
        .await;
}

fn draft() -> ReportDraft {
    ReportDraft {
        description: "Sinkhole opening near the bus stop".to_string(),
        category: Some(Category::RoadAndTraffic),
        location: "Main Rd".to_string(),
        photo: Some(Attachment::new("hole.png", vec![0x89, 0x50]).with_mime("image/png")),
        ..ReportDraft::default()
    }
}

#[test]
fn test_api_base_resolution() {
    let local = CityWatch::new().unwrap();
    assert_eq!(local.api().base().as_str(), LOCAL_FALLBACK);

    let file = CityWatch::new_with_options(ClientOptions::default().with_origin("file://")).unwrap();
    assert_eq!(file.api().base().as_str(), LOCAL_FALLBACK);

    let hosted = CityWatch::new_with_options(
        ClientOptions::default().with_origin("https://citywatch.example"),
    )
    .unwrap();
    assert_eq!(hosted.api().base().as_str(), "https://citywatch.example");

    let overridden = CityWatch::new_with_options(
        ClientOptions::default()
            .with_origin("https://citywatch.example")
            .with_api_base("https://api.citywatch.example"),
    )
    .unwrap();
    assert_eq!(overridden.api().base().as_str(), "https://api.citywatch.example");
}

#[test]
fn test_invalid_options_are_rejected() {
    let err = CityWatch::new_with_options(ClientOptions::default().with_page_size(0)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_admin_panels_need_admin_login() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    let citywatch = client(&server);

    let err = citywatch.admin_notifications().unwrap_err();
    assert_eq!(err.redirect(), Some(&Page::Login));

    let outcome = citywatch
        .auth()
        .login(&Credentials::new("kim@city.gov", "secret1"))
        .await
        .unwrap();
    assert_eq!(outcome.redirect(), &Page::AdminDashboard);
    assert!(citywatch.admin_notifications().is_ok());
    assert!(citywatch.notification_bell().is_ok());
    assert_eq!(citywatch.landing_page(), Some(Page::AdminDashboard));
}

#[tokio::test]
async fn test_bell_reads_admin_feed_after_login() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    Mock::given(method("GET"))
        .and(path("/api/admin/notifications"))
        .and(query_param("limit", "5"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 1, "message": "New pothole report", "read": false },
                { "id": 2, "message": "Report closed", "read": true }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let citywatch = client(&server);
    citywatch
        .auth()
        .login(&Credentials::new("kim@city.gov", "secret1"))
        .await
        .unwrap();

    let bell = citywatch.notification_bell().unwrap();
    assert!(bell.toggle_dropdown().await.unwrap());

    let view = bell.render(chrono::Utc::now());
    assert_eq!(view.badge.label, "1");
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.footer_link, Some(Page::AdminNotifications));
}

#[tokio::test]
async fn test_session_survives_restart_with_file_store() {
    let server = MockServer::start().await;
    mount_login(&server, "user").await;
    let dir = tempfile::tempdir().unwrap();
    let options = ClientOptions::default()
        .with_api_base(&server.uri())
        .with_session_file(dir.path().join("session.json"));

    let first = CityWatch::new_with_options(options.clone()).unwrap();
    first
        .auth()
        .login(&Credentials::new("kim@city.gov", "secret1"))
        .await
        .unwrap();

    let second = CityWatch::new_with_options(options.clone()).unwrap();
    assert_eq!(second.sessions().token().as_deref(), Some("user-token"));
    assert_eq!(second.landing_page(), Some(Page::UserHome));

    assert_eq!(second.auth().logout().unwrap(), Page::Login);
    let third = CityWatch::new_with_options(options).unwrap();
    assert!(!third.sessions().is_signed_in());
}

#[tokio::test]
async fn test_report_endpoint_follows_session() {
    let server = MockServer::start().await;
    mount_login(&server, "user").await;
    Mock::given(method("POST"))
        .and(path("/api/reports/anonymous"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "report": { "referenceNumber": "CW-100" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/reports"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "report": { "referenceNumber": "CW-101" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let citywatch = client(&server);
    let anonymous = citywatch.reports().submit_draft(&draft(), &NoPrompt).await.unwrap();
    assert!(anonymous.anonymous);
    assert_eq!(anonymous.reference_number, "CW-100");

    citywatch
        .auth()
        .login(&Credentials::new("kim@city.gov", "secret1"))
        .await
        .unwrap();
    let signed_in = citywatch.reports().submit_draft(&draft(), &NoPrompt).await.unwrap();
    assert!(!signed_in.anonymous);
    assert_eq!(
        signed_in.status_message().text,
        "Report submitted successfully! Your reference number is: CW-101."
    );
}

#[tokio::test]
async fn test_errors_convert_into_client_error() {
    let server = MockServer::start().await;
    let citywatch = client(&server);

    let mut incomplete = draft();
    incomplete.location.clear();
    let err: Error = citywatch
        .reports()
        .submit_draft(&incomplete, &NoPrompt)
        .await
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::Report(ReportError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transitions_use_configured_origin() {
    let citywatch = CityWatch::new_with_options(
        ClientOptions::default().with_origin("https://citywatch.example"),
    )
    .unwrap();
    let transitions = citywatch.transitions().with_fade(Duration::ZERO);

    assert_eq!(
        transitions
            .follow("https://citywatch.example/CityWatch-Track.html")
            .await,
        citywatch_client::transitions::Navigation::Faded(
            "https://citywatch.example/CityWatch-Track.html".to_string()
        )
    );
}
