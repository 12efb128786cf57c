use fitportal::auth::login_error_message;
use fitportal::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_cookie_is_replayed_on_session_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/loginDB"))
        .and(body_json(json!({ "username": "jdoe", "password": "abcdefgh" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=abc123; Path=/; HttpOnly")
                .set_body_json(json!({ "success": true, "user": "jdoe" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/session"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "user": { "username": "jdoe", "firstName": "Jane", "lastName": "Doe" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let session = portal.session();

    let info = session.login("jdoe", "abcdefgh").await.unwrap();
    assert!(info.valid);

    // a second page sharing the context reads the cached session
    let other_page = portal.session();
    assert!(other_page.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_failed_login_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/loginDB"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let err = portal.session().login("jdoe", "wrong").await.unwrap_err();

    assert_eq!(login_error_message(&err), "Invalid username or password.");
    assert!(portal.session().cached().await.is_none());
}

#[tokio::test]
async fn test_logged_out_visitor_is_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let session = portal.session();

    assert!(!session.is_authenticated().await.unwrap());
    assert_eq!(session.display_name().await.unwrap(), None);

    session.logout().await.unwrap();
    assert_eq!(session.cached().await, Some(SessionInfo::anonymous()));
}

#[tokio::test]
async fn test_db_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/db-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "connected" })))
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    assert!(portal.auth().db_status().await.unwrap().is_connected());
}
