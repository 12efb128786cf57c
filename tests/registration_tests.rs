use std::time::Duration;

use fitportal::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn filled_wizard(portal: &FitPortal) -> Wizard<RegistrationDraft> {
    let mut wizard = portal.registration();
    {
        let draft = wizard.draft_mut();
        draft.account.username = "jdoe".to_string();
        draft.account.email = "jdoe@example.com".to_string();
        draft.account.password = "abcdefgh".to_string();
        draft.account.confirm_password = "abcdefgh".to_string();
        draft.profile.first_name = "Jane".to_string();
        draft.profile.last_name = "Doe".to_string();
        draft.physical.height = "170".to_string();
        draft.physical.initial_weight = "65.5".to_string();
    }
    wizard
}

#[tokio::test]
async fn test_registration_sends_one_request_without_confirmation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_partial_json(json!({
            "username": "jdoe",
            "password": "abcdefgh",
            "firstName": "Jane",
            "height": 170.0,
            "fitnessLevel": "beginner"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let mut wizard = filled_wizard(&portal);

    assert_eq!(wizard.next().unwrap(), 2);
    assert_eq!(wizard.next().unwrap(), 3);
    let response = wizard.submit(portal.api()).await.unwrap();

    assert!(response.success);
    assert_eq!(wizard.state(), WizardState::Done);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("confirmPassword").is_none());
    assert!(body.get("confirm_password").is_none());
}

#[tokio::test]
async fn test_invalid_step_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let mut wizard = filled_wizard(&portal);
    wizard.draft_mut().account.confirm_password = "abcdefgX".to_string();

    let err = wizard.next().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(wizard.step(), Some(1));
    assert!(wizard.errors().has("confirm_password"));

    // submit is only reachable from the final step
    assert!(wizard.submit(portal.api()).await.is_err());
}

#[tokio::test]
async fn test_rejected_registration_returns_to_final_step() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Username already taken"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let mut wizard = filled_wizard(&portal);
    wizard.next().unwrap();
    wizard.next().unwrap();

    let err = wizard.submit(portal.api()).await.unwrap_err();
    assert!(matches!(err, Error::Rejected(_)));
    assert_eq!(wizard.step(), Some(3));
    assert_eq!(wizard.notice(), Some("Username already taken"));
    assert_eq!(wizard.draft().account.username, "jdoe");
}

#[tokio::test]
async fn test_conflict_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
        .mount(&mock_server)
        .await;

    let portal = FitPortal::new(&mock_server.uri()).unwrap();
    let mut wizard = filled_wizard(&portal);
    wizard.next().unwrap();
    wizard.next().unwrap();

    let err = wizard.submit(portal.api()).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
    assert_eq!(wizard.notice(), Some("This record already exists."));
    assert!(!wizard.is_done());
}

#[tokio::test]
async fn test_abandoned_submit_returns_to_final_step() {
    let slow_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&slow_server)
        .await;

    let portal = FitPortal::new(&slow_server.uri()).unwrap();
    let mut wizard = filled_wizard(&portal);
    wizard.next().unwrap();
    wizard.next().unwrap();

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), wizard.submit(portal.api())).await;
    assert!(abandoned.is_err());
    assert_eq!(wizard.state(), WizardState::Step(3));

    assert_eq!(wizard.back().unwrap(), 2);
    assert_eq!(wizard.next().unwrap(), 3);

    let fast_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&fast_server)
        .await;

    let retry = FitPortal::new(&fast_server.uri()).unwrap();
    let response = wizard.submit(retry.api()).await.unwrap();
    assert!(response.success);
    assert_eq!(wizard.state(), WizardState::Done);
}
