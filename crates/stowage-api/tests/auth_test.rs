//! Authentication and user endpoint tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/folders", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/trash", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_for_unknown_subject_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let token = app.token_for("auth0|nobody");

    let response = app.request("GET", "/api/users/profile", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;

    let login = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "external_id": "auth0|ada" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["data"]["email"], "ada@example.com");

    let profile = app.request("GET", "/api/users/profile", None, Some(&token)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["id"], login.body["data"]["id"]);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = helpers::TestApp::new().await;
    app.register("ada", "auth0|ada").await;

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(json!({
                "name": "ada again",
                "email": "other@example.com",
                "external_id": "auth0|ada",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(json!({ "name": "bob", "email": "bob", "external_id": "auth0|bob" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_unknown_user_is_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "external_id": "auth0|ghost" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "memory");
}
