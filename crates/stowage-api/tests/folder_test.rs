//! Folder, drive, and search endpoint tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_by_parent() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;

    let reports = app.create_folder(&token, "Reports", None).await;
    app.create_folder(&token, "Archive", None).await;
    app.create_folder(&token, "2024", Some(&reports)).await;

    let root = app
        .request("GET", "/api/folders?parent=root", None, Some(&token))
        .await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.names(), vec!["Archive", "Reports"]);

    let inside = app
        .request("GET", &format!("/api/folders?parent={reports}"), None, Some(&token))
        .await;
    assert_eq!(inside.names(), vec!["2024"]);

    let all = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert_eq!(all.names().len(), 3);
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "   " })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_under_foreign_parent_is_not_found() {
    let app = helpers::TestApp::new().await;
    let ada = app.register("ada", "auth0|ada").await;
    let bob = app.register("bob", "auth0|bob").await;
    let private = app.create_folder(&ada, "Private", None).await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Sneaky", "parent": private })),
            Some(&bob),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_and_move() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let a = app.create_folder(&token, "A", None).await;
    let b = app.create_folder(&token, "B", None).await;

    let renamed = app
        .request(
            "PUT",
            &format!("/api/folders/{b}"),
            Some(json!({ "name": "Bee" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["name"], "Bee");

    let moved = app
        .request(
            "PUT",
            &format!("/api/folders/{b}/move"),
            Some(json!({ "parent": a })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["data"]["parent_id"], a.as_str());

    // A cannot move under its own child.
    let cycle = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "parent": b })),
            Some(&token),
        )
        .await;
    assert_eq!(cycle.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_foreign_folder_rename_is_not_found() {
    let app = helpers::TestApp::new().await;
    let ada = app.register("ada", "auth0|ada").await;
    let bob = app.register("bob", "auth0|bob").await;
    let folder = app.create_folder(&ada, "Mine", None).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{folder}"),
            Some(json!({ "name": "Yours" })),
            Some(&bob),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_drive_lists_folders_and_files_at_root() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let docs = app.create_folder(&token, "Docs", None).await;
    app.upload(&token, "readme.txt", None, b"hello").await;
    app.upload(&token, "nested.txt", Some(&docs), b"deep").await;

    let response = app.request("GET", "/api/drive", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(helpers::names_of(&response.body["data"]["folders"]), vec!["Docs"]);
    assert_eq!(helpers::names_of(&response.body["data"]["files"]), vec!["readme.txt"]);
}

#[tokio::test]
async fn test_search_matches_names_case_insensitively() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    app.create_folder(&token, "Quarterly Reports", None).await;
    app.upload(&token, "report-q1.pdf", None, b"%PDF").await;
    app.upload(&token, "photo.jpg", None, b"jpeg").await;

    let response = app
        .request("GET", "/api/search?query=REPORT", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        helpers::names_of(&response.body["data"]["folders"]),
        vec!["Quarterly Reports"]
    );
    assert_eq!(
        helpers::names_of(&response.body["data"]["files"]),
        vec!["report-q1.pdf"]
    );
}

#[tokio::test]
async fn test_empty_search_returns_nothing() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    app.create_folder(&token, "Anything", None).await;

    let response = app
        .request("GET", "/api/search?query=", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["folders"], json!([]));
    assert_eq!(response.body["data"]["files"], json!([]));
}

#[tokio::test]
async fn test_search_keeps_surrounding_whitespace() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    app.upload(&token, "report.pdf", None, b"%PDF").await;
    app.upload(&token, "q1 report.pdf", None, b"%PDF").await;

    let spaces = app
        .request("GET", "/api/search?query=%20", None, Some(&token))
        .await;
    assert_eq!(
        helpers::names_of(&spaces.body["data"]["files"]),
        vec!["q1 report.pdf"]
    );

    let padded = app
        .request("GET", "/api/search?query=%20report", None, Some(&token))
        .await;
    assert_eq!(padded.status, StatusCode::OK);
    assert_eq!(padded.body["success"], true);
    assert_eq!(
        helpers::names_of(&padded.body["data"]["files"]),
        vec!["q1 report.pdf"]
    );
}

#[tokio::test]
async fn test_search_does_not_cross_owners() {
    let app = helpers::TestApp::new().await;
    let ada = app.register("ada", "auth0|ada").await;
    let bob = app.register("bob", "auth0|bob").await;
    app.create_folder(&ada, "Secret plans", None).await;

    let response = app
        .request("GET", "/api/search?query=secret", None, Some(&bob))
        .await;

    assert_eq!(response.body["data"]["folders"], json!([]));
}
