//! Trash lifecycle endpoint tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_trash_and_restore_folder_cascades_one_level() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let reports = app.create_folder(&token, "Reports", None).await;
    let upload = app.upload(&token, "q1.pdf", Some(&reports), b"%PDF-1.7").await;
    assert_eq!(upload.status, StatusCode::CREATED);

    let trashed = app
        .request(
            "POST",
            &format!("/api/trash/{reports}"),
            Some(json!({ "type": "folder" })),
            Some(&token),
        )
        .await;
    assert_eq!(trashed.status, StatusCode::OK);
    assert_eq!(trashed.body["success"], true);
    assert_eq!(trashed.body["data"]["trashed"], true);
    assert_eq!(trashed.body["data"]["type"], "folder");

    let root = app.request("GET", "/api/drive", None, Some(&token)).await;
    assert_eq!(root.body["data"]["folders"], json!([]));
    let inside = app
        .request("GET", &format!("/api/files?folder_id={reports}"), None, Some(&token))
        .await;
    assert_eq!(inside.body["data"], json!([]));

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(helpers::names_of(&trash.body["data"]["folders"]), vec!["Reports"]);
    assert_eq!(helpers::names_of(&trash.body["data"]["files"]), vec!["q1.pdf"]);

    let restored = app
        .request(
            "PUT",
            &format!("/api/trash/restore/{reports}"),
            Some(json!({ "type": "folder" })),
            Some(&token),
        )
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.body["data"]["trashed"], false);
    assert_eq!(restored.body["data"]["name"], "Reports");

    let inside = app
        .request("GET", &format!("/api/files?folder_id={reports}"), None, Some(&token))
        .await;
    assert_eq!(inside.names(), vec!["q1.pdf"]);
}

#[tokio::test]
async fn test_trash_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let folder = app.create_folder(&token, "Old", None).await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                &format!("/api/trash/{folder}"),
                Some(json!({ "type": "folder" })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let folder = app.create_folder(&token, "Old", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/trash/{folder}"),
            Some(json!({ "type": "drive" })),
            Some(&token),
        )
        .await;

    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_permanent_delete_requires_trash() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let folder = app.create_folder(&token, "Keep", None).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/trash/{folder}"),
            Some(json!({ "type": "folder" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "INVALID_STATE");

    let still_there = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert_eq!(still_there.names(), vec!["Keep"]);
}

#[tokio::test]
async fn test_permanent_delete_removes_trashed_children_and_orphans_restored_ones() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let a = app.create_folder(&token, "A", None).await;
    app.create_folder(&token, "B", Some(&a)).await;
    let c = app.create_folder(&token, "C", Some(&a)).await;

    app.request(
        "POST",
        &format!("/api/trash/{a}"),
        Some(json!({ "type": "folder" })),
        Some(&token),
    )
    .await;
    // C leaves the trash on its own and must survive the purge of A.
    app.request(
        "PUT",
        &format!("/api/trash/restore/{c}"),
        Some(json!({ "type": "folder" })),
        Some(&token),
    )
    .await;

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/trash/{a}"),
            Some(json!({ "type": "folder" })),
            Some(&token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);
    assert_eq!(deleted.body["data"]["message"], "Permanently deleted");

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(trash.body["success"], true);
    assert_eq!(trash.body["data"]["folders"], json!([]));

    let root = app
        .request("GET", "/api/folders?parent=root", None, Some(&token))
        .await;
    assert_eq!(root.names(), vec!["C"]);
}

#[tokio::test]
async fn test_restore_many_skips_foreign_ids() {
    let app = helpers::TestApp::new().await;
    let ada = app.register("ada", "auth0|ada").await;
    let bob = app.register("bob", "auth0|bob").await;
    let mine = app.create_folder(&ada, "Mine", None).await;
    let theirs = app.create_folder(&bob, "Theirs", None).await;

    for (token, id) in [(&ada, &mine), (&bob, &theirs)] {
        app.request(
            "POST",
            &format!("/api/trash/{id}"),
            Some(json!({ "type": "folder" })),
            Some(token),
        )
        .await;
    }

    let response = app
        .request(
            "PUT",
            "/api/trash/restore",
            Some(json!({ "files": [], "folders": [mine, theirs] })),
            Some(&ada),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["affected"], 1);

    let bobs_trash = app.request("GET", "/api/trash", None, Some(&bob)).await;
    assert_eq!(
        helpers::names_of(&bobs_trash.body["data"]["folders"]),
        vec!["Theirs"]
    );
}

#[tokio::test]
async fn test_restore_all_empties_trash() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ada", "auth0|ada").await;
    let folder = app.create_folder(&token, "Docs", None).await;
    let upload = app.upload(&token, "loose.txt", None, b"x").await;
    let file = upload.id();

    for (id, kind) in [(&folder, "folder"), (&file, "file")] {
        app.request(
            "POST",
            &format!("/api/trash/{id}"),
            Some(json!({ "type": kind })),
            Some(&token),
        )
        .await;
    }

    let response = app
        .request("PUT", "/api/trash/restore-all", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["affected"], 2);

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(trash.body["data"]["folders"], json!([]));
    assert_eq!(trash.body["data"]["files"], json!([]));
}

#[tokio::test]
async fn test_foreign_trash_is_not_found() {
    let app = helpers::TestApp::new().await;
    let ada = app.register("ada", "auth0|ada").await;
    let bob = app.register("bob", "auth0|bob").await;
    let folder = app.create_folder(&ada, "Mine", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/trash/{folder}"),
            Some(json!({ "type": "folder" })),
            Some(&bob),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
