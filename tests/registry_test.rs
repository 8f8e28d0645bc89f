//! Integration tests for the copy registry.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_copy_crud_round_trip() {
    let app = helpers::TestApp::new().await;
    let admin = app.seed_user("staff").await;
    let book = app.seed_book("CRUD").await;

    let response = app
        .request(
            "POST",
            "/api/copies",
            Some(json!({
                "book_id": book,
                "barcode": "CR-0001",
                "location": "Shelf 3A"
            })),
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let copy_id = response.body["data"]["copy_id"].as_i64().unwrap();
    assert_eq!(response.body["data"]["status"], "available");

    let response = app
        .request(
            "PUT",
            &format!("/api/copies/{copy_id}"),
            Some(json!({ "location": "Shelf 9C" })),
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["location"], "Shelf 9C");
    assert_eq!(response.body["data"]["barcode"], "CR-0001");

    let response = app
        .request(
            "DELETE",
            &format!("/api/copies/{copy_id}"),
            None,
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/copies/{copy_id}"),
            None,
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_barcode_conflicts() {
    let app = helpers::TestApp::new().await;
    let admin = app.seed_user("staff").await;
    let book = app.seed_book("Duplicates").await;
    app.seed_copy(book, "DUP-0001").await;

    let response = app
        .request(
            "POST",
            "/api/copies",
            Some(json!({ "book_id": book, "barcode": "DUP-0001" })),
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_copy_for_missing_book_fails() {
    let app = helpers::TestApp::new().await;
    let admin = app.seed_user("staff").await;

    let response = app
        .request(
            "POST",
            "/api/copies",
            Some(json!({ "book_id": 999_999, "barcode": "MB-0001" })),
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registry_writes_require_admin() {
    let app = helpers::TestApp::new().await;
    let user = app.seed_user("alice").await;
    let book = app.seed_book("Locked Down").await;
    let copy = app.seed_copy(book, "LD-0001").await;

    let response = app
        .request(
            "POST",
            "/api/copies",
            Some(json!({ "book_id": book, "barcode": "LD-0002" })),
            Some((user, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "DELETE",
            &format!("/api/copies/{copy}"),
            None,
            Some((user, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_checked_out_copy_refused() {
    let app = helpers::TestApp::new().await;
    let user = app.seed_user("alice").await;
    let admin = app.seed_user("staff").await;
    let book = app.seed_book("Keep It").await;
    let copy = app.seed_copy(book, "KI-0001").await;

    app.borrow(user, copy).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/copies/{copy}"),
            None,
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_copies_filtered_by_status() {
    let app = helpers::TestApp::new().await;
    let user = app.seed_user("alice").await;
    let admin = app.seed_user("staff").await;
    let book = app.seed_book("Filtered").await;
    let copy_a = app.seed_copy(book, "FL-0001").await;
    app.seed_copy(book, "FL-0002").await;

    app.borrow(user, copy_a).await;

    let response = app
        .request(
            "GET",
            &format!("/api/books/{book}/copies?status=available"),
            None,
            Some((admin, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);
    assert_eq!(response.body["data"]["items"][0]["barcode"], "FL-0002");

    let response = app
        .request(
            "GET",
            &format!("/api/books/{book}/copies?status=unknown"),
            None,
            Some((admin, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_status_marks_copy_lost() {
    let app = helpers::TestApp::new().await;
    let admin = app.seed_user("staff").await;
    let book = app.seed_book("Lost").await;
    let copy = app.seed_copy(book, "LS-0001").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/copies/{copy}/status"),
            Some(json!({ "status": "lost" })),
            Some((admin, true)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "lost");

    // A lost copy cannot be borrowed
    let user = app.seed_user("alice").await;
    let response = app
        .request(
            "POST",
            "/api/loans",
            Some(json!({ "copy_id": copy })),
            Some((user, false)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}
