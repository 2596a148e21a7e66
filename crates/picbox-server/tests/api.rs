//! End-to-end tests for the picbox HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! AlbumService -> SQLite/blob store -> HTTP response.
//!
//! Each test creates a fresh AppState backed by an in-memory database and a
//! temp media directory. Tests use `tower::ServiceExt::oneshot` to send
//! requests directly to the router without starting a network server.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use picbox_server::router::build_router;
use picbox_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

// Payload that passes the blob store's JPEG signature sniff.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

const BOUNDARY: &str = "picbox-test-boundary";

/// Creates a fresh router. The TempDir must outlive the router so the media
/// directory stays around.
fn test_app() -> (Router, tempfile::TempDir) {
    let media = tempfile::tempdir().expect("media tempdir");
    let state = AppState::in_memory(media.path().to_str().unwrap())
        .expect("failed to create in-memory AppState");
    (build_router(state), media)
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!(null));
    (status, json)
}

/// Sends a GET request and returns (status, json).
async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// Sends a urlencoded POST and returns (status, json, session cookie if set).
async fn post_form(
    app: &Router,
    path: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> (StatusCode, Value, Option<String>) {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let (status, json) = read_json(response).await;
    (status, json, set_cookie)
}

/// Sends a DELETE request and returns (status, json).
async fn delete_json(app: &Router, path: &str, cookie: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("DELETE").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// Sends a multipart upload to `/Album/{id}/addPicture`.
async fn upload_picture(
    app: &Router,
    album_id: i64,
    name: Option<&str>,
    filename: &str,
    payload: &[u8],
    cookie: Option<&str>,
) -> (StatusCode, Value) {
    let mut body: Vec<u8> = Vec::new();
    if let Some(name) = name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/Album/{album_id}/addPicture"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// Registers a person. Panics on failure.
async fn register(app: &Router, name: &str, password: &str) {
    let (status, body, _) = post_form(
        app,
        "/register",
        &[("name", name), ("password", password)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {name} failed: {body:?}");
}

/// Logs in and returns the session cookie.
async fn login(app: &Router, name: &str, password: &str) -> String {
    let (status, body, cookie) = post_form(
        app,
        "/login",
        &[("name", name), ("password", password)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {name} failed: {body:?}");
    cookie.expect("login did not set a session cookie")
}

async fn count(app: &Router, path: &str) -> usize {
    let (status, body) = get_json(app, path).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().expect("list body").len()
}

// ---------------------------------------------------------------------------
// Persons and registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn person_list_renders_string_ids_without_passwords() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    register(&app, "Bob", "Bob123").await;

    let (status, body) = get_json(&app, "/person").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": "1", "name": "Alice"},
            {"id": "2", "name": "Bob"},
        ])
    );
}

#[tokio::test]
async fn person_detail_and_unknown_id() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;

    let (status, body) = get_json(&app, "/person/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "1", "name": "Alice"}));

    let (status, body) = get_json(&app, "/person/1000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, _media) = test_app();
    register(&app, "bobby", "bobby123").await;

    let (status, _, _) = post_form(
        &app,
        "/register",
        &[("name", "bobby"), ("password", "other")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/person").await, 1);
}

#[tokio::test]
async fn registration_requires_both_fields() {
    let (app, _media) = test_app();
    for fields in [
        &[("name", "Alice")][..],
        &[("password", "Alice123")][..],
        &[("name", ""), ("password", "Alice123")][..],
    ] {
        let (status, body, _) = post_form(&app, "/register", fields, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "fields {fields:?}: {body:?}");
        assert_eq!(body["code"], 403);
    }
    assert_eq!(count(&app, "/person").await, 0);
}

#[tokio::test]
async fn registration_while_logged_in_is_rejected() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    let cookie = login(&app, "Alice", "Alice123").await;

    let (status, _, _) = post_form(
        &app,
        "/register",
        &[("name", "Eve"), ("password", "Eve123")],
        Some(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/person").await, 1);
}

// ---------------------------------------------------------------------------
// Login and logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_requires_exact_name_and_password() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;

    // Wrong password: 403, and no session is established.
    let (status, _, cookie) = post_form(
        &app,
        "/login",
        &[("name", "Alice"), ("password", "Alice13")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(cookie.is_none());

    // Unknown account.
    let (status, _, _) = post_form(
        &app,
        "/login",
        &[("name", "Alce"), ("password", "Alice123")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Missing fields.
    let (status, _, _) = post_form(&app, "/login", &[("name", "Alice")], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Correct credentials.
    let cookie = login(&app, "Alice", "Alice123").await;
    assert!(cookie.starts_with("picbox_session="));
}

#[tokio::test]
async fn login_twice_is_rejected() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    let cookie = login(&app, "Alice", "Alice123").await;

    let (status, _, _) = post_form(
        &app,
        "/login",
        &[("name", "Alice"), ("password", "Alice123")],
        Some(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_while_anonymous_redirects() {
    let (app, _media) = test_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    let cookie = login(&app, "Alice", "Alice123").await;

    let (status, body, _) = post_form(&app, "/logout", &[], Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK, "logout failed: {body:?}");

    // The old token no longer authenticates anything.
    let (status, _, _) = post_form(
        &app,
        "/createAlbum",
        &[("name", "Summer")],
        Some(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
}

// ---------------------------------------------------------------------------
// Albums
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_album_enforces_per_owner_uniqueness() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    register(&app, "Bob", "Bob123").await;
    let bob = login(&app, "Bob", "Bob123").await;

    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "Summer")], Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&app, "/album").await, 1);

    // Same owner, same name: rejected, count unchanged.
    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "Summer")], Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/album").await, 1);

    // Different owner, same name: fine.
    let alice = login(&app, "Alice", "Alice123").await;
    let (status, _, _) =
        post_form(&app, "/createAlbum", &[("name", "Summer")], Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&app, "/album").await, 2);
}

#[tokio::test]
async fn album_owner_comes_from_the_session_not_the_form() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    register(&app, "Bob", "Bob123").await;
    let bob = login(&app, "Bob", "Bob123").await;

    // A forged person_id field is ignored.
    let (status, _, _) = post_form(
        &app,
        "/createAlbum",
        &[("name", "Summer"), ("person_id", "1")],
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/album/1").await;
    assert_eq!(body, json!({"id": "1", "name": "Summer", "person_id": "2"}));
}

#[tokio::test]
async fn create_album_gates_and_validation() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;

    // Anonymous: redirect, not 403.
    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "Summer")], None).await;
    assert_eq!(status, StatusCode::FOUND);

    // Blank name: 403.
    let alice = login(&app, "Alice", "Alice123").await;
    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "")], Some(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/album").await, 0);
}

#[tokio::test]
async fn album_detail_and_unknown_id() {
    let (app, _media) = test_app();
    register(&app, "Alice", "Alice123").await;
    let alice = login(&app, "Alice", "Alice123").await;
    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "Trip")], Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, "/album/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Trip");

    let (status, _) = get_json(&app, "/album/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Pictures
// ---------------------------------------------------------------------------

/// Registers Alice (album 1) and Bob (album 2); returns Bob's cookie.
async fn two_owner_fixture(app: &Router) -> String {
    register(app, "Alice", "Alice123").await;
    register(app, "Bob", "Bob123").await;
    let alice = login(app, "Alice", "Alice123").await;
    let (status, _, _) = post_form(app, "/createAlbum", &[("name", "Hers")], Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let bob = login(app, "Bob", "Bob123").await;
    let (status, _, _) = post_form(app, "/createAlbum", &[("name", "His")], Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    bob
}

#[tokio::test]
async fn upload_to_own_album_succeeds() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;

    let (status, body) =
        upload_picture(&app, 2, Some("testImg1"), "test_img.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK, "upload failed: {body:?}");
    assert_eq!(count(&app, "/pictures").await, 1);

    let (status, body) = get_json(&app, "/picture/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "testImg1");
    assert_eq!(body["album_id"], "2");
    // Relative storage key, not a host path.
    let path = body["path"].as_str().unwrap();
    assert!(path.ends_with(".jpg"), "path was {path}");
    assert!(!path.contains('/'), "path was {path}");
}

#[tokio::test]
async fn upload_to_someone_elses_album_is_forbidden() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;

    // Album 1 belongs to Alice.
    let (status, _) =
        upload_picture(&app, 1, Some("testImg1"), "test_img.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/pictures").await, 0);
}

#[tokio::test]
async fn upload_to_missing_album_is_forbidden_not_404() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;

    let (status, body) =
        upload_picture(&app, 99, Some("x"), "x.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
}

#[tokio::test]
async fn upload_validation() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;

    // Anonymous: redirect.
    let (status, _) = upload_picture(&app, 2, Some("x"), "x.jpg", FAKE_JPEG, None).await;
    assert_eq!(status, StatusCode::FOUND);

    // Missing name.
    let (status, _) = upload_picture(&app, 2, None, "x.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Empty payload.
    let (status, _) = upload_picture(&app, 2, Some("x"), "x.jpg", b"", Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Not an image.
    let (status, _) = upload_picture(&app, 2, Some("x"), "x.txt", b"hello", Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(count(&app, "/pictures").await, 0);
}

#[tokio::test]
async fn picture_names_are_globally_unique() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;

    let (status, _) =
        upload_picture(&app, 2, Some("dup"), "a.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        upload_picture(&app, 2, Some("dup"), "b.jpg", FAKE_JPEG, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/pictures").await, 1);
}

#[tokio::test]
async fn album_picture_listing() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;
    upload_picture(&app, 2, Some("one"), "1.jpg", FAKE_JPEG, Some(&bob)).await;
    upload_picture(&app, 2, Some("two"), "2.jpg", FAKE_JPEG, Some(&bob)).await;

    let (status, body) = get_json(&app, "/album/2/pictures").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get_json(&app, "/album/1/pictures").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get_json(&app, "/album/99/pictures").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn owner_can_delete_a_picture() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;
    upload_picture(&app, 2, Some("pic"), "p.jpg", FAKE_JPEG, Some(&bob)).await;

    let (status, _) = delete_json(&app, "/picture/1", Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&app, "/pictures").await, 0);

    let (status, _) = delete_json(&app, "/picture/1", Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_owner_cannot_delete_a_picture() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;
    upload_picture(&app, 2, Some("pic"), "p.jpg", FAKE_JPEG, Some(&bob)).await;

    let alice = login(&app, "Alice", "Alice123").await;
    let (status, _) = delete_json(&app, "/picture/1", Some(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&app, "/pictures").await, 1);

    // Anonymous: redirect.
    let (status, _) = delete_json(&app, "/picture/1", None).await;
    assert_eq!(status, StatusCode::FOUND);
}

#[tokio::test]
async fn album_delete_cascades_pictures() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;
    upload_picture(&app, 2, Some("pic"), "p.jpg", FAKE_JPEG, Some(&bob)).await;

    let (status, _) = delete_json(&app, "/album/2", Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&app, "/album").await, 1);
    assert_eq!(count(&app, "/pictures").await, 0);
}

#[tokio::test]
async fn person_delete_is_self_only_and_cascades() {
    let (app, _media) = test_app();
    let bob = two_owner_fixture(&app).await;
    upload_picture(&app, 2, Some("pic"), "p.jpg", FAKE_JPEG, Some(&bob)).await;

    // Bob (person 2) cannot delete Alice (person 1).
    let (status, _) = delete_json(&app, "/person/1", Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bob deletes himself; his album and picture go with him.
    let (status, _) = delete_json(&app, "/person/2", Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&app, "/person").await, 1);
    assert_eq!(count(&app, "/album").await, 1);
    assert_eq!(count(&app, "/pictures").await, 0);

    // His session died with the account.
    let (status, _, _) = post_form(&app, "/createAlbum", &[("name", "x")], Some(&bob)).await;
    assert_eq!(status, StatusCode::FOUND);
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_routes_answer_the_canonical_404() {
    let (app, _media) = test_app();
    let (status, body) = get_json(&app, "/no/such/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": 404, "msg": "404: Not Found"}));
}
