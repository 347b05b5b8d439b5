mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{TestApp, json_body};

const EMAIL: &str = "reader@example.com";

async fn signed_in() -> TestApp {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/user/create",
            json!({ "email": EMAIL, "name": "Reader", "image": "reader.png" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    app
}

#[tokio::test]
async fn create_user_is_idempotent() {
    let app = signed_in().await;

    let first = json_body(app.get(&format!("/user/{EMAIL}")).await).await;
    let again = app
        .post_json(
            "/user/create",
            json!({ "email": EMAIL, "name": "Someone Else", "image": "" }),
        )
        .await;
    assert_eq!(again.status(), StatusCode::OK);

    let again = json_body(again).await;
    assert_eq!(again["id"], first["id"]);
    assert_eq!(again["name"], "Reader");
    assert_eq!(again["favorite"], json!([]));
}

#[tokio::test]
async fn create_user_rejects_malformed_payload() {
    let app = TestApp::new();

    let missing_email = app.post_json("/user/create", json!({ "name": "x" })).await;
    assert_eq!(missing_email.status(), StatusCode::BAD_REQUEST);

    let blank_email = app.post_json("/user/create", json!({ "email": "  " })).await;
    assert_eq!(blank_email.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_adds_then_removes_a_favorite() {
    let app = signed_in().await;
    let toggle = format!("/user/favorite/Berserk/{EMAIL}");
    let check = format!("/user/favorite/one?email={EMAIL}&name=Berserk");

    let added = json_body(app.post(&toggle).await).await;
    assert_eq!(added, json!({ "success": "Manga added" }));
    assert_eq!(
        json_body(app.get(&check).await).await,
        json!({ "isFavorite": true })
    );
    assert_eq!(app.backend.popularity_of("Berserk"), 1);

    let listed = json_body(app.get(&format!("/user/favorite/list?email={EMAIL}")).await).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["name"], "Berserk");

    let removed = json_body(app.post(&toggle).await).await;
    assert_eq!(removed, json!({ "success": "Manga delete" }));
    assert_eq!(
        json_body(app.get(&check).await).await,
        json!({ "isFavorite": false })
    );
    assert_eq!(app.backend.popularity_of("Berserk"), 1);
}

#[tokio::test]
async fn favorites_of_unknown_user_are_not_found() {
    let app = TestApp::new();

    let response = app.post(&format!("/user/favorite/Berserk/{EMAIL}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["message"], "User not found");

    let listing = app.get(&format!("/user/favorite/list?email={EMAIL}")).await;
    assert_eq!(listing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_favorites_list_is_an_empty_array() {
    let app = signed_in().await;

    let response = app.get(&format!("/user/favorite/list?email={EMAIL}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn delete_user_succeeds_once() {
    let app = signed_in().await;
    let uri = format!("/user/delete?email={EMAIL}");

    let first = app.delete(&uri).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await, json!({ "success": "User deleted" }));

    let second = app.delete(&uri).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let lookup = app.get(&format!("/user/{EMAIL}")).await;
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_toggles_of_different_mangas_both_persist() {
    let app = signed_in().await;

    let berserk_path = format!("/user/favorite/Berserk/{EMAIL}");
    let yotsuba_path = format!("/user/favorite/Yotsuba&!/{EMAIL}");
    let (berserk, yotsuba) = tokio::join!(app.post(&berserk_path), app.post(&yotsuba_path),);
    assert_eq!(berserk.status(), StatusCode::OK);
    assert_eq!(yotsuba.status(), StatusCode::OK);

    let user = json_body(app.get(&format!("/user/{EMAIL}")).await).await;
    let mut favorites: Vec<&str> = user["favorite"]
        .as_array()
        .expect("favorite array")
        .iter()
        .filter_map(|name| name.as_str())
        .collect();
    favorites.sort_unstable();
    assert_eq!(favorites, ["Berserk", "Yotsuba&!"]);
}
